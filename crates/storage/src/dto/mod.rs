pub mod approval;
pub mod audit;
pub mod common;
pub mod criteria;
pub mod cycle;
pub mod nomination;
pub mod ranking;
pub mod user;
