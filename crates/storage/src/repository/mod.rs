pub mod approval;
pub mod audit;
pub mod criteria;
pub mod cycle;
pub mod history;
pub mod nomination;
pub mod ranking;
pub mod user;
