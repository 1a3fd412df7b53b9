pub mod approvals;
pub mod audit;
pub mod criteria;
pub mod cycles;
pub mod directory;
pub mod health;
pub mod nominations;
pub mod rankings;
