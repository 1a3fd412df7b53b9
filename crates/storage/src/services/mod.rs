pub mod approval;
pub mod audit;
pub mod criteria;
pub mod cycle;
pub mod directory;
pub mod finalization;
pub mod nomination;
pub mod ranking;

pub use approval::ApprovalWorkflow;
pub use criteria::CriteriaStore;
pub use cycle::CycleService;
pub use directory::Directory;
pub use finalization::Finalization;
pub use nomination::NominationWorkflow;
pub use ranking::RankingEngine;
