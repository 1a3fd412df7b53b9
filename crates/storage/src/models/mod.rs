mod answer;
mod approval;
mod audit_log;
mod criteria;
mod cycle;
mod history;
mod nomination;
mod ranking;
mod user;

pub use answer::Answer;
pub use approval::{Approval, ApprovalAction, ApprovalCriteriaReview, MAX_RATING};
pub use audit_log::AuditLog;
pub use criteria::{Criteria, CriteriaConfig, QuestionType};
pub use cycle::{Cycle, CycleStatus};
pub use history::{NominationHistory, RankingHistory};
pub use nomination::{CriteriaScore, MAX_SCORE, MIN_SCORE, Nomination, NominationStatus};
pub use ranking::Ranking;
pub use user::{Team, User, UserRole, UserStatus};
