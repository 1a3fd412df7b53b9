use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Cycle not found")]
    CycleNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Team not found")]
    TeamNotFound,

    #[error("Nomination not found")]
    NominationNotFound,

    #[error("Criteria not found")]
    CriteriaNotFound,

    #[error("Cycle not open for submissions")]
    CycleNotOpen,

    #[error("Cycle must be CLOSED before finalization")]
    CycleNotClosed,

    #[error("Only DRAFT cycles can be deleted")]
    CycleNotDraft,

    #[error("Cycle is finalized and can no longer be changed")]
    CycleFinalized,

    #[error("Cannot delete cycle with existing nominations")]
    CycleHasNominations,

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Nomination already processed")]
    AlreadyProcessed,

    #[error("Duplicate nomination for this cycle/nominee")]
    DuplicateNomination,

    #[error("Criteria {0} answered more than once")]
    DuplicateAnswer(uuid::Uuid),

    #[error("Criteria {0} reviewed more than once")]
    DuplicateReview(uuid::Uuid),

    #[error("A team with this name already exists")]
    DuplicateTeamName,

    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("A cycle with this name already exists")]
    DuplicateCycleName,

    #[error("A criteria with this name already exists in the cycle")]
    DuplicateCriteriaName,

    #[error("Criteria weights {total} exceed {ceiling} for cycle")]
    WeightCeilingExceeded {
        total: rust_decimal::Decimal,
        ceiling: rust_decimal::Decimal,
    },

    #[error("Cannot delete criteria that has been used in nominations. Deactivate it instead.")]
    CriteriaInUse,

    #[error("Criteria {0} not active or not part of cycle")]
    CriteriaMismatch(uuid::Uuid),

    #[error("Rating {rating} must be between 0 and {max}")]
    RatingOutOfRange {
        rating: rust_decimal::Decimal,
        max: rust_decimal::Decimal,
    },

    #[error("Score {0} must be between 1 and 10")]
    ScoreOutOfRange(i32),

    #[error("Users cannot deactivate themselves")]
    SelfDeactivation,

    #[error("User {0} is inactive")]
    InactiveUser(uuid::Uuid),

    #[error("end_at must be after start_at")]
    InvalidDateRange,

    #[error("Criteria weight must be non-negative with at most 2 decimal places")]
    InvalidWeight,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("A manager cannot approve or reject their own nomination. Another manager or HR must review it.")]
    SelfApprovalForbidden,
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    ConstraintViolation,
    PermissionDenied,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::ConstraintViolation => "constraint_violation",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(_) | Self::Migration(_) => ErrorKind::Internal,

            Self::CycleNotFound
            | Self::UserNotFound
            | Self::TeamNotFound
            | Self::NominationNotFound
            | Self::CriteriaNotFound => ErrorKind::NotFound,

            Self::CycleNotOpen
            | Self::CycleNotClosed
            | Self::CycleNotDraft
            | Self::CycleFinalized
            | Self::CycleHasNominations
            | Self::InvalidTransition(_)
            | Self::AlreadyProcessed => ErrorKind::InvalidState,

            Self::DuplicateNomination
            | Self::DuplicateAnswer(_)
            | Self::DuplicateReview(_)
            | Self::DuplicateTeamName
            | Self::DuplicateEmail
            | Self::DuplicateCycleName
            | Self::DuplicateCriteriaName
            | Self::WeightCeilingExceeded { .. }
            | Self::CriteriaInUse => ErrorKind::ConstraintViolation,

            Self::CriteriaMismatch(_)
            | Self::RatingOutOfRange { .. }
            | Self::ScoreOutOfRange(_)
            | Self::SelfDeactivation
            | Self::InvalidDateRange
            | Self::InvalidWeight => ErrorKind::InvalidInput,

            Self::PermissionDenied(_) | Self::SelfApprovalForbidden | Self::InactiveUser(_) => {
                ErrorKind::PermissionDenied
            }
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Name of the violated constraint, if the database reported one
    pub fn constraint(&self) -> Option<&str> {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e.constraint(),
            _ => None,
        }
    }

    /// Translate a unique violation on a known constraint into its domain error.
    pub fn map_unique_violation(self) -> Self {
        if !self.is_unique_violation() {
            return self;
        }

        match self.constraint() {
            Some("uq_nomination_unique_nominee") | Some("uq_nomination_unique_submitter") => {
                StorageError::DuplicateNomination
            }
            Some("uq_approval_actor_once") => StorageError::AlreadyProcessed,
            Some("uq_team_name") => StorageError::DuplicateTeamName,
            Some("uq_user_email") => StorageError::DuplicateEmail,
            Some("uq_cycle_name") => StorageError::DuplicateCycleName,
            Some("uq_criteria_cycle_name") => StorageError::DuplicateCriteriaName,
            _ => self,
        }
    }
}
