use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Approval, ApprovalAction, ApprovalCriteriaReview};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CriteriaReviewInput {
    pub criteria_id: Uuid,
    pub rating: Decimal,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Body of an approve/reject call; the action comes from the route
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ApprovalRequest {
    #[validate(length(max = 2000))]
    pub reason: Option<String>,

    /// Overall rating on a 0-10 scale; wins over the rating derived from reviews
    pub rating: Option<Decimal>,

    #[validate(nested)]
    #[serde(default)]
    pub criteria_reviews: Vec<CriteriaReviewInput>,
}

/// Everything the approval workflow needs to act on a nomination
#[derive(Debug, Clone)]
pub struct ApprovalDecision {
    pub action: ApprovalAction,
    pub reason: Option<String>,
    pub rating: Option<Decimal>,
    pub criteria_reviews: Vec<CriteriaReviewInput>,
}

impl ApprovalDecision {
    pub fn approve() -> Self {
        Self::from_request(ApprovalAction::Approve, ApprovalRequest::default())
    }

    pub fn reject() -> Self {
        Self::from_request(ApprovalAction::Reject, ApprovalRequest::default())
    }

    pub fn from_request(action: ApprovalAction, request: ApprovalRequest) -> Self {
        Self {
            action,
            reason: request.reason,
            rating: request.rating,
            criteria_reviews: request.criteria_reviews,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_rating(mut self, rating: Decimal) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_review(mut self, criteria_id: Uuid, rating: Decimal) -> Self {
        self.criteria_reviews.push(CriteriaReviewInput {
            criteria_id,
            rating,
            comment: None,
        });
        self
    }
}

/// An approval together with its per-criterion reviews
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalDetail {
    #[serde(flatten)]
    pub approval: Approval,
    pub criteria_reviews: Vec<ApprovalCriteriaReview>,
}
