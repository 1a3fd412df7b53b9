use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::dto::approval::{ApprovalDecision, ApprovalDetail, CriteriaReviewInput};
use crate::error::{Result, StorageError};
use crate::models::{Criteria, MAX_RATING, NominationStatus};
use crate::repository::approval::{ApprovalRepository, NewApproval};
use crate::repository::audit::AuditRepository;
use crate::repository::criteria::CriteriaRepository;
use crate::repository::cycle::CycleRepository;
use crate::repository::nomination::NominationRepository;
use crate::repository::user::UserRepository;

/// Approve/reject decisions on pending nominations.
pub struct ApprovalWorkflow<'a> {
    pool: &'a PgPool,
    config: &'a WorkflowConfig,
}

impl<'a> ApprovalWorkflow<'a> {
    pub fn new(pool: &'a PgPool, config: &'a WorkflowConfig) -> Self {
        Self { pool, config }
    }

    pub async fn act(
        &self,
        nomination_id: Uuid,
        actor_user_id: Uuid,
        decision: ApprovalDecision,
    ) -> Result<ApprovalDetail> {
        let mut tx = self.pool.begin().await?;

        let nomination = NominationRepository::new(&mut tx)
            .find_for_update(nomination_id)
            .await?;
        if nomination.status != NominationStatus::Pending {
            return Err(StorageError::AlreadyProcessed);
        }

        let actor = UserRepository::new(&mut tx).find_by_id(actor_user_id).await?;
        if !actor.is_active() {
            return Err(StorageError::InactiveUser(actor_user_id));
        }
        if !self.config.can_approve(actor.role) {
            return Err(StorageError::PermissionDenied(format!(
                "role {} cannot approve or reject nominations",
                actor.role
            )));
        }

        if nomination.submitted_by == actor.user_id && !self.config.is_override(actor.role) {
            tracing::warn!(
                "User {} tried to act on their own nomination {}",
                actor_user_id,
                nomination_id
            );
            return Err(StorageError::SelfApprovalForbidden);
        }

        let cycle = CycleRepository::new(&mut tx)
            .find_by_id(nomination.cycle_id)
            .await?;
        if cycle.status.is_terminal() {
            return Err(StorageError::CycleFinalized);
        }

        let cycle_criteria = CriteriaRepository::new(&mut tx)
            .list_for_cycle(cycle.cycle_id, false)
            .await?;
        let calculated = validate_reviews(&cycle_criteria, &decision.criteria_reviews)?;

        let rating = decision.rating.or(calculated);
        if let Some(rating) = rating {
            check_rating(rating, MAX_RATING)?;
        }
        tracing::debug!(
            "Nomination {} rating: explicit {:?}, calculated {:?}",
            nomination_id,
            decision.rating,
            calculated
        );

        let mut repo = ApprovalRepository::new(&mut tx);
        let approval = repo
            .create(&NewApproval {
                nomination_id,
                actor_user_id,
                action: decision.action,
                reason: decision.reason.clone(),
                rating,
                acted_at: Utc::now(),
            })
            .await?;

        let mut criteria_reviews = Vec::with_capacity(decision.criteria_reviews.len());
        for review in &decision.criteria_reviews {
            criteria_reviews.push(
                repo.insert_review(
                    approval.approval_id,
                    review.criteria_id,
                    review.rating,
                    review.comment.as_deref(),
                )
                .await?,
            );
        }

        NominationRepository::new(&mut tx)
            .set_status(nomination_id, decision.action.resulting_status())
            .await?;

        AuditRepository::new(&mut tx)
            .record(
                Some(actor_user_id),
                decision.action.audit_action(),
                "nomination",
                Some(nomination_id),
                Some(json!({
                    "reason": decision.reason,
                    "rating": rating,
                    "criteria_reviews": criteria_reviews.len(),
                })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Nomination {} {} by {}",
            nomination_id,
            decision.action.resulting_status().as_str(),
            actor_user_id
        );
        Ok(ApprovalDetail {
            approval,
            criteria_reviews,
        })
    }

    /// Decisions recorded on a nomination, oldest first, with their reviews
    pub async fn list_approvals(&self, nomination_id: Uuid) -> Result<Vec<ApprovalDetail>> {
        let mut conn = self.pool.acquire().await?;
        NominationRepository::new(&mut conn)
            .find_by_id(nomination_id)
            .await?;

        let mut repo = ApprovalRepository::new(&mut conn);
        let approvals = repo.list_for_nomination(nomination_id).await?;
        let ids: Vec<Uuid> = approvals.iter().map(|a| a.approval_id).collect();

        let mut reviews_by_approval: HashMap<Uuid, Vec<_>> = HashMap::new();
        for review in repo.reviews_for(&ids).await? {
            reviews_by_approval
                .entry(review.approval_id)
                .or_default()
                .push(review);
        }

        Ok(approvals
            .into_iter()
            .map(|approval| ApprovalDetail {
                criteria_reviews: reviews_by_approval
                    .remove(&approval.approval_id)
                    .unwrap_or_default(),
                approval,
            })
            .collect())
    }
}

fn check_rating(rating: Decimal, max: Decimal) -> Result<()> {
    if rating < Decimal::ZERO || rating > max {
        return Err(StorageError::RatingOutOfRange { rating, max });
    }
    Ok(())
}

/// Check every review against its criterion and derive the overall rating.
///
/// Returns `None` when no reviews were given.
fn validate_reviews(
    cycle_criteria: &[Criteria],
    reviews: &[CriteriaReviewInput],
) -> Result<Option<Decimal>> {
    if reviews.is_empty() {
        return Ok(None);
    }

    let by_id: HashMap<Uuid, &Criteria> =
        cycle_criteria.iter().map(|c| (c.criteria_id, c)).collect();
    let mut seen = HashSet::with_capacity(reviews.len());
    let mut pairs = Vec::with_capacity(reviews.len());

    for review in reviews {
        let criteria = by_id
            .get(&review.criteria_id)
            .ok_or(StorageError::CriteriaMismatch(review.criteria_id))?;
        if !seen.insert(review.criteria_id) {
            return Err(StorageError::DuplicateReview(review.criteria_id));
        }
        check_rating(review.rating, criteria.weight)?;
        pairs.push((review.rating, criteria.weight));
    }

    Ok(Some(calculate_rating(&pairs)))
}

/// Weighted rating on a 0-10 scale: `sum(rating) / sum(weight) * 10`, or 0 without weight.
pub fn calculate_rating(pairs: &[(Decimal, Decimal)]) -> Decimal {
    let (ratings, weights) = pairs
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(r, w), (rating, weight)| {
            (r + rating, w + weight)
        });

    if weights.is_zero() {
        return Decimal::ZERO;
    }

    (ratings / weights * Decimal::TEN).round_dp(2)
}
