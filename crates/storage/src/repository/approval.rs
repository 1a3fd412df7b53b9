use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Approval, ApprovalAction, ApprovalCriteriaReview};

const APPROVAL_COLUMNS: &str =
    "approval_id, nomination_id, actor_user_id, action, reason, rating, acted_at";

/// Values of an approval row about to be inserted
#[derive(Debug, Clone)]
pub struct NewApproval {
    pub nomination_id: Uuid,
    pub actor_user_id: Uuid,
    pub action: ApprovalAction,
    pub reason: Option<String>,
    pub rating: Option<Decimal>,
    pub acted_at: DateTime<Utc>,
}

pub struct ApprovalRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> ApprovalRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewApproval) -> Result<Approval> {
        let query = format!(
            "INSERT INTO approvals (nomination_id, actor_user_id, action, reason, rating, acted_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {APPROVAL_COLUMNS}"
        );
        let approval = sqlx::query_as::<_, Approval>(&query)
            .bind(new.nomination_id)
            .bind(new.actor_user_id)
            .bind(new.action)
            .bind(&new.reason)
            .bind(new.rating)
            .bind(new.acted_at)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| StorageError::from(e).map_unique_violation())?;

        Ok(approval)
    }

    pub async fn insert_review(
        &mut self,
        approval_id: Uuid,
        criteria_id: Uuid,
        rating: Decimal,
        comment: Option<&str>,
    ) -> Result<ApprovalCriteriaReview> {
        sqlx::query_as::<_, ApprovalCriteriaReview>(
            r#"
            INSERT INTO approval_criteria_reviews (approval_id, criteria_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING review_id, approval_id, criteria_id, rating, comment
            "#,
        )
        .bind(approval_id)
        .bind(criteria_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.constraint() == Some("uq_review_approval_criteria") {
                StorageError::DuplicateReview(criteria_id)
            } else {
                err
            }
        })
    }

    /// Approvals recorded on a nomination, oldest first
    pub async fn list_for_nomination(&mut self, nomination_id: Uuid) -> Result<Vec<Approval>> {
        let query = format!(
            "SELECT {APPROVAL_COLUMNS} FROM approvals
             WHERE nomination_id = $1
             ORDER BY acted_at, approval_id"
        );
        let approvals = sqlx::query_as::<_, Approval>(&query)
            .bind(nomination_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(approvals)
    }

    /// Reviews belonging to any of the given approvals
    pub async fn reviews_for(&mut self, approval_ids: &[Uuid]) -> Result<Vec<ApprovalCriteriaReview>> {
        if approval_ids.is_empty() {
            return Ok(Vec::new());
        }

        let reviews = sqlx::query_as::<_, ApprovalCriteriaReview>(
            r#"
            SELECT review_id, approval_id, criteria_id, rating, comment
            FROM approval_criteria_reviews
            WHERE approval_id = ANY($1)
            ORDER BY approval_id, criteria_id
            "#,
        )
        .bind(approval_ids)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(reviews)
    }
}
