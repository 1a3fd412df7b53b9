use rust_decimal::Decimal;
use sqlx::PgConnection;
use sqlx::types::Json;
use uuid::Uuid;

use crate::dto::criteria::CreateCriteriaRequest;
use crate::error::{Result, StorageError};
use crate::models::Criteria;

const CRITERIA_COLUMNS: &str = "criteria_id, cycle_id, name, weight, description, is_active, \
    config, created_at, updated_at";

/// Repository for criteria database operations
pub struct CriteriaRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> CriteriaRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Criteria of a cycle in creation order
    pub async fn list_for_cycle(&mut self, cycle_id: Uuid, active_only: bool) -> Result<Vec<Criteria>> {
        let query = format!(
            "SELECT {CRITERIA_COLUMNS} FROM criteria
             WHERE cycle_id = $1 AND ($2 = false OR is_active)
             ORDER BY created_at, criteria_id"
        );
        let criteria = sqlx::query_as::<_, Criteria>(&query)
            .bind(cycle_id)
            .bind(active_only)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(criteria)
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Criteria> {
        let query = format!("SELECT {CRITERIA_COLUMNS} FROM criteria WHERE criteria_id = $1");
        sqlx::query_as::<_, Criteria>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::CriteriaNotFound)
    }

    pub async fn create(&mut self, cycle_id: Uuid, req: &CreateCriteriaRequest) -> Result<Criteria> {
        let query = format!(
            "INSERT INTO criteria (cycle_id, name, weight, description, is_active, config)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CRITERIA_COLUMNS}"
        );
        let criteria = sqlx::query_as::<_, Criteria>(&query)
            .bind(cycle_id)
            .bind(&req.name)
            .bind(req.weight)
            .bind(&req.description)
            .bind(req.is_active)
            .bind(req.config.clone().map(Json))
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| StorageError::from(e).map_unique_violation())?;

        Ok(criteria)
    }

    /// Persist every mutable column of an already validated criterion
    pub async fn update(&mut self, criteria: &Criteria) -> Result<Criteria> {
        let query = format!(
            "UPDATE criteria
             SET name = $2, weight = $3, description = $4, is_active = $5, config = $6,
                 updated_at = now()
             WHERE criteria_id = $1
             RETURNING {CRITERIA_COLUMNS}"
        );
        sqlx::query_as::<_, Criteria>(&query)
            .bind(criteria.criteria_id)
            .bind(&criteria.name)
            .bind(criteria.weight)
            .bind(&criteria.description)
            .bind(criteria.is_active)
            .bind(&criteria.config)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| StorageError::from(e).map_unique_violation())?
            .ok_or(StorageError::CriteriaNotFound)
    }

    /// Sum of the weights of the active criteria in a cycle
    pub async fn active_weight_sum(&mut self, cycle_id: Uuid) -> Result<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(weight), 0) FROM criteria WHERE cycle_id = $1 AND is_active",
        )
        .bind(cycle_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(total)
    }

    /// Number of answers and approval reviews that reference a criterion
    pub async fn usage_count(&mut self, id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM nomination_criteria_scores WHERE criteria_id = $1)
              + (SELECT COUNT(*) FROM approval_criteria_reviews WHERE criteria_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(count)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM criteria WHERE criteria_id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::CriteriaNotFound);
        }

        Ok(())
    }
}
