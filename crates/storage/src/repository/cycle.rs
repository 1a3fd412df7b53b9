use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::error::{Result, StorageError};
use crate::models::{Cycle, CycleStatus};

const CYCLE_COLUMNS: &str =
    "cycle_id, name, start_at, end_at, status, created_by, created_at, updated_at";

/// Repository for nomination cycle database operations
pub struct CycleRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> CycleRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// List cycles, newest first
    pub async fn list(&mut self, page: &PaginationParams) -> Result<(Vec<Cycle>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nomination_cycles")
            .fetch_one(&mut *self.conn)
            .await?;

        let query = format!(
            "SELECT {CYCLE_COLUMNS} FROM nomination_cycles
             ORDER BY created_at DESC, cycle_id
             LIMIT $1 OFFSET $2"
        );
        let cycles = sqlx::query_as::<_, Cycle>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        Ok((cycles, total))
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Cycle> {
        let query = format!("SELECT {CYCLE_COLUMNS} FROM nomination_cycles WHERE cycle_id = $1");
        sqlx::query_as::<_, Cycle>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::CycleNotFound)
    }

    /// Load a cycle and lock its row until the surrounding transaction ends
    pub async fn find_for_update(&mut self, id: Uuid) -> Result<Cycle> {
        let query = format!(
            "SELECT {CYCLE_COLUMNS} FROM nomination_cycles WHERE cycle_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, Cycle>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::CycleNotFound)
    }

    pub async fn create(
        &mut self,
        name: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        created_by: Uuid,
    ) -> Result<Cycle> {
        let query = format!(
            "INSERT INTO nomination_cycles (name, start_at, end_at, status, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CYCLE_COLUMNS}"
        );
        let cycle = sqlx::query_as::<_, Cycle>(&query)
            .bind(name)
            .bind(start_at)
            .bind(end_at)
            .bind(CycleStatus::Draft)
            .bind(created_by)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| StorageError::from(e).map_unique_violation())?;

        Ok(cycle)
    }

    /// Persist name, dates and status of an already validated cycle
    pub async fn update(&mut self, cycle: &Cycle) -> Result<Cycle> {
        let query = format!(
            "UPDATE nomination_cycles
             SET name = $2, start_at = $3, end_at = $4, status = $5, updated_at = now()
             WHERE cycle_id = $1
             RETURNING {CYCLE_COLUMNS}"
        );
        sqlx::query_as::<_, Cycle>(&query)
            .bind(cycle.cycle_id)
            .bind(&cycle.name)
            .bind(cycle.start_at)
            .bind(cycle.end_at)
            .bind(cycle.status)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| StorageError::from(e).map_unique_violation())?
            .ok_or(StorageError::CycleNotFound)
    }

    pub async fn set_status(&mut self, id: Uuid, status: CycleStatus) -> Result<Cycle> {
        let query = format!(
            "UPDATE nomination_cycles SET status = $2, updated_at = now()
             WHERE cycle_id = $1
             RETURNING {CYCLE_COLUMNS}"
        );
        sqlx::query_as::<_, Cycle>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::CycleNotFound)
    }

    pub async fn count_nominations(&mut self, id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM nominations WHERE cycle_id = $1")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }

    /// Delete a cycle; its criteria go with it
    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM nomination_cycles WHERE cycle_id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::CycleNotFound);
        }

        Ok(())
    }
}
