use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::cycle::{CreateCycleRequest, UpdateCycleRequest};
use crate::error::{Result, StorageError};
use crate::models::{Cycle, CycleStatus};
use crate::repository::audit::AuditRepository;
use crate::repository::cycle::CycleRepository;
use crate::repository::user::UserRepository;

/// Cycle lifecycle management: DRAFT -> OPEN -> CLOSED. Finalizing lives in
/// [`crate::services::Finalization`].
pub struct CycleService<'a> {
    pool: &'a PgPool,
}

impl<'a> CycleService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_cycle(&self, req: &CreateCycleRequest, created_by: Uuid) -> Result<Cycle> {
        if req.end_at <= req.start_at {
            return Err(StorageError::InvalidDateRange);
        }

        let mut tx = self.pool.begin().await?;

        UserRepository::new(&mut tx).find_by_id(created_by).await?;

        let cycle = CycleRepository::new(&mut tx)
            .create(&req.name, req.start_at, req.end_at, created_by)
            .await?;

        AuditRepository::new(&mut tx)
            .record(
                Some(created_by),
                "cycle.create",
                "cycle",
                Some(cycle.cycle_id),
                Some(json!({ "name": cycle.name })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Created cycle {} ({})", cycle.name, cycle.cycle_id);
        Ok(cycle)
    }

    pub async fn update_cycle(
        &self,
        cycle_id: Uuid,
        patch: UpdateCycleRequest,
        actor_user_id: Option<Uuid>,
    ) -> Result<Cycle> {
        let mut tx = self.pool.begin().await?;

        let current = CycleRepository::new(&mut tx).find_for_update(cycle_id).await?;
        let merged = plan_update(&current, patch)?;
        let saved = CycleRepository::new(&mut tx).update(&merged).await?;

        let mut audit = AuditRepository::new(&mut tx);
        audit
            .record(
                actor_user_id,
                "cycle.update",
                "cycle",
                Some(cycle_id),
                Some(json!({
                    "from_status": current.status,
                    "to_status": saved.status,
                })),
            )
            .await?;

        if saved.status != current.status {
            let action = match saved.status {
                CycleStatus::Open => "cycle.open",
                _ => "cycle.close",
            };
            audit
                .record(actor_user_id, action, "cycle", Some(cycle_id), None)
                .await?;
        }

        tx.commit().await?;

        if saved.status != current.status {
            tracing::info!(
                "Cycle {} moved {} -> {}",
                cycle_id,
                current.status.as_str(),
                saved.status.as_str()
            );
        }
        Ok(saved)
    }

    pub async fn open_cycle(&self, cycle_id: Uuid, actor_user_id: Option<Uuid>) -> Result<Cycle> {
        self.transition(cycle_id, CycleStatus::Draft, CycleStatus::Open, actor_user_id)
            .await
    }

    pub async fn close_cycle(&self, cycle_id: Uuid, actor_user_id: Option<Uuid>) -> Result<Cycle> {
        self.transition(cycle_id, CycleStatus::Open, CycleStatus::Closed, actor_user_id)
            .await
    }

    async fn transition(
        &self,
        cycle_id: Uuid,
        from: CycleStatus,
        to: CycleStatus,
        actor_user_id: Option<Uuid>,
    ) -> Result<Cycle> {
        let mut conn = self.pool.acquire().await?;
        let current = CycleRepository::new(&mut conn).find_by_id(cycle_id).await?;
        drop(conn);

        if current.status != from {
            return Err(StorageError::InvalidTransition(format!(
                "cannot move cycle from {} to {}",
                current.status.as_str(),
                to.as_str()
            )));
        }

        self.update_cycle(cycle_id, UpdateCycleRequest::status(to), actor_user_id)
            .await
    }

    /// Delete a DRAFT cycle that never received a nomination
    pub async fn delete_cycle(&self, cycle_id: Uuid, actor_user_id: Option<Uuid>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let cycle = CycleRepository::new(&mut tx).find_for_update(cycle_id).await?;
        if cycle.status != CycleStatus::Draft {
            return Err(StorageError::CycleNotDraft);
        }
        if CycleRepository::new(&mut tx).count_nominations(cycle_id).await? > 0 {
            return Err(StorageError::CycleHasNominations);
        }

        CycleRepository::new(&mut tx).delete(cycle_id).await?;
        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                "cycle.delete",
                "cycle",
                Some(cycle_id),
                Some(json!({ "name": cycle.name })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Deleted cycle {}", cycle_id);
        Ok(())
    }

    pub async fn get_cycle(&self, cycle_id: Uuid) -> Result<Cycle> {
        let mut conn = self.pool.acquire().await?;
        CycleRepository::new(&mut conn).find_by_id(cycle_id).await
    }

    pub async fn list_cycles(&self, page: &PaginationParams) -> Result<(Vec<Cycle>, i64)> {
        let mut conn = self.pool.acquire().await?;
        CycleRepository::new(&mut conn).list(page).await
    }
}

/// Merge a patch into a cycle, enforcing the edit rules of each status.
fn plan_update(current: &Cycle, patch: UpdateCycleRequest) -> Result<Cycle> {
    if current.status.is_terminal() {
        return Err(StorageError::CycleFinalized);
    }

    let mut merged = current.clone();

    if let Some(status) = patch.status {
        if status == CycleStatus::Finalized {
            return Err(StorageError::InvalidTransition(
                "cycles are finalized through the finalize operation".to_string(),
            ));
        }
        if !current.status.can_transition_to(status) {
            return Err(StorageError::InvalidTransition(format!(
                "cannot move cycle from {} to {}",
                current.status.as_str(),
                status.as_str()
            )));
        }
        merged.status = status;
    }

    if let Some(name) = patch.name {
        if name != current.name && current.status != CycleStatus::Draft {
            return Err(StorageError::InvalidTransition(format!(
                "cycle name cannot change while cycle is {}",
                current.status.as_str()
            )));
        }
        merged.name = name;
    }

    if let Some(start_at) = patch.start_at {
        merged.start_at = start_at;
    }
    if let Some(end_at) = patch.end_at {
        merged.end_at = end_at;
    }
    if merged.end_at <= merged.start_at {
        return Err(StorageError::InvalidDateRange);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn cycle(status: CycleStatus) -> Cycle {
        let now = Utc::now();
        Cycle {
            cycle_id: Uuid::new_v4(),
            name: "2025 H1".to_string(),
            start_at: now,
            end_at: now + Duration::days(30),
            status,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_draft_is_fully_editable() {
        let current = cycle(CycleStatus::Draft);
        let patch = UpdateCycleRequest {
            name: Some("2025 H2".to_string()),
            status: Some(CycleStatus::Open),
            ..Default::default()
        };

        let merged = plan_update(&current, patch).unwrap();
        assert_eq!(merged.name, "2025 H2");
        assert_eq!(merged.status, CycleStatus::Open);
    }

    #[test]
    fn test_open_cycle_rejects_rename() {
        let current = cycle(CycleStatus::Open);
        let patch = UpdateCycleRequest {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            plan_update(&current, patch),
            Err(StorageError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_same_status_is_a_no_op() {
        let current = cycle(CycleStatus::Closed);
        let merged = plan_update(&current, UpdateCycleRequest::status(CycleStatus::Closed)).unwrap();
        assert_eq!(merged.status, CycleStatus::Closed);
    }

    #[test]
    fn test_status_cannot_skip_or_reverse() {
        let draft = cycle(CycleStatus::Draft);
        assert!(plan_update(&draft, UpdateCycleRequest::status(CycleStatus::Closed)).is_err());

        let closed = cycle(CycleStatus::Closed);
        assert!(plan_update(&closed, UpdateCycleRequest::status(CycleStatus::Open)).is_err());
        assert!(plan_update(&closed, UpdateCycleRequest::status(CycleStatus::Finalized)).is_err());
    }

    #[test]
    fn test_finalized_cycle_is_immutable() {
        let current = cycle(CycleStatus::Finalized);
        assert!(matches!(
            plan_update(&current, UpdateCycleRequest::default()),
            Err(StorageError::CycleFinalized)
        ));
    }

    #[test]
    fn test_merged_dates_must_stay_ordered() {
        let current = cycle(CycleStatus::Open);
        let patch = UpdateCycleRequest {
            end_at: Some(current.start_at - Duration::hours(1)),
            ..Default::default()
        };

        assert!(matches!(
            plan_update(&current, patch),
            Err(StorageError::InvalidDateRange)
        ));
    }
}
