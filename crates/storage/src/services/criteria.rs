use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::dto::criteria::{CreateCriteriaRequest, UpdateCriteriaRequest};
use crate::error::{Result, StorageError};
use crate::models::{Criteria, Cycle, CycleStatus};
use crate::repository::audit::AuditRepository;
use crate::repository::criteria::CriteriaRepository;
use crate::repository::cycle::CycleRepository;

/// Owns the weighted criteria attached to each cycle.
pub struct CriteriaStore<'a> {
    pool: &'a PgPool,
    config: &'a WorkflowConfig,
}

impl<'a> CriteriaStore<'a> {
    pub fn new(pool: &'a PgPool, config: &'a WorkflowConfig) -> Self {
        Self { pool, config }
    }

    /// Add a batch of criteria to a cycle. Either every item is created or none is.
    pub async fn add_criteria(
        &self,
        cycle_id: Uuid,
        items: &[CreateCriteriaRequest],
        actor_user_id: Option<Uuid>,
    ) -> Result<Vec<Criteria>> {
        for item in items {
            validate_weight(item.weight)?;
        }

        let mut tx = self.pool.begin().await?;

        let cycle = CycleRepository::new(&mut tx).find_for_update(cycle_id).await?;
        ensure_mutable(&cycle)?;

        let current = CriteriaRepository::new(&mut tx)
            .active_weight_sum(cycle_id)
            .await?;
        let added: Decimal = items
            .iter()
            .filter(|item| item.is_active)
            .map(|item| item.weight)
            .sum();
        tracing::debug!(
            "Active weight for cycle {}: {} existing + {} added",
            cycle_id,
            current,
            added
        );
        check_ceiling(current + added, self.config.weight_ceiling)?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let criteria = CriteriaRepository::new(&mut tx).create(cycle_id, item).await?;
            AuditRepository::new(&mut tx)
                .record(
                    actor_user_id,
                    "criteria.add",
                    "criteria",
                    Some(criteria.criteria_id),
                    Some(json!({
                        "cycle_id": cycle_id,
                        "name": criteria.name,
                        "weight": criteria.weight,
                    })),
                )
                .await?;
            created.push(criteria);
        }

        tx.commit().await?;

        tracing::info!("Added {} criteria to cycle {}", created.len(), cycle_id);
        Ok(created)
    }

    pub async fn update_criteria(
        &self,
        criteria_id: Uuid,
        patch: UpdateCriteriaRequest,
        actor_user_id: Option<Uuid>,
    ) -> Result<Criteria> {
        let mut tx = self.pool.begin().await?;

        let current = CriteriaRepository::new(&mut tx).find_by_id(criteria_id).await?;
        let cycle = CycleRepository::new(&mut tx)
            .find_for_update(current.cycle_id)
            .await?;
        ensure_mutable(&cycle)?;

        let updated = apply_patch(&current, &cycle, patch)?;

        let reactivated = updated.is_active && !current.is_active;
        if updated.weight != current.weight || reactivated {
            let sum = CriteriaRepository::new(&mut tx)
                .active_weight_sum(cycle.cycle_id)
                .await?;
            let before = if current.is_active { current.weight } else { Decimal::ZERO };
            let after = if updated.is_active { updated.weight } else { Decimal::ZERO };
            check_ceiling(sum - before + after, self.config.weight_ceiling)?;
        }

        let saved = CriteriaRepository::new(&mut tx).update(&updated).await?;
        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                "criteria.update",
                "criteria",
                Some(criteria_id),
                Some(json!({
                    "cycle_id": saved.cycle_id,
                    "weight": saved.weight,
                    "is_active": saved.is_active,
                })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Updated criteria {}", criteria_id);
        Ok(saved)
    }

    /// Delete a criterion nobody has answered or reviewed yet
    pub async fn delete_criteria(&self, criteria_id: Uuid, actor_user_id: Option<Uuid>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let criteria = CriteriaRepository::new(&mut tx).find_by_id(criteria_id).await?;
        let cycle = CycleRepository::new(&mut tx)
            .find_for_update(criteria.cycle_id)
            .await?;
        ensure_mutable(&cycle)?;

        if CriteriaRepository::new(&mut tx).usage_count(criteria_id).await? > 0 {
            return Err(StorageError::CriteriaInUse);
        }

        CriteriaRepository::new(&mut tx).delete(criteria_id).await?;
        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                "criteria.delete",
                "criteria",
                Some(criteria_id),
                Some(json!({ "cycle_id": criteria.cycle_id, "name": criteria.name })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Deleted criteria {}", criteria_id);
        Ok(())
    }

    pub async fn get_criteria(&self, criteria_id: Uuid) -> Result<Criteria> {
        let mut conn = self.pool.acquire().await?;
        CriteriaRepository::new(&mut conn).find_by_id(criteria_id).await
    }

    pub async fn list_criteria(&self, cycle_id: Uuid, active_only: bool) -> Result<Vec<Criteria>> {
        let mut conn = self.pool.acquire().await?;
        CycleRepository::new(&mut conn).find_by_id(cycle_id).await?;
        CriteriaRepository::new(&mut conn)
            .list_for_cycle(cycle_id, active_only)
            .await
    }
}

fn ensure_mutable(cycle: &Cycle) -> Result<()> {
    if cycle.status.is_terminal() {
        return Err(StorageError::CycleFinalized);
    }
    Ok(())
}

/// Weights are stored as NUMERIC(5,2); anything finer would be rounded after the ceiling check
fn validate_weight(weight: Decimal) -> Result<()> {
    if weight < Decimal::ZERO || weight.normalize().scale() > 2 {
        return Err(StorageError::InvalidWeight);
    }
    Ok(())
}

fn check_ceiling(total: Decimal, ceiling: Decimal) -> Result<()> {
    if total > ceiling {
        return Err(StorageError::WeightCeilingExceeded { total, ceiling });
    }
    Ok(())
}

/// Merge a patch into a criterion. Name and weight are frozen once the cycle leaves DRAFT.
fn apply_patch(current: &Criteria, cycle: &Cycle, patch: UpdateCriteriaRequest) -> Result<Criteria> {
    let mut updated = current.clone();

    if let Some(name) = patch.name {
        if name != current.name && cycle.status != CycleStatus::Draft {
            return Err(StorageError::InvalidTransition(format!(
                "criteria name cannot change while cycle is {}",
                cycle.status.as_str()
            )));
        }
        updated.name = name;
    }

    if let Some(weight) = patch.weight {
        validate_weight(weight)?;
        if weight != current.weight && cycle.status != CycleStatus::Draft {
            return Err(StorageError::InvalidTransition(format!(
                "criteria weight cannot change while cycle is {}",
                cycle.status.as_str()
            )));
        }
        updated.weight = weight;
    }

    if let Some(description) = patch.description {
        updated.description = Some(description);
    }

    if let Some(is_active) = patch.is_active {
        updated.is_active = is_active;
    }

    if let Some(config) = patch.config {
        updated.config = Some(sqlx::types::Json(config));
    }

    Ok(updated)
}
