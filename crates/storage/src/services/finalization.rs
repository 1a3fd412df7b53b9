use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::ranking::FinalizeResult;
use crate::error::{Result, StorageError};
use crate::models::{CycleStatus, NominationHistory, RankingHistory};
use crate::repository::audit::AuditRepository;
use crate::repository::cycle::CycleRepository;
use crate::repository::history::HistoryRepository;
use crate::repository::nomination::NominationRepository;
use crate::services::ranking::compute_rankings;

/// The single irreversible step of a cycle: CLOSED -> FINALIZED.
///
/// Rankings are recomputed, then every nomination and ranking of the cycle is
/// copied into the history tables, all in one transaction.
pub struct Finalization<'a> {
    pool: &'a PgPool,
}

impl<'a> Finalization<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn finalize(&self, cycle_id: Uuid, actor_user_id: Option<Uuid>) -> Result<FinalizeResult> {
        let mut tx = self.pool.begin().await?;

        let cycle = CycleRepository::new(&mut tx).find_for_update(cycle_id).await?;
        if cycle.status != CycleStatus::Closed {
            return Err(StorageError::CycleNotClosed);
        }

        let rankings = compute_rankings(&mut tx, cycle_id, actor_user_id).await?;

        let nominations = NominationRepository::new(&mut tx)
            .list_for_cycle(cycle_id)
            .await?;
        for nomination in &nominations {
            let answers = NominationRepository::new(&mut tx)
                .scores_for(nomination.nomination_id)
                .await?;
            HistoryRepository::new(&mut tx)
                .snapshot_nomination(nomination, Some(json!({ "answers": answers })))
                .await?;
        }

        let mut history = HistoryRepository::new(&mut tx);
        for ranking in &rankings {
            history.snapshot_ranking(ranking).await?;
        }

        CycleRepository::new(&mut tx)
            .set_status(cycle_id, CycleStatus::Finalized)
            .await?;

        let result = FinalizeResult {
            cycle_id,
            rankings_created: rankings.len(),
            nominations_snapshotted: nominations.len(),
        };

        AuditRepository::new(&mut tx)
            .record(
                actor_user_id,
                "cycle.finalize",
                "cycle",
                Some(cycle_id),
                Some(json!({
                    "rankings_created": result.rankings_created,
                    "nominations_snapshotted": result.nominations_snapshotted,
                })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Finalized cycle {}: {} nominations, {} rankings archived",
            cycle_id,
            result.nominations_snapshotted,
            result.rankings_created
        );
        Ok(result)
    }

    pub async fn list_nomination_history(&self, cycle_id: Uuid) -> Result<Vec<NominationHistory>> {
        let mut conn = self.pool.acquire().await?;
        CycleRepository::new(&mut conn).find_by_id(cycle_id).await?;
        HistoryRepository::new(&mut conn).list_nominations(cycle_id).await
    }

    pub async fn list_ranking_history(&self, cycle_id: Uuid) -> Result<Vec<RankingHistory>> {
        let mut conn = self.pool.acquire().await?;
        CycleRepository::new(&mut conn).find_by_id(cycle_id).await?;
        HistoryRepository::new(&mut conn).list_rankings(cycle_id).await
    }
}
