use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::ranking::RankingFilter;
use crate::error::{Result, StorageError};
use crate::models::Ranking;
use crate::repository::audit::AuditRepository;
use crate::repository::cycle::CycleRepository;
use crate::repository::ranking::{ApprovedScoreRow, NewRanking, RankingRepository};

/// Weighted total of one approved nomination
#[derive(Debug, Clone, PartialEq)]
pub struct NomineeTotal {
    pub nomination_id: Uuid,
    pub nominee_user_id: Uuid,
    pub team_id: Option<Uuid>,
    pub total: Decimal,
}

/// Computes and serves the per-cycle ranking of approved nominations.
pub struct RankingEngine<'a> {
    pool: &'a PgPool,
}

impl<'a> RankingEngine<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Replace the ranking set of a cycle with a fresh computation
    pub async fn compute(&self, cycle_id: Uuid, actor_user_id: Option<Uuid>) -> Result<Vec<Ranking>> {
        let mut tx = self.pool.begin().await?;

        let cycle = CycleRepository::new(&mut tx).find_for_update(cycle_id).await?;
        if cycle.status.is_terminal() {
            return Err(StorageError::CycleFinalized);
        }

        let rankings = compute_rankings(&mut tx, cycle_id, actor_user_id).await?;

        tx.commit().await?;
        Ok(rankings)
    }

    pub async fn list_rankings(
        &self,
        cycle_id: Uuid,
        filter: &RankingFilter,
        page: &PaginationParams,
    ) -> Result<(Vec<Ranking>, i64)> {
        let mut conn = self.pool.acquire().await?;
        CycleRepository::new(&mut conn).find_by_id(cycle_id).await?;
        RankingRepository::new(&mut conn)
            .list(cycle_id, filter, page)
            .await
    }
}

/// Delete and rebuild the rankings of a cycle on the caller's connection.
///
/// The caller owns the transaction, so readers never observe an empty set.
pub(crate) async fn compute_rankings(
    conn: &mut PgConnection,
    cycle_id: Uuid,
    actor_user_id: Option<Uuid>,
) -> Result<Vec<Ranking>> {
    let mut repo = RankingRepository::new(conn);

    let rows = repo.approved_score_rows(cycle_id).await?;
    let ranked = rank_totals(aggregate_totals(&rows));

    let replaced = repo.delete_for_cycle(cycle_id).await?;
    let computed_at = Utc::now();

    let mut rankings = Vec::with_capacity(ranked.len());
    for new in &ranked {
        rankings.push(repo.insert(cycle_id, new, computed_at).await?);
    }

    AuditRepository::new(conn)
        .record(
            actor_user_id,
            "ranking.compute",
            "cycle",
            Some(cycle_id),
            Some(json!({ "rankings": rankings.len(), "replaced": replaced })),
        )
        .await?;

    tracing::info!(
        "Computed {} rankings for cycle {} (replaced {})",
        rankings.len(),
        cycle_id,
        replaced
    );
    Ok(rankings)
}

/// Numeric value of one answer on the 0-10 score scale.
///
/// The legacy integer score wins; otherwise the approver's per-criterion
/// rating, bounded by the weight, is rescaled to the same scale.
pub fn criterion_value(
    legacy_score: Option<i32>,
    review_rating: Option<Decimal>,
    weight: Decimal,
) -> Decimal {
    match (legacy_score, review_rating) {
        (Some(score), _) => Decimal::from(score),
        (None, Some(rating)) if weight > Decimal::ZERO => rating / weight * Decimal::TEN,
        _ => Decimal::ZERO,
    }
}

/// Sum `value * weight` per nomination, keeping the order rows arrive in.
pub fn aggregate_totals(rows: &[ApprovedScoreRow]) -> Vec<NomineeTotal> {
    let mut totals: Vec<NomineeTotal> = Vec::new();

    for row in rows {
        let contribution = row
            .criteria_weight
            .map(|weight| criterion_value(row.legacy_score, row.review_rating, weight) * weight)
            .unwrap_or(Decimal::ZERO);

        match totals.last_mut() {
            Some(last) if last.nomination_id == row.nomination_id => last.total += contribution,
            _ => totals.push(NomineeTotal {
                nomination_id: row.nomination_id,
                nominee_user_id: row.nominee_user_id,
                team_id: row.team_id,
                total: contribution,
            }),
        }
    }

    for total in &mut totals {
        total.total = total.total.round_dp(4);
    }
    totals
}

/// Dense ranks for scores already sorted descending.
///
/// Ties share a rank; the next lower score takes its 1-based position, so
/// `[90, 90, 80, 70]` ranks as `[1, 1, 3, 4]`.
pub fn assign_dense_ranks(sorted_scores: &[Decimal]) -> Vec<i32> {
    let mut ranks: Vec<i32> = Vec::with_capacity(sorted_scores.len());

    for (idx, score) in sorted_scores.iter().enumerate() {
        let rank = match ranks.last() {
            Some(&previous) if *score >= sorted_scores[idx - 1] => previous,
            _ => idx as i32 + 1,
        };
        ranks.push(rank);
    }

    ranks
}

/// Order totals by score, highest first, and attach dense ranks.
///
/// The sort is stable, so equal totals keep their submission order.
pub fn rank_totals(mut totals: Vec<NomineeTotal>) -> Vec<NewRanking> {
    totals.sort_by(|a, b| b.total.cmp(&a.total));

    let scores: Vec<Decimal> = totals.iter().map(|t| t.total).collect();
    let ranks = assign_dense_ranks(&scores);

    totals
        .into_iter()
        .zip(ranks)
        .map(|(total, rank)| NewRanking {
            team_id: total.team_id,
            nominee_user_id: total.nominee_user_id,
            total_score: total.total,
            rank,
        })
        .collect()
}
