use sqlx::PgConnection;
use sqlx::types::Json;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Nomination, NominationHistory, Ranking, RankingHistory};

/// Append-only access to the finalize snapshots. There is no update or delete path.
pub struct HistoryRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> HistoryRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn snapshot_nomination(
        &mut self,
        nomination: &Nomination,
        payload: Option<serde_json::Value>,
    ) -> Result<NominationHistory> {
        let row = sqlx::query_as::<_, NominationHistory>(
            r#"
            INSERT INTO nominations_history
                (source_nomination_id, cycle_id, nominee_user_id, team_id, submitted_by,
                 submitted_at, status, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING history_id, source_nomination_id, cycle_id, nominee_user_id, team_id,
                      submitted_by, submitted_at, status, payload, created_at
            "#,
        )
        .bind(nomination.nomination_id)
        .bind(nomination.cycle_id)
        .bind(nomination.nominee_user_id)
        .bind(nomination.team_id)
        .bind(nomination.submitted_by)
        .bind(nomination.submitted_at)
        .bind(nomination.status.as_str())
        .bind(payload.map(Json))
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(row)
    }

    pub async fn snapshot_ranking(&mut self, ranking: &Ranking) -> Result<RankingHistory> {
        let row = sqlx::query_as::<_, RankingHistory>(
            r#"
            INSERT INTO rankings_history
                (source_ranking_id, cycle_id, team_id, nominee_user_id, total_score, rank,
                 computed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING history_id, source_ranking_id, cycle_id, team_id, nominee_user_id,
                      total_score, rank, computed_at, created_at
            "#,
        )
        .bind(ranking.ranking_id)
        .bind(ranking.cycle_id)
        .bind(ranking.team_id)
        .bind(ranking.nominee_user_id)
        .bind(ranking.total_score)
        .bind(ranking.rank)
        .bind(ranking.computed_at)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(row)
    }

    pub async fn list_nominations(&mut self, cycle_id: Uuid) -> Result<Vec<NominationHistory>> {
        let rows = sqlx::query_as::<_, NominationHistory>(
            r#"
            SELECT history_id, source_nomination_id, cycle_id, nominee_user_id, team_id,
                   submitted_by, submitted_at, status, payload, created_at
            FROM nominations_history
            WHERE cycle_id = $1
            ORDER BY submitted_at, source_nomination_id
            "#,
        )
        .bind(cycle_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    pub async fn list_rankings(&mut self, cycle_id: Uuid) -> Result<Vec<RankingHistory>> {
        let rows = sqlx::query_as::<_, RankingHistory>(
            r#"
            SELECT history_id, source_ranking_id, cycle_id, team_id, nominee_user_id,
                   total_score, rank, computed_at, created_at
            FROM rankings_history
            WHERE cycle_id = $1
            ORDER BY rank, source_ranking_id
            "#,
        )
        .bind(cycle_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }
}
