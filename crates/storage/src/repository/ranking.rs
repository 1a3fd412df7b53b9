use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::ranking::RankingFilter;
use crate::error::Result;
use crate::models::Ranking;

const RANKING_COLUMNS: &str =
    "ranking_id, cycle_id, team_id, nominee_user_id, total_score, rank, computed_at";

/// One answer of an approved nomination, joined with what ranking needs.
///
/// A nomination without answers yields a single row whose criterion columns
/// are all `NULL`.
#[derive(Debug, Clone, FromRow)]
pub struct ApprovedScoreRow {
    pub nomination_id: Uuid,
    pub nominee_user_id: Uuid,
    pub team_id: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
    pub criteria_weight: Option<Decimal>,
    pub legacy_score: Option<i32>,
    pub review_rating: Option<Decimal>,
}

/// Values of a ranking row about to be inserted
#[derive(Debug, Clone)]
pub struct NewRanking {
    pub team_id: Option<Uuid>,
    pub nominee_user_id: Uuid,
    pub total_score: Decimal,
    pub rank: i32,
}

pub struct RankingRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> RankingRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn approved_score_rows(&mut self, cycle_id: Uuid) -> Result<Vec<ApprovedScoreRow>> {
        let rows = sqlx::query_as::<_, ApprovedScoreRow>(
            r#"
            SELECT
                n.nomination_id,
                n.nominee_user_id,
                n.team_id,
                n.submitted_at,
                c.weight AS criteria_weight,
                s.score AS legacy_score,
                r.rating AS review_rating
            FROM nominations n
            LEFT JOIN nomination_criteria_scores s ON s.nomination_id = n.nomination_id
            LEFT JOIN criteria c ON c.criteria_id = s.criteria_id
            LEFT JOIN approvals a
                ON a.nomination_id = n.nomination_id AND a.action = 'APPROVE'
            LEFT JOIN approval_criteria_reviews r
                ON r.approval_id = a.approval_id AND r.criteria_id = s.criteria_id
            WHERE n.cycle_id = $1 AND n.status = 'APPROVED'
            ORDER BY n.submitted_at, n.nomination_id
            "#,
        )
        .bind(cycle_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    pub async fn delete_for_cycle(&mut self, cycle_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM rankings WHERE cycle_id = $1")
            .bind(cycle_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert(
        &mut self,
        cycle_id: Uuid,
        new: &NewRanking,
        computed_at: DateTime<Utc>,
    ) -> Result<Ranking> {
        let query = format!(
            "INSERT INTO rankings (cycle_id, team_id, nominee_user_id, total_score, rank, computed_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {RANKING_COLUMNS}"
        );
        let ranking = sqlx::query_as::<_, Ranking>(&query)
            .bind(cycle_id)
            .bind(new.team_id)
            .bind(new.nominee_user_id)
            .bind(new.total_score)
            .bind(new.rank)
            .bind(computed_at)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(ranking)
    }

    /// Rankings of a cycle ordered by rank
    pub async fn list(
        &mut self,
        cycle_id: Uuid,
        filter: &RankingFilter,
        page: &PaginationParams,
    ) -> Result<(Vec<Ranking>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM rankings WHERE cycle_id = ");
        count_query.push_bind(cycle_id);
        if let Some(team_id) = filter.team_id {
            count_query.push(" AND team_id = ");
            count_query.push_bind(team_id);
        }
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.conn)
            .await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {RANKING_COLUMNS} FROM rankings WHERE cycle_id = "
        ));
        query.push_bind(cycle_id);
        if let Some(team_id) = filter.team_id {
            query.push(" AND team_id = ");
            query.push_bind(team_id);
        }
        query.push(" ORDER BY rank, total_score DESC, ranking_id LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rankings = query
            .build_query_as::<Ranking>()
            .fetch_all(&mut *self.conn)
            .await?;

        Ok((rankings, total))
    }
}
