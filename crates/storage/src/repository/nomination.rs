use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::nomination::NominationFilter;
use crate::error::{Result, StorageError};
use crate::models::{Answer, CriteriaScore, Nomination, NominationStatus};

const NOMINATION_COLUMNS: &str =
    "nomination_id, cycle_id, nominee_user_id, team_id, submitted_by, submitted_at, status";

/// Values of a nomination row about to be inserted
#[derive(Debug, Clone)]
pub struct NewNomination {
    pub cycle_id: Uuid,
    pub nominee_user_id: Uuid,
    pub team_id: Option<Uuid>,
    pub submitted_by: Uuid,
    pub submitted_at: DateTime<Utc>,
}

/// Values of an answer row about to be inserted
#[derive(Debug, Clone)]
pub struct NewCriteriaScore {
    pub criteria_id: Uuid,
    pub score: Option<i32>,
    pub answer: Option<Answer>,
    pub comment: Option<String>,
}

/// Repository for nominations and their answers
pub struct NominationRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> NominationRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Nomination> {
        let query = format!("SELECT {NOMINATION_COLUMNS} FROM nominations WHERE nomination_id = $1");
        sqlx::query_as::<_, Nomination>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NominationNotFound)
    }

    /// Load a nomination and lock its row until the surrounding transaction ends
    pub async fn find_for_update(&mut self, id: Uuid) -> Result<Nomination> {
        let query = format!(
            "SELECT {NOMINATION_COLUMNS} FROM nominations WHERE nomination_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, Nomination>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NominationNotFound)
    }

    pub async fn exists_for_nominee(&mut self, cycle_id: Uuid, nominee_user_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM nominations WHERE cycle_id = $1 AND nominee_user_id = $2)",
        )
        .bind(cycle_id)
        .bind(nominee_user_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(exists)
    }

    pub async fn create(&mut self, new: &NewNomination) -> Result<Nomination> {
        let query = format!(
            "INSERT INTO nominations (cycle_id, nominee_user_id, team_id, submitted_by, submitted_at, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {NOMINATION_COLUMNS}"
        );
        let nomination = sqlx::query_as::<_, Nomination>(&query)
            .bind(new.cycle_id)
            .bind(new.nominee_user_id)
            .bind(new.team_id)
            .bind(new.submitted_by)
            .bind(new.submitted_at)
            .bind(NominationStatus::Pending)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| StorageError::from(e).map_unique_violation())?;

        Ok(nomination)
    }

    pub async fn insert_score(
        &mut self,
        nomination_id: Uuid,
        score: NewCriteriaScore,
    ) -> Result<CriteriaScore> {
        let criteria_id = score.criteria_id;
        sqlx::query_as::<_, CriteriaScore>(
            r#"
            INSERT INTO nomination_criteria_scores (nomination_id, criteria_id, score, answer, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING score_id, nomination_id, criteria_id, score, answer, comment
            "#,
        )
        .bind(nomination_id)
        .bind(criteria_id)
        .bind(score.score)
        .bind(score.answer.map(Json))
        .bind(score.comment)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.constraint() == Some("uq_score_nomination_criteria") {
                StorageError::DuplicateAnswer(criteria_id)
            } else {
                err
            }
        })
    }

    /// Answers of a nomination in criteria creation order
    pub async fn scores_for(&mut self, nomination_id: Uuid) -> Result<Vec<CriteriaScore>> {
        let scores = sqlx::query_as::<_, CriteriaScore>(
            r#"
            SELECT s.score_id, s.nomination_id, s.criteria_id, s.score, s.answer, s.comment
            FROM nomination_criteria_scores s
            JOIN criteria c ON c.criteria_id = s.criteria_id
            WHERE s.nomination_id = $1
            ORDER BY c.created_at, s.criteria_id
            "#,
        )
        .bind(nomination_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(scores)
    }

    /// List nominations matching a filter, newest first
    pub async fn list(
        &mut self,
        filter: &NominationFilter,
        page: &PaginationParams,
    ) -> Result<(Vec<Nomination>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM nominations WHERE 1=1");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.conn)
            .await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {NOMINATION_COLUMNS} FROM nominations WHERE 1=1"
        ));
        push_filters(&mut query, filter);
        query.push(" ORDER BY submitted_at DESC, nomination_id LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let nominations = query
            .build_query_as::<Nomination>()
            .fetch_all(&mut *self.conn)
            .await?;

        Ok((nominations, total))
    }

    /// Every nomination of a cycle regardless of status, oldest first
    pub async fn list_for_cycle(&mut self, cycle_id: Uuid) -> Result<Vec<Nomination>> {
        let query = format!(
            "SELECT {NOMINATION_COLUMNS} FROM nominations
             WHERE cycle_id = $1
             ORDER BY submitted_at, nomination_id"
        );
        let nominations = sqlx::query_as::<_, Nomination>(&query)
            .bind(cycle_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(nominations)
    }

    pub async fn set_status(&mut self, id: Uuid, status: NominationStatus) -> Result<Nomination> {
        let query = format!(
            "UPDATE nominations SET status = $2 WHERE nomination_id = $1 RETURNING {NOMINATION_COLUMNS}"
        );
        sqlx::query_as::<_, Nomination>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NominationNotFound)
    }

    /// Hard delete; answers, approvals and reviews cascade
    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM nominations WHERE nomination_id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NominationNotFound);
        }

        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &NominationFilter) {
    if let Some(cycle_id) = filter.cycle_id {
        query.push(" AND cycle_id = ");
        query.push_bind(cycle_id);
    }

    if let Some(nominee) = filter.nominee_user_id {
        query.push(" AND nominee_user_id = ");
        query.push_bind(nominee);
    }

    if let Some(submitter) = filter.submitted_by {
        query.push(" AND submitted_by = ");
        query.push_bind(submitter);
    }

    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status);
    }
}
