use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::dto::common::PaginationParams;
use crate::dto::nomination::{
    CriteriaAnswerInput, NominationDetail, NominationFilter, SubmitNominationRequest,
};
use crate::error::{Result, StorageError};
use crate::models::{Criteria, MAX_SCORE, MIN_SCORE, Nomination};
use crate::repository::audit::AuditRepository;
use crate::repository::criteria::CriteriaRepository;
use crate::repository::cycle::CycleRepository;
use crate::repository::nomination::{NewCriteriaScore, NewNomination, NominationRepository};
use crate::repository::user::UserRepository;

/// Submission and lookup of nominations.
///
/// Every check runs before the first insert; the nomination, its answers and
/// the audit record are written in one transaction.
pub struct NominationWorkflow<'a> {
    pool: &'a PgPool,
    config: &'a WorkflowConfig,
}

impl<'a> NominationWorkflow<'a> {
    pub fn new(pool: &'a PgPool, config: &'a WorkflowConfig) -> Self {
        Self { pool, config }
    }

    pub async fn submit(
        &self,
        req: SubmitNominationRequest,
        submitted_by: Uuid,
    ) -> Result<NominationDetail> {
        let mut tx = self.pool.begin().await?;

        let cycle = CycleRepository::new(&mut tx).find_by_id(req.cycle_id).await?;
        let now = Utc::now();
        if !cycle.accepts_submissions_at(now) {
            return Err(StorageError::CycleNotOpen);
        }

        let submitter = UserRepository::new(&mut tx).find_by_id(submitted_by).await?;
        if !submitter.is_active() {
            return Err(StorageError::InactiveUser(submitted_by));
        }
        if !self.config.can_submit(submitter.role) {
            return Err(StorageError::PermissionDenied(format!(
                "role {} cannot submit nominations",
                submitter.role
            )));
        }

        let nominee = UserRepository::new(&mut tx)
            .find_by_id(req.nominee_user_id)
            .await?;

        let active = CriteriaRepository::new(&mut tx)
            .list_for_cycle(cycle.cycle_id, true)
            .await?;
        let scores = prepare_answers(&active, req.scores)?;

        if NominationRepository::new(&mut tx)
            .exists_for_nominee(cycle.cycle_id, nominee.user_id)
            .await?
        {
            return Err(StorageError::DuplicateNomination);
        }

        let mut repo = NominationRepository::new(&mut tx);
        let nomination = repo
            .create(&NewNomination {
                cycle_id: cycle.cycle_id,
                nominee_user_id: nominee.user_id,
                team_id: nominee.team_id,
                submitted_by,
                submitted_at: now,
            })
            .await?;

        let mut answers = Vec::with_capacity(scores.len());
        for score in scores {
            answers.push(repo.insert_score(nomination.nomination_id, score).await?);
        }

        AuditRepository::new(&mut tx)
            .record(
                Some(submitted_by),
                "nomination.submit",
                "nomination",
                Some(nomination.nomination_id),
                Some(json!({
                    "cycle_id": cycle.cycle_id,
                    "nominee_user_id": nominee.user_id,
                    "answers": answers.len(),
                })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Nomination {} submitted for {} in cycle {}",
            nomination.nomination_id,
            nominee.user_id,
            cycle.cycle_id
        );
        Ok(NominationDetail { nomination, answers })
    }

    pub async fn get_nomination(&self, nomination_id: Uuid) -> Result<NominationDetail> {
        let mut conn = self.pool.acquire().await?;
        let mut repo = NominationRepository::new(&mut conn);
        let nomination = repo.find_by_id(nomination_id).await?;
        let answers = repo.scores_for(nomination_id).await?;

        Ok(NominationDetail { nomination, answers })
    }

    pub async fn list_nominations(
        &self,
        filter: &NominationFilter,
        page: &PaginationParams,
    ) -> Result<(Vec<Nomination>, i64)> {
        let mut conn = self.pool.acquire().await?;
        NominationRepository::new(&mut conn).list(filter, page).await
    }

    /// Hard delete of a nomination with its answers and approvals. Override roles only.
    pub async fn revert_nomination(&self, nomination_id: Uuid, actor_user_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let actor = UserRepository::new(&mut tx).find_by_id(actor_user_id).await?;
        if !actor.is_active() {
            return Err(StorageError::InactiveUser(actor_user_id));
        }
        if !self.config.is_override(actor.role) {
            return Err(StorageError::PermissionDenied(format!(
                "role {} cannot revert nominations",
                actor.role
            )));
        }

        let nomination = NominationRepository::new(&mut tx)
            .find_for_update(nomination_id)
            .await?;
        let cycle = CycleRepository::new(&mut tx)
            .find_by_id(nomination.cycle_id)
            .await?;
        if cycle.status.is_terminal() {
            return Err(StorageError::CycleFinalized);
        }

        NominationRepository::new(&mut tx).delete(nomination_id).await?;
        AuditRepository::new(&mut tx)
            .record(
                Some(actor_user_id),
                "nomination.revert",
                "nomination",
                Some(nomination_id),
                Some(json!({
                    "cycle_id": nomination.cycle_id,
                    "nominee_user_id": nomination.nominee_user_id,
                    "status": nomination.status,
                })),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Nomination {} reverted by {}", nomination_id, actor_user_id);
        Ok(())
    }
}

/// Resolve submitted answers against the cycle's active criteria.
///
/// Each answer keeps only the keys relevant to its criterion's question type.
fn prepare_answers(
    active: &[Criteria],
    inputs: Vec<CriteriaAnswerInput>,
) -> Result<Vec<NewCriteriaScore>> {
    let by_id: HashMap<Uuid, &Criteria> = active.iter().map(|c| (c.criteria_id, c)).collect();
    let mut seen = HashSet::with_capacity(inputs.len());

    inputs
        .into_iter()
        .map(|input| {
            let criteria = by_id
                .get(&input.criteria_id)
                .ok_or(StorageError::CriteriaMismatch(input.criteria_id))?;
            if !seen.insert(input.criteria_id) {
                return Err(StorageError::DuplicateAnswer(input.criteria_id));
            }
            if let Some(score) = input.score {
                if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                    return Err(StorageError::ScoreOutOfRange(score));
                }
            }

            Ok(NewCriteriaScore {
                criteria_id: input.criteria_id,
                score: input.score,
                answer: input
                    .answer
                    .map(|answer| answer.into_answer(criteria.question_type())),
                comment: input.comment,
            })
        })
        .collect()
}
