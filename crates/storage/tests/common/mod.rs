#![allow(dead_code)]

use std::str::FromStr;

use awards_storage::WorkflowConfig;
use awards_storage::dto::criteria::CreateCriteriaRequest;
use awards_storage::dto::cycle::CreateCycleRequest;
use awards_storage::dto::nomination::{AnswerInput, CriteriaAnswerInput, SubmitNominationRequest};
use awards_storage::dto::user::{CreateTeamRequest, CreateUserRequest};
use awards_storage::models::{Criteria, CriteriaConfig, Cycle, Team, User, UserRole};
use awards_storage::services::{CriteriaStore, CycleService, Directory};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Users and policy shared by the workflow tests
pub struct Fixture {
    pub config: WorkflowConfig,
    pub team: Team,
    pub hr: User,
    pub manager: User,
    pub other_manager: User,
    pub lead: User,
    pub employee: User,
    pub nominees: Vec<User>,
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn user(pool: &PgPool, team: &Team, name: &str, role: UserRole) -> User {
    let req = CreateUserRequest {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role,
        team_id: Some(team.team_id),
    };
    Directory::new(pool).create_user(&req, None).await.unwrap()
}

pub async fn seed(pool: &PgPool) -> Fixture {
    let team = Directory::new(pool)
        .create_team(
            &CreateTeamRequest {
                name: "Platform".to_string(),
            },
            None,
        )
        .await
        .unwrap();

    let hr = user(pool, &team, "Hana HR", UserRole::Hr).await;
    let manager = user(pool, &team, "Mia Manager", UserRole::Manager).await;
    let other_manager = user(pool, &team, "Omar Manager", UserRole::Manager).await;
    let lead = user(pool, &team, "Leo Lead", UserRole::TeamLead).await;
    let employee = user(pool, &team, "Eve Employee", UserRole::Employee).await;

    let mut nominees = Vec::new();
    for i in 0..4 {
        nominees.push(user(pool, &team, &format!("Nominee {i}"), UserRole::Employee).await);
    }

    Fixture {
        config: WorkflowConfig::default(),
        team,
        hr,
        manager,
        other_manager,
        lead,
        employee,
        nominees,
    }
}

/// A DRAFT cycle whose submission window contains now
pub async fn draft_cycle(pool: &PgPool, fixture: &Fixture, name: &str) -> Cycle {
    let now = Utc::now();
    let req = CreateCycleRequest {
        name: name.to_string(),
        start_at: now - Duration::days(1),
        end_at: now + Duration::days(30),
    };
    CycleService::new(pool)
        .create_cycle(&req, fixture.hr.user_id)
        .await
        .unwrap()
}

pub fn criteria_request(name: &str, weight: &str) -> CreateCriteriaRequest {
    CreateCriteriaRequest {
        name: name.to_string(),
        weight: dec(weight),
        description: None,
        is_active: true,
        config: None,
    }
}

pub fn multi_select_request(name: &str, weight: &str) -> CreateCriteriaRequest {
    CreateCriteriaRequest {
        config: Some(CriteriaConfig::MultiSelect {
            required: true,
            options: vec!["Python".to_string(), "React".to_string(), "Rust".to_string()],
        }),
        ..criteria_request(name, weight)
    }
}

/// An OPEN cycle with the given criteria
pub async fn open_cycle(
    pool: &PgPool,
    fixture: &Fixture,
    name: &str,
    criteria: &[CreateCriteriaRequest],
) -> (Cycle, Vec<Criteria>) {
    let cycle = draft_cycle(pool, fixture, name).await;
    let created = CriteriaStore::new(pool, &fixture.config)
        .add_criteria(cycle.cycle_id, criteria, Some(fixture.hr.user_id))
        .await
        .unwrap();
    let cycle = CycleService::new(pool)
        .open_cycle(cycle.cycle_id, Some(fixture.hr.user_id))
        .await
        .unwrap();
    (cycle, created)
}

pub fn score(criteria_id: Uuid, value: i32) -> CriteriaAnswerInput {
    CriteriaAnswerInput {
        criteria_id,
        score: Some(value),
        comment: None,
        answer: None,
    }
}

pub fn text_answer(criteria_id: Uuid, text: &str) -> CriteriaAnswerInput {
    CriteriaAnswerInput {
        criteria_id,
        score: None,
        comment: None,
        answer: Some(AnswerInput {
            text: Some(text.to_string()),
            ..Default::default()
        }),
    }
}

pub fn submission(cycle: &Cycle, nominee: &User, scores: Vec<CriteriaAnswerInput>) -> SubmitNominationRequest {
    SubmitNominationRequest {
        cycle_id: cycle.cycle_id,
        nominee_user_id: nominee.user_id,
        scores,
    }
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
