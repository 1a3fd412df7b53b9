#![allow(dead_code)]

use awards_storage::{Database, WorkflowConfig};
use awards_web::{app, middleware::auth::ApiKeys, state::AppState};
use axum::{
    Router,
    body::Body,
    http::{
        Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const API_KEY: &str = "test-key";

pub fn test_app(pool: PgPool) -> Router {
    app(
        AppState::new(Database::from_pool(pool), WorkflowConfig::default()),
        ApiKeys::from_comma_separated(API_KEY),
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn id(&self, key: &str) -> Uuid {
        Uuid::parse_str(self.body[key].as_str().unwrap()).unwrap()
    }

    pub fn kind(&self) -> &str {
        self.body["kind"].as_str().unwrap_or_default()
    }
}

/// Send one request with the test API key, an optional actor and an optional JSON body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    actor: Option<Uuid>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", API_KEY));
    if let Some(actor) = actor {
        builder = builder.header("x-actor-id", actor.to_string());
    }

    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse { status, body }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, actor: Uuid, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(actor), Some(body)).await
}

pub async fn post_empty(app: &Router, uri: &str, actor: Uuid) -> TestResponse {
    send(app, Method::POST, uri, Some(actor), None).await
}

/// Users created through the directory endpoints
pub struct People {
    pub team_id: Uuid,
    pub hr: Uuid,
    pub manager: Uuid,
    pub lead: Uuid,
    pub nominees: Vec<Uuid>,
}

async fn create_user(app: &Router, team_id: Uuid, name: &str, role: &str) -> Uuid {
    let response = send(
        app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "role": role,
            "team_id": team_id,
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.id("user_id")
}

pub async fn seed_people(app: &Router) -> People {
    let team = send(
        app,
        Method::POST,
        "/api/teams",
        None,
        Some(json!({ "name": "Platform" })),
    )
    .await;
    assert_eq!(team.status, StatusCode::CREATED);
    let team_id = team.id("team_id");

    let hr = create_user(app, team_id, "hana", "HR").await;
    let manager = create_user(app, team_id, "mia", "MANAGER").await;
    let lead = create_user(app, team_id, "leo", "TEAM_LEAD").await;
    let mut nominees = Vec::new();
    for name in ["nina", "noah"] {
        nominees.push(create_user(app, team_id, name, "EMPLOYEE").await);
    }

    People {
        team_id,
        hr,
        manager,
        lead,
        nominees,
    }
}

/// An OPEN cycle with two criteria weighted 4 and 6; returns the cycle id and criteria ids
pub async fn open_cycle(app: &Router, people: &People, name: &str) -> (Uuid, Vec<Uuid>) {
    let now = Utc::now();
    let cycle = post(
        app,
        "/api/cycles",
        people.hr,
        json!({
            "name": name,
            "start_at": now - Duration::days(1),
            "end_at": now + Duration::days(30),
        }),
    )
    .await;
    assert_eq!(cycle.status, StatusCode::CREATED, "{}", cycle.body);
    let cycle_id = cycle.id("cycle_id");

    let criteria = post(
        app,
        &format!("/api/cycles/{}/criteria", cycle_id),
        people.hr,
        json!([
            { "name": "Impact", "weight": "4" },
            { "name": "Teamwork", "weight": "6" },
        ]),
    )
    .await;
    assert_eq!(criteria.status, StatusCode::CREATED, "{}", criteria.body);
    let criteria_ids = criteria
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| Uuid::parse_str(c["criteria_id"].as_str().unwrap()).unwrap())
        .collect();

    let opened = post_empty(app, &format!("/api/cycles/{}/open", cycle_id), people.hr).await;
    assert_eq!(opened.status, StatusCode::OK, "{}", opened.body);

    (cycle_id, criteria_ids)
}

pub fn submission(cycle_id: Uuid, nominee: Uuid, criteria: &[Uuid], scores: &[i32]) -> Value {
    let scores: Vec<Value> = criteria
        .iter()
        .zip(scores)
        .map(|(id, score)| json!({ "criteria_id": id, "score": score }))
        .collect();

    json!({
        "cycle_id": cycle_id,
        "nominee_user_id": nominee,
        "scores": scores,
    })
}
