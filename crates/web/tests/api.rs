mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::*;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Health and authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let app = test_app(pool);

    let response = get(&app, "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["database"], "up");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_mutation_without_api_key_is_unauthorized(pool: PgPool) {
    let app = test_app(pool);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/teams")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "name": "Platform" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_reads_do_not_need_api_key(pool: PgPool) {
    let app = test_app(pool);

    let request = Request::builder()
        .uri("/api/cycles")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_cycle_creation_requires_actor(pool: PgPool) {
    let app = test_app(pool);

    let response = send(
        &app,
        Method::POST,
        "/api/cycles",
        None,
        Some(json!({
            "name": "Q1",
            "start_at": "2026-01-01T00:00:00Z",
            "end_at": "2026-03-31T00:00:00Z",
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.kind(), "unauthorized");
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_unknown_cycle_is_not_found(pool: PgPool) {
    let app = test_app(pool);

    let response = get(&app, &format!("/api/cycles/{}", Uuid::new_v4())).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.kind(), "not_found");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_invalid_pagination_is_bad_request(pool: PgPool) {
    let app = test_app(pool);

    let response = get(&app, "/api/nominations?limit=0").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_inverted_dates_are_bad_request(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;

    let response = post(
        &app,
        "/api/cycles",
        people.hr,
        json!({
            "name": "Backwards",
            "start_at": "2026-03-31T00:00:00Z",
            "end_at": "2026-01-01T00:00:00Z",
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.kind(), "invalid_input");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_weight_ceiling_is_conflict(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, _) = open_cycle(&app, &people, "Q1").await;

    let response = post(
        &app,
        &format!("/api/cycles/{}/criteria", cycle_id),
        people.hr,
        json!([{ "name": "Extra", "weight": "0.5" }]),
    )
    .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.kind(), "constraint_violation");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_duplicate_nomination_is_conflict(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;
    let body = submission(cycle_id, people.nominees[0], &criteria, &[5, 5]);

    let first = post(&app, "/api/nominations", people.lead, body.clone()).await;
    assert_eq!(first.status, StatusCode::CREATED, "{}", first.body);

    let second = post(&app, "/api/nominations", people.manager, body).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.kind(), "constraint_violation");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_self_approval_is_forbidden(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let submitted = post(
        &app,
        "/api/nominations",
        people.manager,
        submission(cycle_id, people.nominees[0], &criteria, &[7, 7]),
    )
    .await;
    let nomination_id = submitted.id("nomination_id");

    let response = post_empty(
        &app,
        &format!("/api/nominations/{}/approve", nomination_id),
        people.manager,
    )
    .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.kind(), "permission_denied");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_second_decision_is_conflict(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let submitted = post(
        &app,
        "/api/nominations",
        people.lead,
        submission(cycle_id, people.nominees[0], &criteria, &[7, 7]),
    )
    .await;
    let uri = format!("/api/nominations/{}/reject", submitted.id("nomination_id"));

    let first = post(&app, &uri, people.manager, json!({ "reason": "Not this cycle" })).await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.body["action"], "REJECT");

    let second = post_empty(&app, &uri, people.hr).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.kind(), "invalid_state");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_malformed_approval_body_is_bad_request(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let submitted = post(
        &app,
        "/api/nominations",
        people.lead,
        submission(cycle_id, people.nominees[0], &criteria, &[7, 7]),
    )
    .await;
    let nomination_id = submitted.id("nomination_id");

    let response = post(
        &app,
        &format!("/api/nominations/{}/approve", nomination_id),
        people.manager,
        json!({ "rating": "abc" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.body);
    assert_eq!(response.kind(), "invalid_input");

    let fetched = get(&app, &format!("/api/nominations/{}", nomination_id)).await;
    assert_eq!(fetched.body["status"], "PENDING");
    let approvals = get(&app, &format!("/api/nominations/{}/approvals", nomination_id)).await;
    assert_eq!(approvals.body, json!([]));
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_score_above_scale_is_bad_request(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let response = post(
        &app,
        "/api/nominations",
        people.lead,
        submission(cycle_id, people.nominees[0], &criteria, &[1_000_000, 5]),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.body);

    let listed = get(&app, &format!("/api/nominations?cycle_id={}", cycle_id)).await;
    assert_eq!(listed.body["pagination"]["total_items"], 0);
}

// ---------------------------------------------------------------------------
// Directory maintenance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_patch_user(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/users/{}", people.nominees[0]),
        Some(people.hr),
        Some(json!({ "role": "TEAM_LEAD", "team_id": null })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["role"], "TEAM_LEAD");
    assert_eq!(response.body["team_id"], json!(null));
    assert_eq!(response.body["email"], "nina@example.com");

    let taken = send(
        &app,
        Method::PUT,
        &format!("/api/users/{}", people.nominees[0]),
        Some(people.hr),
        Some(json!({ "email": "mia@example.com" })),
    )
    .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);
    assert_eq!(taken.kind(), "constraint_violation");
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_deactivated_user_cannot_submit(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let deactivated =
        post_empty(&app, &format!("/api/users/{}/deactivate", people.lead), people.hr).await;
    assert_eq!(deactivated.status, StatusCode::OK, "{}", deactivated.body);
    assert_eq!(deactivated.body["status"], "INACTIVE");

    let body = submission(cycle_id, people.nominees[0], &criteria, &[5, 5]);
    let denied = post(&app, "/api/nominations", people.lead, body.clone()).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.kind(), "permission_denied");

    let activated =
        post_empty(&app, &format!("/api/users/{}/activate", people.lead), people.hr).await;
    assert_eq!(activated.body["status"], "ACTIVE");
    let accepted = post(&app, "/api/nominations", people.lead, body).await;
    assert_eq!(accepted.status, StatusCode::CREATED, "{}", accepted.body);
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_self_deactivation_is_bad_request(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;

    let response =
        post_empty(&app, &format!("/api/users/{}/deactivate", people.hr), people.hr).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let user = get(&app, &format!("/api/users/{}", people.hr)).await;
    assert_eq!(user.body["status"], "ACTIVE");
}

// ---------------------------------------------------------------------------
// End-to-end cycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_cycle_from_draft_to_finalized(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let strong = post(
        &app,
        "/api/nominations",
        people.lead,
        submission(cycle_id, people.nominees[0], &criteria, &[9, 8]),
    )
    .await;
    assert_eq!(strong.status, StatusCode::CREATED, "{}", strong.body);
    assert_eq!(strong.body["status"], "PENDING");
    assert_eq!(strong.body["answers"].as_array().unwrap().len(), 2);

    let weak = post(
        &app,
        "/api/nominations",
        people.lead,
        submission(cycle_id, people.nominees[1], &criteria, &[3, 4]),
    )
    .await;
    assert_eq!(weak.status, StatusCode::CREATED, "{}", weak.body);

    for nomination in [&strong, &weak] {
        let approved = post(
            &app,
            &format!("/api/nominations/{}/approve", nomination.id("nomination_id")),
            people.manager,
            json!({ "rating": "8" }),
        )
        .await;
        assert_eq!(approved.status, StatusCode::OK, "{}", approved.body);
    }

    let fetched = get(
        &app,
        &format!("/api/nominations/{}", strong.id("nomination_id")),
    )
    .await;
    assert_eq!(fetched.body["status"], "APPROVED");

    let approvals = get(
        &app,
        &format!("/api/nominations/{}/approvals", strong.id("nomination_id")),
    )
    .await;
    assert_eq!(approvals.body.as_array().unwrap().len(), 1);

    let closed = post_empty(&app, &format!("/api/cycles/{}/close", cycle_id), people.hr).await;
    assert_eq!(closed.body["status"], "CLOSED");

    let finalized = post_empty(
        &app,
        &format!("/api/cycles/{}/finalize", cycle_id),
        people.hr,
    )
    .await;
    assert_eq!(finalized.status, StatusCode::OK, "{}", finalized.body);
    assert_eq!(finalized.body["rankings_created"], 2);
    assert_eq!(finalized.body["nominations_snapshotted"], 2);

    let rankings = get(&app, &format!("/api/cycles/{}/rankings", cycle_id)).await;
    let data = rankings.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["rank"], 1);
    assert_eq!(data[0]["nominee_user_id"], people.nominees[0].to_string());
    assert_eq!(data[1]["rank"], 2);

    let history = get(
        &app,
        &format!("/api/cycles/{}/history/nominations", cycle_id),
    )
    .await;
    assert_eq!(history.body.as_array().unwrap().len(), 2);

    let ranking_history = get(&app, &format!("/api/cycles/{}/history/rankings", cycle_id)).await;
    assert_eq!(ranking_history.body.as_array().unwrap().len(), 2);

    let audit = get(
        &app,
        &format!("/api/audit-logs?entity_type=cycle&entity_id={}", cycle_id),
    )
    .await;
    assert_eq!(audit.body["data"][0]["action"], "cycle.finalize");

    let again = post_empty(
        &app,
        &format!("/api/cycles/{}/finalize", cycle_id),
        people.hr,
    )
    .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_revert_then_delete_draft_cycle(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let submitted = post(
        &app,
        "/api/nominations",
        people.lead,
        submission(cycle_id, people.nominees[0], &criteria, &[5, 5]),
    )
    .await;
    let uri = format!("/api/nominations/{}", submitted.id("nomination_id"));

    let denied = send(&app, Method::DELETE, &uri, Some(people.manager), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let reverted = send(&app, Method::DELETE, &uri, Some(people.hr), None).await;
    assert_eq!(reverted.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri).await.status, StatusCode::NOT_FOUND);

    let open_delete = send(
        &app,
        Method::DELETE,
        &format!("/api/cycles/{}", cycle_id),
        Some(people.hr),
        None,
    )
    .await;
    assert_eq!(open_delete.status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../storage/migrations")]
async fn test_criteria_listing_hides_inactive(pool: PgPool) {
    let app = test_app(pool);
    let people = seed_people(&app).await;
    let (cycle_id, criteria) = open_cycle(&app, &people, "Q1").await;

    let deactivated = send(
        &app,
        Method::PUT,
        &format!("/api/criteria/{}", criteria[1]),
        Some(people.hr),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(deactivated.status, StatusCode::OK, "{}", deactivated.body);

    let active = get(&app, &format!("/api/cycles/{}/criteria", cycle_id)).await;
    assert_eq!(active.body.as_array().unwrap().len(), 1);

    let all = get(
        &app,
        &format!("/api/cycles/{}/criteria?active_only=false", cycle_id),
    )
    .await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);
}
