use awards_storage::{
    dto::{
        common::{PaginatedResponse, PaginationParams},
        cycle::{CreateCycleRequest, UpdateCycleRequest},
        ranking::FinalizeResult,
    },
    models::{Cycle, NominationHistory, RankingHistory},
    services::{CycleService, Finalization},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::actor::Actor;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/cycles",
    params(PaginationParams),
    responses(
        (status = 200, description = "Cycles, newest first", body = PaginatedResponse<Cycle>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "cycles"
)]
pub async fn list_cycles(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Cycle>>, WebError> {
    page.validate().map_err(WebError::BadRequest)?;

    let (cycles, total_items) = CycleService::new(state.pool()).list_cycles(&page).await?;

    Ok(Json(PaginatedResponse::new(cycles, &page, total_items)))
}

#[utoipa::path(
    get,
    path = "/api/cycles/{id}",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    responses(
        (status = 200, description = "Cycle found", body = Cycle),
        (status = 404, description = "Cycle not found")
    ),
    tag = "cycles"
)]
pub async fn get_cycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Cycle>, WebError> {
    let cycle = CycleService::new(state.pool()).get_cycle(id).await?;
    Ok(Json(cycle))
}

#[utoipa::path(
    post,
    path = "/api/cycles",
    request_body = CreateCycleRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Cycle created in DRAFT", body = Cycle),
        (status = 400, description = "Validation error or end_at not after start_at"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Cycle name already exists")
    ),
    tag = "cycles"
)]
pub async fn create_cycle(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(req): Json<CreateCycleRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let cycle = CycleService::new(state.pool())
        .create_cycle(&req, actor)
        .await?;

    Ok((StatusCode::CREATED, Json(cycle)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/cycles/{id}",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    request_body = UpdateCycleRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cycle updated", body = Cycle),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cycle not found"),
        (status = 409, description = "Change not allowed in the cycle's status")
    ),
    tag = "cycles"
)]
pub async fn update_cycle(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCycleRequest>,
) -> Result<Json<Cycle>, WebError> {
    req.validate()?;

    let cycle = CycleService::new(state.pool())
        .update_cycle(id, req, Some(actor))
        .await?;

    Ok(Json(cycle))
}

#[utoipa::path(
    delete,
    path = "/api/cycles/{id}",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Cycle deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cycle not found"),
        (status = 409, description = "Cycle is not DRAFT or already has nominations")
    ),
    tag = "cycles"
)]
pub async fn delete_cycle(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    CycleService::new(state.pool())
        .delete_cycle(id, Some(actor))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/cycles/{id}/open",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cycle is now OPEN", body = Cycle),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cycle not found"),
        (status = 409, description = "Cycle is not DRAFT")
    ),
    tag = "cycles"
)]
pub async fn open_cycle(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Cycle>, WebError> {
    let cycle = CycleService::new(state.pool())
        .open_cycle(id, Some(actor))
        .await?;
    Ok(Json(cycle))
}

#[utoipa::path(
    post,
    path = "/api/cycles/{id}/close",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cycle is now CLOSED", body = Cycle),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cycle not found"),
        (status = 409, description = "Cycle is not OPEN")
    ),
    tag = "cycles"
)]
pub async fn close_cycle(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Cycle>, WebError> {
    let cycle = CycleService::new(state.pool())
        .close_cycle(id, Some(actor))
        .await?;
    Ok(Json(cycle))
}

#[utoipa::path(
    post,
    path = "/api/cycles/{id}/finalize",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rankings computed and history written", body = FinalizeResult),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cycle not found"),
        (status = 409, description = "Cycle is not CLOSED")
    ),
    tag = "cycles"
)]
pub async fn finalize_cycle(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<FinalizeResult>, WebError> {
    let result = Finalization::new(state.pool())
        .finalize(id, Some(actor))
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/cycles/{id}/history/nominations",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    responses(
        (status = 200, description = "Nomination snapshots taken at finalization", body = Vec<NominationHistory>),
        (status = 404, description = "Cycle not found")
    ),
    tag = "history"
)]
pub async fn list_nomination_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<NominationHistory>>, WebError> {
    let history = Finalization::new(state.pool())
        .list_nomination_history(id)
        .await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/api/cycles/{id}/history/rankings",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    responses(
        (status = 200, description = "Ranking snapshots taken at finalization", body = Vec<RankingHistory>),
        (status = 404, description = "Cycle not found")
    ),
    tag = "history"
)]
pub async fn list_ranking_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RankingHistory>>, WebError> {
    let history = Finalization::new(state.pool())
        .list_ranking_history(id)
        .await?;
    Ok(Json(history))
}
