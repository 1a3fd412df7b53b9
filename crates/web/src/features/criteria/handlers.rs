use awards_storage::{
    dto::criteria::{CreateCriteriaRequest, CriteriaListParams, UpdateCriteriaRequest},
    models::Criteria,
    services::CriteriaStore,
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
    path = "/api/cycles/{id}/criteria",
    params(
        ("id" = Uuid, Path, description = "Cycle id"),
        CriteriaListParams
    ),
    responses(
        (status = 200, description = "Criteria in creation order", body = Vec<Criteria>),
        (status = 404, description = "Cycle not found")
    ),
    tag = "criteria"
)]
pub async fn list_criteria(
    State(state): State<AppState>,
    Path(cycle_id): Path<Uuid>,
    Query(params): Query<CriteriaListParams>,
) -> Result<Json<Vec<Criteria>>, WebError> {
    let criteria = CriteriaStore::new(state.pool(), &state.workflow)
        .list_criteria(cycle_id, params.active_only)
        .await?;
    Ok(Json(criteria))
}

#[utoipa::path(
    post,
    path = "/api/cycles/{id}/criteria",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    request_body = Vec<CreateCriteriaRequest>,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "All criteria added", body = Vec<Criteria>),
        (status = 400, description = "Validation error or negative weight"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cycle not found"),
        (status = 409, description = "Weight ceiling exceeded, duplicate name or finalized cycle")
    ),
    tag = "criteria"
)]
pub async fn add_criteria(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(cycle_id): Path<Uuid>,
    Json(items): Json<Vec<CreateCriteriaRequest>>,
) -> Result<Response, WebError> {
    if items.is_empty() {
        return Err(WebError::BadRequest(
            "At least one criteria is required".to_string(),
        ));
    }
    for item in &items {
        item.validate()?;
    }

    let created = CriteriaStore::new(state.pool(), &state.workflow)
        .add_criteria(cycle_id, &items, Some(actor))
        .await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/criteria/{id}",
    params(
        ("id" = Uuid, Path, description = "Criteria id")
    ),
    responses(
        (status = 200, description = "Criteria found", body = Criteria),
        (status = 404, description = "Criteria not found")
    ),
    tag = "criteria"
)]
pub async fn get_criteria(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Criteria>, WebError> {
    let criteria = CriteriaStore::new(state.pool(), &state.workflow)
        .get_criteria(id)
        .await?;
    Ok(Json(criteria))
}

#[utoipa::path(
    put,
    path = "/api/criteria/{id}",
    params(
        ("id" = Uuid, Path, description = "Criteria id")
    ),
    request_body = UpdateCriteriaRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Criteria updated", body = Criteria),
        (status = 400, description = "Validation error or negative weight"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Criteria not found"),
        (status = 409, description = "Weight ceiling exceeded or cycle no longer editable")
    ),
    tag = "criteria"
)]
pub async fn update_criteria(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCriteriaRequest>,
) -> Result<Json<Criteria>, WebError> {
    req.validate()?;

    let criteria = CriteriaStore::new(state.pool(), &state.workflow)
        .update_criteria(id, req, Some(actor))
        .await?;
    Ok(Json(criteria))
}

#[utoipa::path(
    delete,
    path = "/api/criteria/{id}",
    params(
        ("id" = Uuid, Path, description = "Criteria id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Criteria deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Criteria not found"),
        (status = 409, description = "Criteria already answered or reviewed")
    ),
    tag = "criteria"
)]
pub async fn delete_criteria(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    CriteriaStore::new(state.pool(), &state.workflow)
        .delete_criteria(id, Some(actor))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
