use awards_storage::{
    dto::{
        common::{PaginatedResponse, PaginationParams},
        nomination::{NominationDetail, NominationFilter, SubmitNominationRequest},
    },
    models::Nomination,
    services::NominationWorkflow,
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
    post,
    path = "/api/nominations",
    request_body = SubmitNominationRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Nomination submitted as PENDING", body = NominationDetail),
        (status = 400, description = "Validation error or criteria not part of the cycle"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor may not submit nominations"),
        (status = 404, description = "Cycle or nominee not found"),
        (status = 409, description = "Cycle not open or nominee already nominated")
    ),
    tag = "nominations"
)]
pub async fn submit_nomination(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(req): Json<SubmitNominationRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let detail = NominationWorkflow::new(state.pool(), &state.workflow)
        .submit(req, actor)
        .await?;

    Ok((StatusCode::CREATED, Json(detail)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/nominations",
    params(NominationFilter, PaginationParams),
    responses(
        (status = 200, description = "Nominations, newest first", body = PaginatedResponse<Nomination>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "nominations"
)]
pub async fn list_nominations(
    State(state): State<AppState>,
    Query(filter): Query<NominationFilter>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Nomination>>, WebError> {
    page.validate().map_err(WebError::BadRequest)?;

    let (nominations, total_items) = NominationWorkflow::new(state.pool(), &state.workflow)
        .list_nominations(&filter, &page)
        .await?;

    Ok(Json(PaginatedResponse::new(nominations, &page, total_items)))
}

#[utoipa::path(
    get,
    path = "/api/nominations/{id}",
    params(
        ("id" = Uuid, Path, description = "Nomination id")
    ),
    responses(
        (status = 200, description = "Nomination with its answers", body = NominationDetail),
        (status = 404, description = "Nomination not found")
    ),
    tag = "nominations"
)]
pub async fn get_nomination(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NominationDetail>, WebError> {
    let detail = NominationWorkflow::new(state.pool(), &state.workflow)
        .get_nomination(id)
        .await?;
    Ok(Json(detail))
}

#[utoipa::path(
    delete,
    path = "/api/nominations/{id}",
    params(
        ("id" = Uuid, Path, description = "Nomination id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Nomination reverted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor may not revert nominations"),
        (status = 404, description = "Nomination not found"),
        (status = 409, description = "Cycle is finalized")
    ),
    tag = "nominations"
)]
pub async fn revert_nomination(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    NominationWorkflow::new(state.pool(), &state.workflow)
        .revert_nomination(id, actor)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
