use awards_storage::{
    dto::{
        common::{PaginatedResponse, PaginationParams},
        ranking::RankingFilter,
    },
    models::Ranking,
    services::RankingEngine,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::actor::Actor;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/cycles/{id}/rankings",
    params(
        ("id" = Uuid, Path, description = "Cycle id"),
        RankingFilter,
        PaginationParams
    ),
    responses(
        (status = 200, description = "Rankings ordered by rank", body = PaginatedResponse<Ranking>),
        (status = 400, description = "Invalid pagination"),
        (status = 404, description = "Cycle not found")
    ),
    tag = "rankings"
)]
pub async fn list_rankings(
    State(state): State<AppState>,
    Path(cycle_id): Path<Uuid>,
    Query(filter): Query<RankingFilter>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Ranking>>, WebError> {
    page.validate().map_err(WebError::BadRequest)?;

    let (rankings, total_items) = RankingEngine::new(state.pool())
        .list_rankings(cycle_id, &filter, &page)
        .await?;

    Ok(Json(PaginatedResponse::new(rankings, &page, total_items)))
}

#[utoipa::path(
    post,
    path = "/api/cycles/{id}/rankings/compute",
    params(
        ("id" = Uuid, Path, description = "Cycle id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rankings recomputed from approved nominations", body = Vec<Ranking>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cycle not found"),
        (status = 409, description = "Cycle is finalized")
    ),
    tag = "rankings"
)]
pub async fn compute_rankings(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(cycle_id): Path<Uuid>,
) -> Result<Json<Vec<Ranking>>, WebError> {
    let rankings = RankingEngine::new(state.pool())
        .compute(cycle_id, Some(actor))
        .await?;
    Ok(Json(rankings))
}
