use awards_storage::{
    dto::approval::{ApprovalDecision, ApprovalDetail, ApprovalRequest},
    models::ApprovalAction,
    services::ApprovalWorkflow,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::actor::Actor;
use crate::state::AppState;

/// An empty body is a bare decision; anything else must parse as an `ApprovalRequest`.
fn parse_request(body: &[u8]) -> Result<ApprovalRequest, WebError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApprovalRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| WebError::BadRequest(format!("Invalid approval payload: {}", e)))
}

async fn act(
    state: &AppState,
    nomination_id: Uuid,
    actor: Uuid,
    action: ApprovalAction,
    body: Bytes,
) -> Result<Json<ApprovalDetail>, WebError> {
    let request = parse_request(&body)?;
    request.validate()?;

    let detail = ApprovalWorkflow::new(state.pool(), &state.workflow)
        .act(
            nomination_id,
            actor,
            ApprovalDecision::from_request(action, request),
        )
        .await?;

    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/nominations/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Nomination id")
    ),
    request_body = ApprovalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Nomination approved", body = ApprovalDetail),
        (status = 400, description = "Malformed payload, rating out of range or criteria not part of the cycle"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor may not approve, or is the submitter"),
        (status = 404, description = "Nomination not found"),
        (status = 409, description = "Nomination already processed")
    ),
    tag = "approvals"
)]
pub async fn approve_nomination(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApprovalDetail>, WebError> {
    act(&state, id, actor, ApprovalAction::Approve, body).await
}

#[utoipa::path(
    post,
    path = "/api/nominations/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Nomination id")
    ),
    request_body = ApprovalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Nomination rejected", body = ApprovalDetail),
        (status = 400, description = "Malformed payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor may not reject, or is the submitter"),
        (status = 404, description = "Nomination not found"),
        (status = 409, description = "Nomination already processed")
    ),
    tag = "approvals"
)]
pub async fn reject_nomination(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApprovalDetail>, WebError> {
    act(&state, id, actor, ApprovalAction::Reject, body).await
}

#[utoipa::path(
    get,
    path = "/api/nominations/{id}/approvals",
    params(
        ("id" = Uuid, Path, description = "Nomination id")
    ),
    responses(
        (status = 200, description = "Approvals in the order they were made", body = Vec<ApprovalDetail>),
        (status = 404, description = "Nomination not found")
    ),
    tag = "approvals"
)]
pub async fn list_approvals(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApprovalDetail>>, WebError> {
    let approvals = ApprovalWorkflow::new(state.pool(), &state.workflow)
        .list_approvals(id)
        .await?;
    Ok(Json(approvals))
}
