use awards_storage::{
    dto::{
        audit::AuditLogFilter,
        common::{PaginatedResponse, PaginationParams},
    },
    models::AuditLog,
    services::audit,
};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/audit-logs",
    params(AuditLogFilter, PaginationParams),
    responses(
        (status = 200, description = "Audit entries, newest first", body = PaginatedResponse<AuditLog>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "audit"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(filter): Query<AuditLogFilter>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<AuditLog>>, WebError> {
    page.validate().map_err(WebError::BadRequest)?;

    let (entries, total_items) = audit::list_audit_logs(state.pool(), &filter, &page).await?;

    Ok(Json(PaginatedResponse::new(entries, &page, total_items)))
}
