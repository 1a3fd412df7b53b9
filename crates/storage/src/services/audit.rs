use sqlx::PgPool;

use crate::dto::audit::AuditLogFilter;
use crate::dto::common::PaginationParams;
use crate::error::Result;
use crate::models::AuditLog;
use crate::repository::audit::AuditRepository;

pub async fn list_audit_logs(
    pool: &PgPool,
    filter: &AuditLogFilter,
    page: &PaginationParams,
) -> Result<(Vec<AuditLog>, i64)> {
    let mut conn = pool.acquire().await?;
    AuditRepository::new(&mut conn).list(filter, page).await
}
