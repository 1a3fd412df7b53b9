use sqlx::types::Json;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::audit::AuditLogFilter;
use crate::dto::common::PaginationParams;
use crate::error::Result;
use crate::models::AuditLog;

const AUDIT_COLUMNS: &str =
    "audit_id, actor_user_id, action, entity_type, entity_id, payload, created_at";

/// Append-only audit sink.
///
/// Writes go through the caller's connection, so a record commits or rolls
/// back together with the change it describes.
pub struct AuditRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> AuditRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn record(
        &mut self,
        actor_user_id: Option<Uuid>,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        payload: Option<serde_json::Value>,
    ) -> Result<AuditLog> {
        let query = format!(
            "INSERT INTO audit_logs (actor_user_id, action, entity_type, entity_id, payload, created_at)
             VALUES ($1, $2, $3, $4, $5, clock_timestamp())
             RETURNING {AUDIT_COLUMNS}"
        );
        let log = sqlx::query_as::<_, AuditLog>(&query)
            .bind(actor_user_id)
            .bind(action)
            .bind(entity_type)
            .bind(entity_id)
            .bind(payload.map(Json))
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(log)
    }

    /// Audit records matching a filter, newest first
    pub async fn list(
        &mut self,
        filter: &AuditLogFilter,
        page: &PaginationParams,
    ) -> Result<(Vec<AuditLog>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM audit_logs WHERE 1=1");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.conn)
            .await?;

        let mut query =
            QueryBuilder::new(format!("SELECT {AUDIT_COLUMNS} FROM audit_logs WHERE 1=1"));
        push_filters(&mut query, filter);
        query.push(" ORDER BY created_at DESC, audit_id LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let logs = query
            .build_query_as::<AuditLog>()
            .fetch_all(&mut *self.conn)
            .await?;

        Ok((logs, total))
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &AuditLogFilter) {
    if let Some(entity_type) = &filter.entity_type {
        query.push(" AND entity_type = ");
        query.push_bind(entity_type.clone());
    }

    if let Some(entity_id) = filter.entity_id {
        query.push(" AND entity_id = ");
        query.push_bind(entity_id);
    }

    if let Some(actor) = filter.actor_user_id {
        query.push(" AND actor_user_id = ");
        query.push_bind(actor);
    }
}
