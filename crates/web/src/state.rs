use std::sync::Arc;

use awards_storage::{Database, WorkflowConfig};
use sqlx::PgPool;

/// Shared handler state: the database handle and the workflow policy
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub workflow: Arc<WorkflowConfig>,
}

impl AppState {
    pub fn new(db: Database, workflow: WorkflowConfig) -> Self {
        Self {
            db,
            workflow: Arc::new(workflow),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}
