use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use super::handlers::{delete_criteria, get_criteria, update_criteria};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/:id", put(update_criteria))
        .route("/:id", delete(delete_criteria))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new().route("/:id", get(get_criteria)).merge(protected)
}
