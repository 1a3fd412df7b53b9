use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{get_nomination, list_nominations, revert_nomination, submit_nomination};
use crate::features::approvals::handlers::{approve_nomination, list_approvals, reject_nomination};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(submit_nomination))
        .route("/:id", delete(revert_nomination))
        .route("/:id/approve", post(approve_nomination))
        .route("/:id/reject", post(reject_nomination))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_nominations))
        .route("/:id", get(get_nomination))
        .route("/:id/approvals", get(list_approvals))
        .merge(protected)
}
