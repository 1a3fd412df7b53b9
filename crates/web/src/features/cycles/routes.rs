use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    close_cycle, create_cycle, delete_cycle, finalize_cycle, get_cycle, list_cycles,
    list_nomination_history, list_ranking_history, open_cycle, update_cycle,
};
use crate::features::criteria::handlers::{add_criteria, list_criteria};
use crate::features::rankings::handlers::{compute_rankings, list_rankings};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_cycle))
        .route("/:id", put(update_cycle))
        .route("/:id", delete(delete_cycle))
        .route("/:id/open", post(open_cycle))
        .route("/:id/close", post(close_cycle))
        .route("/:id/finalize", post(finalize_cycle))
        .route("/:id/criteria", post(add_criteria))
        .route("/:id/rankings/compute", post(compute_rankings))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_cycles))
        .route("/:id", get(get_cycle))
        .route("/:id/criteria", get(list_criteria))
        .route("/:id/rankings", get(list_rankings))
        .route("/:id/history/nominations", get(list_nomination_history))
        .route("/:id/history/rankings", get(list_ranking_history))
        .merge(protected)
}
