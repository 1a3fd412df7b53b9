use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    activate_user, create_team, create_user, deactivate_user, get_user, list_teams, list_users,
    update_user,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn team_routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_team))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new().route("/", get(list_teams)).merge(protected)
}

pub fn user_routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_user))
        .route("/:id", put(update_user).patch(update_user))
        .route("/:id/deactivate", post(deactivate_user))
        .route("/:id/activate", post(activate_user))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user))
        .merge(protected)
}
