pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod openapi;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use features::{audit, criteria, cycles, directory, health, nominations};
use middleware::auth::ApiKeys;
use openapi::ApiDoc;
use state::AppState;

/// Build the application router. Mutating routes are guarded by `api_keys`.
pub fn app(state: AppState, api_keys: ApiKeys) -> Router {
    let api = Router::new()
        .nest("/teams", directory::routes::team_routes(api_keys.clone()))
        .nest("/users", directory::routes::user_routes(api_keys.clone()))
        .nest("/cycles", cycles::routes::routes(api_keys.clone()))
        .nest("/criteria", criteria::routes::routes(api_keys.clone()))
        .nest("/nominations", nominations::routes::routes(api_keys))
        .nest("/audit-logs", audit::routes::routes());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health::routes::routes())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
