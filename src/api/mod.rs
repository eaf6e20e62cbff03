mod admin;
mod conversations;
mod interests;
mod me;
mod plans;
mod profiles;

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/profiles", profiles::routes())
        .nest("/plans", plans::routes())
        .nest("/me", me::routes())
        .nest("/interests", interests::routes())
        .nest("/conversations", conversations::routes())
        .nest("/admin", admin::routes())
}

/// Builds the complete application: the versioned API behind the identity
/// middleware, health left open for probes, CORS and request tracing on the
/// outside.
pub fn router(state: AppState) -> Router {
    let api_v1 = routes().layer(middleware::from_fn(
        crate::middleware::identity_middleware,
    ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
