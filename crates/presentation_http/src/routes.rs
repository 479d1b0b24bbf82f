//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers, middleware::propagate_request_id, state::AppState};

/// Create the main router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let server = state.config.server.clone();

    let router = Router::new()
        // Liveness
        .route("/health", get(handlers::health::health_check))
        // Companies (v1)
        .route(
            "/v1/companies",
            get(handlers::companies::lookup_company).post(handlers::companies::create_company),
        )
        .route(
            "/v1/companies/details",
            get(handlers::companies::get_company_details),
        )
        // Calendars (v1)
        .route(
            "/v1/calendars/{calendar_id}/subscription",
            post(handlers::calendars::subscribe_calendar),
        )
        // Webhooks
        .route("/webhook/affinity", post(handlers::webhooks::affinity_webhook))
        .with_state(state)
        .layer(DefaultBodyLimit::max(server.max_body_size_json_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(propagate_request_id));

    match cors_layer(&server) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS policy: any origin when no origins are listed, otherwise only those
fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if !server.cors_enabled {
        return None;
    }

    if server.allowed_origins.is_empty() {
        return Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
    )
}
