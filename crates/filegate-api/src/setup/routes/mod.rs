//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use filegate_core::Config;
use filegate_infra::{request_id_middleware, security_headers_middleware, upload_cors_middleware};
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let http_concurrency_limit = config.http_concurrency_limit.max(1);
    tracing::info!(
        http_concurrency_limit,
        max_event_body_bytes = config.max_event_body_bytes,
        "HTTP limits configured"
    );

    // One semaphore shared by every route group.
    let limits = HttpLimits {
        concurrency: GlobalConcurrencyLimitLayer::new(http_concurrency_limit),
        max_body_bytes: config.max_event_body_bytes,
    };

    let api = Router::new()
        .merge(public_routes(state.clone()))
        .merge(event_routes(state.clone()))
        .merge(record_routes(state.clone()))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    limits
        .apply(api)
        .merge(upload_routes(state, &limits))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            config.is_production(),
            security_headers_middleware,
        ))
}

#[derive(Clone)]
struct HttpLimits {
    concurrency: GlobalConcurrencyLimitLayer,
    max_body_bytes: usize,
}

impl HttpLimits {
    fn apply(&self, router: Router<()>) -> Router<()> {
        router
            .layer(self.concurrency.clone())
            .layer(RequestBodyLimitLayer::new(self.max_body_bytes))
    }
}

fn public_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/health",
            get({
                let state = state.clone();
                move || {
                    let state = state.clone();
                    async { health::health_check(state).await }
                }
            }),
        )
        .route("/live", get(health::liveness_check))
        .route(
            "/ready",
            get({
                let state = state.clone();
                move || async { health::readiness_check(state).await }
            }),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Browsers call this cross-origin, so the route carries its own CORS headers
/// and answers preflight requests. CORS wraps the limits so a 413 is readable
/// by the browser too.
fn upload_routes(state: Arc<AppState>, limits: &HttpLimits) -> Router<()> {
    let routes = Router::new()
        .route(
            &format!("{}/uploads/presigned", API_PREFIX),
            post(handlers::uploads::generate_upload_url).options(|| async { StatusCode::OK }),
        )
        .with_state(state);

    limits
        .apply(routes)
        .layer(axum::middleware::from_fn(upload_cors_middleware))
}

fn event_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            &format!("{}/events/s3", API_PREFIX),
            post(handlers::events::process_event),
        )
        .with_state(state)
}

fn record_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            &format!("{}/records/{{job_id}}", API_PREFIX),
            get(handlers::records::get_record),
        )
        .with_state(state)
}
