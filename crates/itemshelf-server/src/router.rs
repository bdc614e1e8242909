//! Axum router construction.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Upper bound on request bodies, sized for a single photo upload.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.config.server.front_url);

    Router::new()
        .route("/", get(routes::hello::hello))
        .route(
            "/items",
            get(routes::items::get_items).post(routes::items::add_item),
        )
        .route("/items/{id}", get(routes::items::get_item))
        .route("/images/{filename}", get(routes::images::get_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// CORS restricted to the configured frontend origin.
fn cors_layer(front_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::from_str(front_url) {
        Ok(origin) => cors.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            tracing::warn!("Invalid front_url {front_url:?} for CORS, no origin allowed: {e}");
            cors
        }
    }
}
