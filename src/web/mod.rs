// Web server — Axum-based REST wrapper around the annotator.
//
//   GET  /        app metadata
//   POST /        MMIF in, annotated MMIF out (?pretty=true to indent)
//   GET  /health  liveness check
//
// Models are loaded before the server starts and shared read-only through
// the Annotator, so handlers never lock anything.

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::pipeline::annotate::Annotator;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub annotator: Annotator,
}

/// Start the server and block until it exits (Ctrl-C shuts it down cleanly).
///
/// `develop` adds a permissive CORS layer so browser tools can hit a local
/// instance directly.
pub async fn run_server(annotator: Annotator, bind: &str, port: u16, develop: bool) -> Result<()> {
    let app = build_router(AppState { annotator }, develop);

    let addr = format!("{bind}:{port}");
    info!(develop, "Topic annotator listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState, develop: bool) -> Router {
    let router = Router::new()
        .route(
            "/",
            get(handlers::metadata::get_metadata).post(handlers::annotate::annotate),
        )
        .route("/health", get(health));

    let router = if develop {
        router.layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

/// Pre-serialized JSON body with the right content type.
pub fn json_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// `pretty` query flag: accepts true/True/1/yes.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}
