use crate::config::HttpServerConfig;
use crate::error::{NextChapterError, Result};
use crate::gemini::CompletionClient;
use crate::pipeline::Analyzer;
use crate::prompt::SeedTitles;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::page::INDEX_HTML;

/// Check if a port is available by attempting to bind to it
async fn check_port_available(port: u16) -> bool {
    tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .is_ok()
}

/// Body of `POST /api/analyze`
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    titles: Vec<String>,
}

/// HTTP front end: input page plus the analyze endpoint
pub struct WebServer<C> {
    analyzer: Arc<Analyzer<C>>,
    allowed_origins: Vec<String>,
}

impl<C: CompletionClient + 'static> WebServer<C> {
    pub fn new(analyzer: Arc<Analyzer<C>>, config: &HttpServerConfig) -> Self {
        Self {
            analyzer,
            allowed_origins: config.allowed_origins.clone(),
        }
    }

    /// Run the HTTP server
    pub async fn run(&self, port: u16) -> Result<()> {
        let app = self.create_router();

        let addr = format!("127.0.0.1:{}", port);

        if !check_port_available(port).await {
            return Err(NextChapterError::Config(format!(
                "Port {} is already in use. Stop the other process or set http_server.port in config.toml",
                port
            )));
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| {
                NextChapterError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to bind to {}: {}", addr, e),
                ))
            })?;

        log::info!("NextChapter listening on http://{}", addr);

        axum::serve(listener, app).await.map_err(|e| {
            NextChapterError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Create the axum router
    pub fn create_router(&self) -> Router {
        // No configured origins: allow Any (local use). Otherwise restrict to the list.
        let cors = if self.allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/", get(handle_index))
            .route("/api/analyze", post(handle_analyze::<C>))
            .route("/health", get(handle_health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(AppState {
                analyzer: Arc::clone(&self.analyzer),
            })
    }
}

/// Application state shared across handlers
struct AppState<C> {
    analyzer: Arc<Analyzer<C>>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            analyzer: Arc::clone(&self.analyzer),
        }
    }
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handle `POST /api/analyze`
///
/// Input problems are 400s. Pipeline failures are 200 with `status: "error"`
/// so the page can show the message in its error banner.
async fn handle_analyze<C: CompletionClient + 'static>(
    State(state): State<AppState<C>>,
    body: axum::body::Bytes,
) -> Response {
    let request: AnalyzeRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return bad_request(format!("Invalid JSON: {}", e));
        }
    };

    let titles = match SeedTitles::from_slice(&request.titles) {
        Ok(titles) => titles,
        Err(e) => {
            log::debug!("Rejected analyze request: {}", e);
            return bad_request("Please enter all three book titles.".to_string());
        }
    };

    match state.analyzer.analyze(&titles).await {
        Ok(rendered) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "html": rendered.html,
                "nodes": rendered.nodes,
                "edges": rendered.edges,
                "seeds": rendered.seeds
            })),
        )
            .into_response(),
        Err(failure) => {
            log::warn!("Analysis failed for {}: {}", titles, failure);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "error",
                    "kind": failure.kind(),
                    "message": failure.message()
                })),
            )
                .into_response()
        }
    }
}

/// Handle health check endpoint
async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "nextchapter",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "status": "error",
            "kind": "invalid_input",
            "message": message
        })),
    )
        .into_response()
}
