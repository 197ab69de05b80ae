//! HTTP server wiring: shared application context, router, and startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use super::pages;
use crate::cache::QueryCache;
use crate::chart::{ChartRenderer, SvgRenderer};
use crate::config::AppConfig;
use crate::errors::PageError;
use crate::stats::Aggregator;
use crate::tracker::{JiraClient, Project, TrackerClient};

/// Explicit application context passed into every handler. All process state
/// lives here; there are no module-level globals.
pub struct AppState {
    pub aggregator: Aggregator,
    pub renderer: Arc<dyn ChartRenderer>,
    /// Fetched once at startup, never refreshed.
    pub projects: Vec<Project>,
}

pub type SharedState = Arc<AppState>;

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PageError::MissingParameter => {
                (StatusCode::BAD_REQUEST, "Project name not found".to_string())
            }
            PageError::Tracker(err) if err.is_upstream_unavailable() => (
                StatusCode::BAD_GATEWAY,
                "The tracker server is currently unavailable (HTTP 502). Please try again later."
                    .to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while generating the project statistics. Please try again later."
                    .to_string(),
            ),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "report request failed");
        }
        (status, message).into_response()
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/project_stats", get(project_stats))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn home(State(state): State<SharedState>) -> Html<String> {
    Html(pages::landing(&state.projects))
}

#[derive(Deserialize)]
struct StatsParams {
    project_name: Option<String>,
}

async fn project_stats(
    State(state): State<SharedState>,
    Query(params): Query<StatsParams>,
) -> Result<Html<String>, PageError> {
    let project_name = params
        .project_name
        .filter(|n| !n.is_empty())
        .ok_or(PageError::MissingParameter)?;

    let report = state.aggregator.project_report(&project_name).await?;
    Ok(Html(pages::project_stats_page(&report, &*state.renderer)))
}

/// Build the full application context from configuration. The project list
/// is fetched once here; a failure is logged and leaves the landing page
/// empty rather than aborting startup.
pub async fn build_state(config: &AppConfig) -> Result<SharedState> {
    let tracker: Arc<dyn TrackerClient> =
        Arc::new(JiraClient::new(&config.tracker).context("Failed to build tracker client")?);
    let projects = match tracker.list_projects().await {
        Ok(projects) => projects,
        Err(err) => {
            tracing::warn!(error = %err, "project listing failed, landing page will be empty");
            Vec::new()
        }
    };

    let cache = Arc::new(QueryCache::from_config(&config.cache, &config.tracker));
    let aggregator = Aggregator::new(tracker, cache, config.report.clone());

    Ok(Arc::new(AppState {
        aggregator,
        renderer: Arc::new(SvgRenderer::new()),
        projects,
    }))
}

/// Start the dashboard server and block until shutdown.
pub async fn start_server(config: AppConfig) -> Result<()> {
    let state = build_state(&config).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let local_addr = listener.local_addr()?;
    tracing::info!("trackdash running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutting down...");
}
