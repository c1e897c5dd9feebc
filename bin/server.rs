// Flow Metrics - Web Server
// REST API serving chart series as JSON

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;
use flow_metrics::{build_report, ChartData, ChartRequest, Dataset, EngineConfig, Granularity, ReportKind};

/// Shared application state (read-only: reports never mutate the dataset)
#[derive(Clone)]
struct AppState {
    dataset: Arc<Dataset>,
    config: Arc<EngineConfig>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Query string of a report request
#[derive(Deserialize)]
struct ReportQuery {
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default = "default_granularity")]
    granularity: String,
    /// Restrict to one project's work items
    project: Option<String>,
    /// Restrict to one team's work items
    team: Option<String>,
}

fn default_granularity() -> String {
    "week".to_string()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/reports/:kind - Chart series for one report
async fn get_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let kind: ReportKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return bad_request(e.to_string()),
    };
    let granularity: Granularity = match query.granularity.parse() {
        Ok(granularity) => granularity,
        Err(e) => return bad_request(e.to_string()),
    };

    let scoped;
    let dataset = match (&query.project, &query.team) {
        (Some(project), _) => {
            scoped = state.dataset.for_project(project);
            &scoped
        }
        (None, Some(team)) => {
            scoped = state.dataset.for_team(team);
            &scoped
        }
        (None, None) => state.dataset.as_ref(),
    };

    let request = ChartRequest::new(query.start, query.end, granularity, Utc::now());

    match build_report(kind, dataset, &state.config, &request) {
        Ok(chart) => (StatusCode::OK, Json(ApiResponse::ok(chart))).into_response(),
        Err(e) => {
            tracing::error!(report = %kind, error = %e, "failed to build report");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ChartData>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

fn bad_request(message: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<ChartData>::err(message)),
    )
        .into_response()
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🌐 Flow Metrics - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let args: Vec<String> = std::env::args().collect();
    let Some(dataset_path) = args.get(1) else {
        eprintln!("❌ Missing dataset path");
        eprintln!("   Run: flow-server <dataset.json> [config.json]");
        std::process::exit(1);
    };

    let dataset = Dataset::from_file(dataset_path)?;
    println!("✓ Dataset loaded: {} work items, {} projects", dataset.work_items.len(), dataset.projects.len());

    let config = match args.get(2) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    // Create shared state
    let state = AppState {
        dataset: Arc::new(dataset),
        config: Arc::new(config),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/reports/:kind", get(get_report))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/reports/operational?start=2024-01-01&end=2024-03-31&granularity=week");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;

    Ok(())
}
