//! Dashboard and JSON endpoint handlers
//!
//! Provides handlers for:
//! - HTML dashboard (/) and manual refresh (/refresh)
//! - Read API (/api/*)

use crate::error::{AppError, Result};
use crate::server::dashboard::render_dashboard;
use crate::server::types::*;
use crate::services::{CycleReport, Trigger};
use crate::state::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint - GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "success".to_string(),
        message: "Crypto tracker is running".to_string(),
    })
}

// ============================================================================
// Dashboard
// ============================================================================

/// Dashboard page - GET /
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>> {
    let view = state.snapshots.dashboard(Utc::now())?;
    let flash = query
        .refreshed
        .is_some()
        .then_some("Data refreshed successfully!");

    Ok(Html(render_dashboard(&view, flash)))
}

/// Run a manual cycle on its own task; a dropped request leaves the cycle running to completion.
async fn run_manual_cycle(state: &AppState) -> Result<CycleReport> {
    let fetch = state.fetch.clone();

    tokio::spawn(async move { fetch.run_cycle(Trigger::Manual).await })
        .await
        .map_err(|e| AppError::Internal(format!("Manual fetch cycle task failed: {}", e)))
}

/// Manual refresh - GET /refresh
///
/// Runs a full cycle (waiting for any cycle in progress) and redirects back
/// to the dashboard.
pub async fn refresh(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let report = run_manual_cycle(&state).await?;
    info!("Manual refresh finished, cycle {}", report.cycle_id);

    Ok(Redirect::to("/?refreshed=1"))
}

// ============================================================================
// JSON API
// ============================================================================

/// Manual refresh returning the cycle report - POST /api/refresh
pub async fn api_refresh(State(state): State<Arc<AppState>>) -> Result<Json<RefreshResponse>> {
    let report = run_manual_cycle(&state).await?;

    Ok(Json(RefreshResponse {
        status: "success".to_string(),
        report,
    }))
}

/// Latest price rows - GET /api/crypto
pub async fn api_crypto(State(state): State<Arc<AppState>>) -> Result<Response> {
    Ok(Json(state.snapshots.latest_prices()?).into_response())
}

/// Latest news, newest first - GET /api/news
pub async fn api_news(State(state): State<Arc<AppState>>) -> Result<Response> {
    Ok(Json(state.snapshots.latest_news()?).into_response())
}

/// Current weather snapshot - GET /api/weather
pub async fn api_weather(State(state): State<Arc<AppState>>) -> Result<Response> {
    match state.snapshots.current_weather()? {
        Some(weather) => Ok(Json(weather).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(UnavailableResponse::new("No weather data available")),
        )
            .into_response()),
    }
}

/// Stored detail for one asset - GET /api/asset/{slug}
pub async fn api_asset(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let detail = state
        .snapshots
        .asset_detail(&slug)?
        .ok_or_else(|| AppError::NotFound(format!("No detail stored for asset '{}'", slug)))?;

    Ok(Json(detail).into_response())
}

/// Row counts and last cycle - GET /api/status
pub async fn api_status(State(state): State<Arc<AppState>>) -> Result<Response> {
    Ok(Json(state.snapshots.status(&state.fetch)?).into_response())
}
