//! REST API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::service::{Controls, DashboardService};
use crate::dashboard::{Dashboard, DrillDown, Panel};
use crate::error::DashboardError;
use crate::join::JoinReport;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct BoundsResponse {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub rows: usize,
    pub join: JoinReport,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Raw query string; an empty value (`?start=`) means the parameter is unset
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, DashboardError> {
    non_empty(value)
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                .map_err(|_| DashboardError::InvalidDate { value: v })
        })
        .transpose()
}

impl TryFrom<DashboardQuery> for Controls {
    type Error = DashboardError;

    fn try_from(q: DashboardQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            start: parse_date(q.start)?,
            end: parse_date(q.end)?,
            category: non_empty(q.category),
            state: non_empty(q.state),
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<DashboardService>;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(e: DashboardError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/v1/bounds
pub async fn get_bounds(State(service): State<AppState>) -> Json<BoundsResponse> {
    let bounds = service.bounds();
    Json(BoundsResponse {
        min_date: bounds.map(|b| b.start),
        max_date: bounds.map(|b| b.end),
        rows: service.rows(),
        join: service.join_report().clone(),
    })
}

/// GET /api/v1/dashboard?start=&end=&category=&state=
pub async fn get_dashboard(
    State(service): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let controls = Controls::try_from(params).map_err(bad_request)?;
    service
        .dashboard(controls)
        .map(Json)
        .map_err(bad_request)
}

/// GET /api/v1/drilldown?start=&end=&category=&state=
pub async fn get_drilldown(
    State(service): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<Panel<DrillDown>>, ApiError> {
    let controls = Controls::try_from(params).map_err(bad_request)?;
    service
        .drilldown(controls)
        .map(Json)
        .map_err(bad_request)
}
