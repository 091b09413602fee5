//! Derived view endpoints under `/api/views/`.

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::{render, ViewResponse};
use crate::api::error::ApiError;
use crate::api::types::{parse_as_of, parse_window_days, ApiContext};
use crate::config::{DEFAULT_DAILY_LOAD_WINDOW_DAYS, DEFAULT_UPCOMING_WINDOW_DAYS};
use crate::engine::ViewRequest;
use crate::models::enums::CrossTabAxis;

/// Raw strings so malformed values get a structured 400 instead of
/// axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub as_of: Option<String>,
    pub window_days: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CrossTabQuery {
    pub axis: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

pub async fn age_histogram(
    State(ctx): State<ApiContext>,
) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::AgeHistogram)
}

/// `GET /api/views/upcoming?as_of=YYYY-MM-DD&window_days=N` (default 30).
pub async fn upcoming(
    State(ctx): State<ApiContext>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    let as_of = parse_as_of(query.as_of.as_deref())?;
    let window_days =
        parse_window_days(query.window_days.as_deref(), DEFAULT_UPCOMING_WINDOW_DAYS)?;
    render(&ctx, ViewRequest::Upcoming { as_of, window_days })
}

/// `GET /api/views/daily-load?as_of=YYYY-MM-DD&window_days=N` (default 10).
pub async fn daily_load(
    State(ctx): State<ApiContext>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    let as_of = parse_as_of(query.as_of.as_deref())?;
    let window_days =
        parse_window_days(query.window_days.as_deref(), DEFAULT_DAILY_LOAD_WINDOW_DAYS)?;
    render(&ctx, ViewRequest::DailyLoad { as_of, window_days })
}

pub async fn conditions(State(ctx): State<ApiContext>) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::Conditions)
}

/// `GET /api/views/crosstab?axis=age_group|gender`. Axis is required.
pub async fn crosstab(
    State(ctx): State<ApiContext>,
    Query(query): Query<CrossTabQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    let raw = query
        .axis
        .ok_or_else(|| ApiError::BadRequest("Missing axis (age_group or gender)".into()))?;
    let axis = CrossTabAxis::from_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("Unknown axis: {raw}")))?;
    render(&ctx, ViewRequest::CrossTab { axis })
}

pub async fn top_doctors(
    State(ctx): State<ApiContext>,
) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::TopDoctors)
}

pub async fn weekly_trend(
    State(ctx): State<ApiContext>,
) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::WeeklyTrend)
}

pub async fn heatmap(State(ctx): State<ApiContext>) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::Heatmap)
}

/// `GET /api/views/search?term=...`. A missing or blank term lists everything.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::search(query.term.as_deref().unwrap_or("")))
}
