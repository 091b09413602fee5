//! Record endpoints: raw tables joined with patient names, plus totals.
//!
//! - `GET /api/summary`
//! - `GET /api/patients`
//! - `GET /api/appointments`
//! - `GET /api/history`

use axum::extract::State;
use axum::Json;

use super::{render, ViewResponse};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::engine::ViewRequest;

pub async fn summary(State(ctx): State<ApiContext>) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::Summary)
}

pub async fn patients(State(ctx): State<ApiContext>) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::Patients)
}

/// Appointments whose patient exists, ordered by id.
pub async fn appointments(
    State(ctx): State<ApiContext>,
) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::Appointments)
}

pub async fn history(State(ctx): State<ApiContext>) -> Result<Json<ViewResponse>, ApiError> {
    render(&ctx, ViewRequest::History)
}
