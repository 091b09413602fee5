//! Shared types for the API layer.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::error::ApiError;
use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Parse an optional `YYYY-MM-DD` query value, defaulting to today (local).
pub fn parse_as_of(raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(chrono::Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("Invalid as_of date: {s}"))),
    }
}

/// Parse an optional non-negative day count, defaulting to `default`.
pub fn parse_window_days(raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<u32>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid window_days: {s}"))),
    }
}
