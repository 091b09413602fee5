//! API endpoint handlers.
//!
//! `records` serves the raw tables and the summary, `views` the derived
//! aggregations, `admin` the store reload.

pub mod admin;
pub mod health;
pub mod records;
pub mod views;

use std::sync::Arc;

use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::engine::{ViewRequest, ViewResult};
use crate::models::enums::ViewName;

/// Envelope for every view response.
#[derive(Serialize)]
pub struct ViewResponse {
    pub view: ViewName,
    /// Store generation the data was computed from.
    pub store_version: u64,
    pub data: Arc<ViewResult>,
}

/// Evaluate `request` through the shared cache and wrap the result.
pub(crate) fn render(
    ctx: &ApiContext,
    request: ViewRequest,
) -> Result<Json<ViewResponse>, ApiError> {
    let (store_version, data) = ctx.core.view_versioned(&request)?;
    Ok(Json(ViewResponse {
        view: request.name(),
        store_version,
        data,
    }))
}
