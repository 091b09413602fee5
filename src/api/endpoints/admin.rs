//! `POST /api/reload` re-reads the store and drops cached views.
//! `GET /api/audit` returns the buffered access log.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::AuditEntry;

#[derive(Serialize)]
pub struct ReloadResponse {
    pub store_version: u64,
    pub loaded_at: DateTime<Utc>,
    pub patients: usize,
    pub appointments: usize,
    pub history_entries: usize,
}

pub async fn reload(State(ctx): State<ApiContext>) -> Result<Json<ReloadResponse>, ApiError> {
    let store = ctx.core.reload()?;
    Ok(Json(ReloadResponse {
        store_version: store.version,
        loaded_at: store.loaded_at,
        patients: store.snapshot.patients.len(),
        appointments: store.snapshot.appointments.len(),
        history_entries: store.snapshot.history.len(),
    }))
}

#[derive(Serialize)]
pub struct AuditResponse {
    pub entries: Vec<AuditEntry>,
}

/// Recent accesses, oldest first. The request reading the log is not in it.
pub async fn audit(State(ctx): State<ApiContext>) -> Json<AuditResponse> {
    Json(AuditResponse {
        entries: ctx.core.audit_entries(),
    })
}
