//! Repository layer: table-scoped database operations.
//!
//! Every `list_*` function validates rows on the way out: blank required
//! text, negative ages and unparseable dates become
//! `DatabaseError::Validation` instead of reaching the query engine.

mod appointment;
mod medical_history;
mod patient;

use chrono::NaiveDate;
use rusqlite::types::Value;

use super::DatabaseError;
use crate::models::AppointmentTime;

pub use appointment::*;
pub use medical_history::*;
pub use patient::*;

/// Required text column: present and not blank.
fn required_text(
    table: &'static str,
    row_id: i64,
    field: &str,
    value: Option<String>,
) -> Result<String, DatabaseError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(DatabaseError::Validation {
            table,
            row_id,
            reason: format!("missing required field '{field}'"),
        }),
    }
}

/// Optional text column: blank strings collapse to `None`.
fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Integer column that legacy files may have stored as text.
fn integer_field(
    table: &'static str,
    row_id: i64,
    field: &str,
    value: Value,
) -> Result<i64, DatabaseError> {
    let invalid = |reason: String| DatabaseError::Validation {
        table,
        row_id,
        reason,
    };
    match value {
        Value::Integer(i) => Ok(i),
        Value::Real(f) if f.fract() == 0.0 => Ok(f as i64),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("'{field}' is not an integer: {s}"))),
        Value::Null => Err(invalid(format!("missing required field '{field}'"))),
        other => Err(invalid(format!("'{field}' is not an integer: {other:?}"))),
    }
}

fn calendar_date(
    table: &'static str,
    row_id: i64,
    field: &str,
    value: Option<String>,
) -> Result<NaiveDate, DatabaseError> {
    let raw = required_text(table, row_id, field, value)?;
    // Some writers store a timestamp for DATE columns; keep the date part.
    AppointmentTime::parse(&raw)
        .map(|t| t.date())
        .ok_or_else(|| DatabaseError::Validation {
            table,
            row_id,
            reason: format!("'{field}' is not a calendar date: {raw}"),
        })
}
