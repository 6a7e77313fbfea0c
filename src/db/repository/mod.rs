//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`, so the same code runs on a
//! plain connection or inside a `Transaction`.

mod checkin;
mod company;
mod person;
mod report;

use chrono::NaiveDateTime;

pub use checkin::*;
pub use company::*;
pub use person::*;
pub use report::*;

/// Text layout of timestamps stored by SQLite's `CURRENT_TIMESTAMP`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label for persons registered without a sector.
pub const NO_SECTOR: &str = "Não informado";

/// Format a timestamp the way it is stored, for range comparisons in SQL.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Whether `err` is a UNIQUE violation on `table.column`.
pub(crate) fn is_unique_violation(err: &rusqlite::Error, column: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg)) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("UNIQUE")
                && msg.contains(column)
        }
        _ => false,
    }
}

/// `part / total` as a percentage with two decimals; 0 when `total` is 0.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (part as f64 * 10_000.0 / total as f64).round() / 100.0
}
