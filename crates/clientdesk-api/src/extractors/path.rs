//! Typed path parameter helpers.

use clientdesk_core::error::AppError;

/// Parses a numeric id from a path segment. A malformed id names no row,
/// so it is reported as not found.
pub fn parse_id(raw: &str, resource: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::not_found(format!("{resource} {raw} not found")))
}
