//! Convenience result type alias for ClientDesk.

use crate::error::AppError;

/// A specialized `Result` type for ClientDesk operations.
pub type AppResult<T> = Result<T, AppError>;
