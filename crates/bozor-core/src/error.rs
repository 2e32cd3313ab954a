//! # AppError
//!
//! Centralized error handling for the bozor data layer.
//! A failed validation aborts the whole write attempt for that record.

use thiserror::Error;

/// The primary error type for all bozor-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Category, Ad, User)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., required field empty, malformed phone number)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Unique constraint violated (e.g., duplicate email or slug)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for bozor-core logic.
pub type Result<T> = std::result::Result<T, AppError>;
