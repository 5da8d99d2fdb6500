//! Error types for U-Stacking.

use thiserror::Error;

/// Result type alias for U-Stacking operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or exporting a stacking analysis.
///
/// Infeasible stacking branches are never reported through this type: they
/// simply produce no solution.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid box (item) properties.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid pallet or interlayer properties.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// Invalid constraint set or solver configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O failure while exporting a solution.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
