//! Risk engine error types.

use thiserror::Error;

/// Errors from risk computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Confidence level outside the open interval (0, 1).
    #[error("confidence must be in (0, 1), got {0}")]
    InvalidConfidence(f64),

    /// Simulation count of zero.
    #[error("simulation count must be positive")]
    ZeroSimulations,

    /// The shock correlation matrix is not positive definite.
    #[error("correlation matrix is not positive definite")]
    Correlation,
}
