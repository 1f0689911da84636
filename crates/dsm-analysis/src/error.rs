//! Error types for dsm-analysis.

use thiserror::Error;

use dsm_core::error::DsmError;
use dsm_core::matrix::MatrixVariant;

/// Result alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors raised by the analysis algorithms.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// A parameter failed validation.
    ///
    /// # When This Occurs
    ///
    /// - Vigilance outside `[0, 1]`
    /// - Non-finite weight threshold or beta
    /// - Zero prototype budget or pass cap
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The algorithm was handed a matrix variant it does not operate on.
    #[error("analysis requires a {expected} matrix, got {actual}")]
    WrongVariant {
        /// Variant the algorithm is defined for.
        expected: MatrixVariant,
        /// Variant of the matrix it was called on.
        actual: MatrixVariant,
    },

    /// A core lookup or mutation failed.
    #[error(transparent)]
    Core(#[from] DsmError),
}
