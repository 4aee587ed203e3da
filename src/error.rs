//! Error taxonomy for the healing engine.
//!
//! DESIGN
//! ======
//! Failures are a closed enum with structured fields, so callers branch on
//! variants instead of matching message substrings. A failed call never
//! consumes the caller's iteration budget: the caller decides whether to
//! re-attempt, and [`ErrorCode::retryable`] says when that is sensible.

use crate::llm::types::LlmError;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Structured error metadata: a grepable code plus a retryable flag.
pub trait ErrorCode: std::fmt::Display {
    /// Stable code for logs and programmatic matching.
    fn error_code(&self) -> &'static str;

    /// `true` when a clean re-attempt of the same call can succeed.
    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// HEALING ERRORS
// =============================================================================

/// Failure of a single healing call.
///
/// Every variant is fatal to the call, not to the session: the iteration
/// counter belongs to the caller and only advances when a returned proposal
/// re-validates as still broken.
#[derive(Debug, thiserror::Error)]
pub enum HealError {
    /// The iteration argument falls outside the session bound.
    #[error("iteration {iteration} outside the configured bound 1..={max}")]
    IterationLimitExceeded { iteration: u32, max: u32 },

    /// The submitted source already parses; there is nothing to repair.
    #[error("source is already valid, nothing to repair")]
    AlreadyValid,

    /// The validator reported invalid input but produced no error details.
    #[error("validator reported invalid input but no errors")]
    NoErrorsDetected,

    /// No recognizable diagram block in the collaborator response.
    #[error("no diagram code found in the model response")]
    ExtractionFailed,

    /// The candidate restructured the diagram instead of patching it.
    #[error("candidate has {actual} lines, expected {expected}")]
    LineCountMismatch { expected: usize, actual: usize },

    /// The model call itself failed.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl ErrorCode for HealError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::IterationLimitExceeded { .. } => "E_ITERATION_LIMIT",
            Self::AlreadyValid => "E_ALREADY_VALID",
            Self::NoErrorsDetected => "E_NO_ERRORS",
            Self::ExtractionFailed => "E_EXTRACTION_FAILED",
            Self::LineCountMismatch { .. } => "E_LINE_COUNT_MISMATCH",
            Self::Llm(_) => "E_LLM",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::ExtractionFailed | Self::LineCountMismatch { .. } => true,
            Self::Llm(e) => e.retryable(),
            Self::IterationLimitExceeded { .. } | Self::AlreadyValid | Self::NoErrorsDetected => {
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
