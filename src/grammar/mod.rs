//! Grammar engine boundary.
//!
//! DESIGN
//! ======
//! Parsing diagram markup is delegated to a pluggable engine behind an
//! async trait, so a process embedding a real renderer can slot it in. The
//! engine's contract with the rest of the crate is textual: failures carry
//! a message that embeds `line N` (and optionally `column M`) when the
//! position is known. Nothing downstream touches engine internals.
//!
//! [`SequenceGrammar`] is the bundled implementation, strict on sequence
//! diagrams and header-only on the other recognized families.

pub(crate) mod arrows;
pub mod sequence;

pub use sequence::SequenceGrammar;

/// A parse failure reported by a grammar engine.
///
/// Downstream code relies only on the message text. By convention the
/// message embeds `line N` and optionally `column M`; positions that are
/// absent degrade to zero on the structured side.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Boundary to the diagram grammar engine.
///
/// Implementations must report the first error at a stable position across
/// repeated parses of similar text. The repair loop fixes one error per
/// iteration; an unstable error order keeps it from converging.
#[async_trait::async_trait]
pub trait GrammarEngine: Send + Sync {
    /// Parse `code`, returning the first syntax error if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] describing the first failure.
    async fn parse(&self, code: &str) -> Result<(), EngineError>;
}
