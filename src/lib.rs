//! Self-healing for diagram markup.
//!
//! Broken mermaid-style diagram text goes in; a reviewed, bounded series
//! of proposed repairs comes out. The crate validates against a pluggable
//! grammar engine, classifies the first failure, cites the matching slice
//! of a bundled syntax reference, asks an LLM for a minimal fix, and
//! holds every candidate to a structural invariant before anyone sees it.
//!
//! ARCHITECTURE
//! ============
//! - [`grammar`]: engine trait plus the bundled strict sequence parser
//! - [`validator`]: structured errors and failure classification
//! - [`docs`]: static syntax corpus keyed by failure class
//! - [`prompt`]: deterministic repair prompt construction
//! - [`llm`]: provider-neutral chat trait, Anthropic and `OpenAI` clients
//! - [`healer`]: the loop body tying the above together
//!
//! The healer proposes, the caller disposes: iteration counting and the
//! decision to accept a proposal stay with the caller.

pub mod docs;
pub mod error;
pub mod grammar;
pub mod healer;
pub mod llm;
pub mod prompt;
pub mod source;
pub mod validator;

pub use error::{ErrorCode, HealError};
pub use grammar::{EngineError, GrammarEngine, SequenceGrammar};
pub use healer::{Healer, HealingProposal, HealingValidation, IterationBoundError, SessionConfig};
pub use llm::types::{LlmChat, LlmError};
pub use llm::LlmClient;
pub use source::{DiagramSource, DiagramType};
pub use validator::{
    ArrowCheck, ArrowFinding, ErrorCategory, SyntaxError, SyntaxValidator, ValidationResult,
};
