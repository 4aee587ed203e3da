//! Healing loop: validate, diagnose, prompt, extract, verify.
//!
//! DESIGN
//! ======
//! The healer proposes, the caller disposes. One call to
//! [`Healer::propose_iteration`] produces one [`HealingProposal`]; it is
//! the caller who decides to apply it, re-check it, or come back for
//! another iteration. The iteration counter therefore lives with the
//! caller too, and only the bound is enforced here. A failed call (model
//! error, extraction failure, line-count mismatch) consumes no budget.
//!
//! Candidates are held to a structural invariant before anyone sees them:
//! same line count as the input, trailing blank lines ignored. Repairs
//! are token-level edits, so a candidate that grew or shrank rewrote the
//! diagram and is rejected outright.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::docs;
use crate::error::HealError;
use crate::grammar::GrammarEngine;
use crate::llm::types::Message;
use crate::llm::LlmChat;
use crate::prompt;
use crate::source::{line_count, DiagramType};
use crate::validator::{ErrorCategory, SyntaxError, SyntaxValidator};

pub const MIN_MAX_ITERATIONS: u32 = 1;
pub const MAX_MAX_ITERATIONS: u32 = 10;
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

const DEFAULT_HEAL_MAX_TOKENS: u32 = 2048;
const DEFAULT_HEAL_TEMPERATURE: f32 = 0.1;

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn heal_max_tokens() -> u32 {
    static VALUE: OnceLock<u32> = OnceLock::new();
    *VALUE.get_or_init(|| env_parse("HEAL_MAX_TOKENS", DEFAULT_HEAL_MAX_TOKENS))
}

fn heal_temperature() -> f32 {
    static VALUE: OnceLock<f32> = OnceLock::new();
    *VALUE.get_or_init(|| env_parse("HEAL_TEMPERATURE", DEFAULT_HEAL_TEMPERATURE))
}

// =============================================================================
// SESSION CONFIG
// =============================================================================

/// Rejected session bound: `max_iterations` must stay within 1..=10.
#[derive(Debug, thiserror::Error)]
#[error("max_iterations out of range: {requested} (allowed 1..=10)")]
pub struct IterationBoundError {
    pub requested: u32,
}

/// Per-session healing limits.
///
/// The bound is validated at construction, so a held config is always
/// in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    max_iterations: u32,
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns [`IterationBoundError`] when `max_iterations` falls
    /// outside 1..=10.
    pub fn new(max_iterations: u32) -> Result<Self, IterationBoundError> {
        if !(MIN_MAX_ITERATIONS..=MAX_MAX_ITERATIONS).contains(&max_iterations) {
            return Err(IterationBoundError { requested: max_iterations });
        }
        Ok(Self { max_iterations })
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_iterations: DEFAULT_MAX_ITERATIONS }
    }
}

// =============================================================================
// PROPOSAL TYPES
// =============================================================================

/// One proposed repair, with everything needed to review it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealingProposal {
    pub proposed_code: String,
    pub original_code: String,
    /// The error this proposal responds to.
    pub error: SyntaxError,
    /// Valid statements from the docs entries cited for the error.
    pub valid_examples: Vec<String>,
    /// Known-wrong forms with corrective notes, from the same entries.
    pub common_mistakes: Vec<String>,
    /// Model prose outside the code block, empty when there was none.
    pub explanation: String,
    /// 1-based iteration this proposal belongs to.
    pub iteration: u32,
}

/// Verdict on a candidate, quick arrow scan first, then the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealingValidation {
    pub is_valid: bool,
    pub still_has_errors: bool,
    /// Human-readable error lines, empty when valid.
    pub errors: Vec<String>,
    /// Category of the first remaining error, if any.
    pub new_error_category: Option<ErrorCategory>,
}

// =============================================================================
// HEALER
// =============================================================================

/// Drives one healing session against a grammar engine and an LLM.
pub struct Healer {
    validator: SyntaxValidator,
    llm: Arc<dyn LlmChat>,
    config: SessionConfig,
    session_id: Uuid,
}

impl Healer {
    #[must_use]
    pub fn new(engine: Arc<dyn GrammarEngine>, llm: Arc<dyn LlmChat>, config: SessionConfig) -> Self {
        Self {
            validator: SyntaxValidator::new(engine),
            llm,
            config,
            session_id: Uuid::new_v4(),
        }
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// The session's validator, for callers that want a plain validation
    /// pass without proposing anything.
    #[must_use]
    pub fn validator(&self) -> &SyntaxValidator {
        &self.validator
    }

    /// Run one repair iteration over `code`.
    ///
    /// `iteration` is 1-based and caller-owned; calls past the configured
    /// bound are rejected before any model traffic.
    ///
    /// # Errors
    ///
    /// - [`HealError::IterationLimitExceeded`] outside `1..=max_iterations`
    /// - [`HealError::AlreadyValid`] when `code` parses
    /// - [`HealError::NoErrorsDetected`] on an invalid result with no details
    /// - [`HealError::Llm`] when the model call fails
    /// - [`HealError::ExtractionFailed`] when no diagram block is found
    /// - [`HealError::LineCountMismatch`] when the candidate resizes the
    ///   diagram
    pub async fn propose_iteration(
        &self,
        code: &str,
        iteration: u32,
    ) -> Result<HealingProposal, HealError> {
        let max = self.config.max_iterations();
        if iteration == 0 || iteration > max {
            return Err(HealError::IterationLimitExceeded { iteration, max });
        }

        let validation = self.validator.validate(code).await;
        if validation.is_valid {
            return Err(HealError::AlreadyValid);
        }
        let Some(error) = validation.errors.into_iter().next() else {
            return Err(HealError::NoErrorsDetected);
        };

        info!(
            session_id = %self.session_id,
            iteration,
            line = error.line,
            category = ?error.category,
            "heal: proposing repair"
        );

        let docs_context = docs::build_context(error.category);
        let user_prompt = prompt::build_repair_prompt(code, &error, &docs_context);
        let messages = [Message::user(user_prompt)];

        let response = self
            .llm
            .chat(
                heal_max_tokens(),
                heal_temperature(),
                prompt::system_prompt(),
                &messages,
            )
            .await?;

        info!(
            session_id = %self.session_id,
            iteration,
            stop_reason = %response.stop_reason,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "heal: model responded"
        );

        let text = response.text();
        let Some((candidate, explanation)) = extract_diagram(&text) else {
            warn!(session_id = %self.session_id, iteration, "heal: no diagram in response");
            return Err(HealError::ExtractionFailed);
        };

        let expected = line_count(code);
        let actual = line_count(&candidate);
        if expected != actual {
            warn!(
                session_id = %self.session_id,
                iteration,
                expected,
                actual,
                "heal: candidate resized the diagram"
            );
            return Err(HealError::LineCountMismatch { expected, actual });
        }

        let entries = docs::lookup(error.category);
        let valid_examples = entries
            .iter()
            .flat_map(|e| e.examples.iter().map(ToString::to_string))
            .collect();
        let common_mistakes = entries
            .iter()
            .flat_map(|e| e.mistakes.iter().map(|m| format!("{} ({})", m.wrong, m.note)))
            .collect();

        Ok(HealingProposal {
            proposed_code: candidate,
            original_code: code.to_string(),
            error,
            valid_examples,
            common_mistakes,
            explanation,
            iteration,
        })
    }

    /// Re-check a proposed candidate: quick arrow scan first so the
    /// dominant failure class never costs an engine pass, then the full
    /// engine.
    pub async fn validate_proposed_fix(&self, code: &str) -> HealingValidation {
        let quick = SyntaxValidator::quick_arrow_check(code);
        if !quick.is_valid {
            let errors = quick
                .invalid_lines
                .iter()
                .map(|f| format!("line {}: {}", f.line, f.reason))
                .collect();
            return HealingValidation {
                is_valid: false,
                still_has_errors: true,
                errors,
                new_error_category: Some(ErrorCategory::ArrowSyntax),
            };
        }

        let validation = self.validator.validate(code).await;
        if validation.is_valid {
            return HealingValidation {
                is_valid: true,
                still_has_errors: false,
                errors: Vec::new(),
                new_error_category: None,
            };
        }

        let new_error_category = validation.errors.first().map(|e| e.category);
        let errors = validation.errors.iter().map(describe_error).collect();
        HealingValidation {
            is_valid: false,
            still_has_errors: true,
            errors,
            new_error_category,
        }
    }
}

fn describe_error(error: &SyntaxError) -> String {
    if error.line > 0 {
        format!("line {}: {}", error.line, error.message)
    } else {
        error.message.clone()
    }
}

// =============================================================================
// RESPONSE EXTRACTION
// =============================================================================

/// Pull (diagram, surrounding prose) out of model response text.
///
/// Layered: a ```mermaid fence wins, any fence is second, and as a last
/// resort the text from the first diagram-root keyword onward is taken.
fn extract_diagram(text: &str) -> Option<(String, String)> {
    if let Some(found) = take_fenced(text, "mermaid") {
        return Some(found);
    }
    if let Some(found) = take_fenced(text, "") {
        return Some(found);
    }
    take_from_root_keyword(text)
}

/// Extract the first fenced block whose info string matches `tag` (any
/// fence when `tag` is empty). An unterminated block runs to the end of
/// the text. Non-matching blocks are skipped whole, so a stray ```json
/// block cannot swallow the diagram that follows it.
fn take_fenced(text: &str, tag: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        let Some(info) = lines[i].trim().strip_prefix("```") else {
            i += 1;
            continue;
        };

        let mut close = None;
        for (j, line) in lines.iter().enumerate().skip(i + 1) {
            if line.trim() == "```" {
                close = Some(j);
                break;
            }
        }

        let wanted = tag.is_empty() || info.trim().eq_ignore_ascii_case(tag);
        if wanted {
            let end = close.unwrap_or(lines.len());
            let code = tidy_candidate(&lines[i + 1..end].join("\n"));
            let mut prose: Vec<&str> = lines[..i].to_vec();
            if let Some(c) = close {
                prose.extend(&lines[c + 1..]);
            }
            let explanation = prose.join("\n").trim().to_string();
            return Some((code, explanation));
        }

        i = close.map_or(lines.len(), |c| c + 1);
    }
    None
}

/// Last-resort extraction: everything from the first line whose leading
/// word is a diagram root. Prose above it becomes the explanation.
fn take_from_root_keyword(text: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|line| DiagramType::from_root_keyword(line).is_some())?;
    let code = tidy_candidate(&lines[start..].join("\n"));
    let explanation = lines[..start].join("\n").trim().to_string();
    Some((code, explanation))
}

/// Strip cosmetic padding a model adds around a code block. Leading
/// newline runs and trailing whitespace go; interior lines are untouched.
/// [`line_count`] applies the same trim on both sides of the comparison,
/// so an original that opens with a blank line still matches a candidate
/// whose extraction dropped it.
fn tidy_candidate(code: &str) -> String {
    code.trim_start_matches(['\r', '\n']).trim_end().to_string()
}

#[cfg(test)]
#[path = "healer_test.rs"]
mod tests;
