//! Syntax validation and failure classification.
//!
//! DESIGN
//! ======
//! Wraps the grammar engine and converts its textual failures into
//! structured [`SyntaxError`]s. Position extraction tolerates arbitrary
//! engine text: a missing `line N` or `column M` degrades to zero, never
//! to a panic. Classification is ordered pattern matching over the error
//! text and the offending source line; [`ErrorCategory::Unknown`] is an
//! acceptable outcome, not a failure.
//!
//! `quick_arrow_check` is the parser-independent fast path for the
//! dominant failure class. It shares its arrow table with the bundled
//! engine so the two layers never disagree about a candidate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grammar::arrows::{self, ArrowVerdict};
use crate::grammar::GrammarEngine;
use crate::source::DiagramType;

// =============================================================================
// TYPES
// =============================================================================

/// Failure class driving docs lookup and repair prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed message arrow, the dominant class.
    ArrowSyntax,
    /// Reference to an undeclared or inactive participant.
    MissingDeclaration,
    /// Malformed note statement.
    NoteSyntax,
    /// Recognized parser vocabulary without a more specific class.
    GenericSyntax,
    /// Nothing matched; downstream falls back to the full docs corpus.
    Unknown,
}

/// One structured syntax error derived from engine text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxError {
    /// 1-based line of the failure, 0 when the engine gave no position.
    pub line: usize,
    /// 1-based column, 0 when absent.
    pub column: usize,
    /// Failure description with any positional prefix stripped.
    pub message: String,
    pub category: ErrorCategory,
    /// The offending source line, trimmed. Empty when the line is unknown.
    pub context_line: String,
    /// The engine's error text, verbatim.
    pub raw_message: String,
}

/// Outcome of a full validation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<SyntaxError>,
    pub diagram_type: DiagramType,
}

/// Outcome of the parser-independent arrow scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowCheck {
    pub is_valid: bool,
    pub invalid_lines: Vec<ArrowFinding>,
}

/// One flagged line from [`SyntaxValidator::quick_arrow_check`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowFinding {
    /// 1-based line number.
    pub line: usize,
    pub reason: String,
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Validation front end over a pluggable [`GrammarEngine`].
pub struct SyntaxValidator {
    engine: Arc<dyn GrammarEngine>,
}

impl SyntaxValidator {
    #[must_use]
    pub fn new(engine: Arc<dyn GrammarEngine>) -> Self {
        Self { engine }
    }

    /// Validate `code` against the grammar engine.
    ///
    /// This never fails: engine errors become structured [`SyntaxError`]s,
    /// and unparseable engine text degrades to position zero with category
    /// [`ErrorCategory::Unknown`].
    pub async fn validate(&self, code: &str) -> ValidationResult {
        let diagram_type = DiagramType::detect(code);
        match self.engine.parse(code).await {
            Ok(()) => ValidationResult {
                is_valid: true,
                errors: Vec::new(),
                diagram_type,
            },
            Err(e) => {
                let error = structure_error(code, &e.message);
                debug!(
                    line = error.line,
                    category = ?error.category,
                    "validate: parse failed"
                );
                ValidationResult {
                    is_valid: false,
                    errors: vec![error],
                    diagram_type,
                }
            }
        }
    }

    /// Scan for known-bad arrow shapes without invoking the engine.
    ///
    /// Only sequence and unknown-family sources are scanned; other
    /// families use arrows this check has no business judging. Blank
    /// lines, `%%` comments, diagram-root lines and keyword statements
    /// (participant, note, blocks and so on) are skipped: arrows live in
    /// messages, and the engine tolerates arrow-shaped characters inside
    /// declared names. Only the part before the first `:` is examined so
    /// message text never triggers a finding.
    #[must_use]
    pub fn quick_arrow_check(code: &str) -> ArrowCheck {
        let diagram_type = DiagramType::detect(code);
        if !matches!(diagram_type, DiagramType::Sequence | DiagramType::Unknown) {
            return ArrowCheck {
                is_valid: true,
                invalid_lines: Vec::new(),
            };
        }

        let mut invalid_lines = Vec::new();
        for (idx, raw) in code.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty()
                || line.starts_with("%%")
                || DiagramType::from_root_keyword(line).is_some()
                || is_keyword_statement(line)
            {
                continue;
            }
            let head = line.split_once(':').map_or(line, |(h, _)| h);
            if let Some(scan) = arrows::find_arrow(head) {
                if scan.verdict != ArrowVerdict::Valid {
                    invalid_lines.push(ArrowFinding {
                        line: idx + 1,
                        reason: scan.reason(),
                    });
                }
            }
        }

        ArrowCheck {
            is_valid: invalid_lines.is_empty(),
            invalid_lines,
        }
    }
}

// =============================================================================
// ERROR STRUCTURING
// =============================================================================

fn structure_error(code: &str, raw: &str) -> SyntaxError {
    let line = extract_number(raw, "line");
    let column = extract_number(raw, "column");
    let context_line = if line > 0 {
        code.lines().nth(line - 1).unwrap_or("").trim().to_string()
    } else {
        String::new()
    };
    let message = strip_position_prefix(raw);
    let category = classify(&message, &context_line);
    SyntaxError {
        line,
        column,
        message,
        category,
        context_line,
        raw_message: raw.to_string(),
    }
}

/// Pull the number following `key` out of error text, 0 when absent.
/// Accepts `line 4`, `Line: 4` and similar shapes; `key` must stand as
/// its own word so `multiline` never matches `line`.
fn extract_number(text: &str, key: &str) -> usize {
    let lower = text.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut from = 0;
    while let Some(rel) = lower[from..].find(key) {
        let at = from + rel;
        let boundary = at == 0 || !bytes[at - 1].is_ascii_alphanumeric();
        if boundary {
            let rest = lower[at + key.len()..]
                .trim_start()
                .trim_start_matches(':')
                .trim_start();
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            if let Ok(n) = digits.parse() {
                return n;
            }
        }
        from = at + key.len();
    }
    0
}

/// Drop a leading `Parse error on line N[, column M]: ` prefix.
fn strip_position_prefix(raw: &str) -> String {
    if raw.to_ascii_lowercase().starts_with("parse error") {
        if let Some((_, rest)) = raw.split_once(": ") {
            let rest = rest.trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    raw.trim().to_string()
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Vocabulary that marks an error as parser-spoken even when no more
/// specific class matches.
const GENERIC_VOCAB: [&str; 7] = [
    "syntax error",
    "expecting",
    "expected",
    "invalid",
    "unexpected",
    "unrecognized",
    "missing",
];

/// Statement keywords whose lines are not messages, used to keep arrow
/// evidence out of declarations, notes and block delimiters.
const STATEMENT_KEYWORDS: [&str; 15] = [
    "participant",
    "actor",
    "activate",
    "deactivate",
    "note",
    "loop",
    "alt",
    "opt",
    "par",
    "critical",
    "break",
    "else",
    "and",
    "option",
    "end",
];

fn is_keyword_statement(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| STATEMENT_KEYWORDS.contains(&word.to_ascii_lowercase().as_str()))
}

/// Ordered heuristics: arrow evidence first (message vocabulary or a bad
/// arrow token on the offending message line), then declaration wording,
/// then notes, then generic parser vocabulary.
fn classify(message: &str, context_line: &str) -> ErrorCategory {
    let msg = message.to_ascii_lowercase();

    let head = context_line.split_once(':').map_or(context_line, |(h, _)| h);
    let bad_arrow_in_context = !is_keyword_statement(context_line)
        && arrows::find_arrow(head).is_some_and(|scan| scan.verdict != ArrowVerdict::Valid);
    if msg.contains("arrow") || bad_arrow_in_context {
        return ErrorCategory::ArrowSyntax;
    }

    if msg.contains("undeclared")
        || msg.contains("inactive participant")
        || (msg.contains("participant") && msg.contains("missing"))
    {
        return ErrorCategory::MissingDeclaration;
    }

    if msg.contains("note") || context_line.to_ascii_lowercase().starts_with("note") {
        return ErrorCategory::NoteSyntax;
    }

    if GENERIC_VOCAB.iter().any(|v| msg.contains(v)) {
        return ErrorCategory::GenericSyntax;
    }

    ErrorCategory::Unknown
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
