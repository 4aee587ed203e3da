use super::*;
use crate::grammar::{EngineError, SequenceGrammar};

// =============================================================================
// MockEngine
// =============================================================================

/// Engine that always reports the given error text, or passes when `None`.
struct MockEngine {
    error: Option<String>,
}

impl MockEngine {
    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { error: Some(message.to_string()) })
    }

    fn passing() -> Arc<Self> {
        Arc::new(Self { error: None })
    }
}

#[async_trait::async_trait]
impl GrammarEngine for MockEngine {
    async fn parse(&self, _code: &str) -> Result<(), EngineError> {
        match &self.error {
            Some(message) => Err(EngineError::new(message.clone())),
            None => Ok(()),
        }
    }
}

// =============================================================================
// VALIDATE
// =============================================================================

#[tokio::test]
async fn valid_code_has_no_errors() {
    let validator = SyntaxValidator::new(MockEngine::passing());
    let result = validator.validate("sequenceDiagram\nA->>B: hi").await;
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert_eq!(result.diagram_type, DiagramType::Sequence);
}

#[tokio::test]
async fn engine_error_is_structured() {
    let validator = SyntaxValidator::new(Arc::new(SequenceGrammar));
    let result = validator.validate("sequenceDiagram\nAlice->Bob: Hello").await;

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    assert_eq!(error.line, 2);
    assert_eq!(error.column, 6);
    assert_eq!(error.category, ErrorCategory::ArrowSyntax);
    assert_eq!(error.context_line, "Alice->Bob: Hello");
    assert!(error.message.starts_with("invalid arrow"));
    assert!(error.raw_message.starts_with("Parse error on line 2"));
}

#[tokio::test]
async fn unparseable_engine_text_degrades_to_zero() {
    let validator = SyntaxValidator::new(MockEngine::failing("something broke"));
    let result = validator.validate("sequenceDiagram\nA->>B: hi").await;

    assert!(!result.is_valid);
    let error = &result.errors[0];
    assert_eq!(error.line, 0);
    assert_eq!(error.column, 0);
    assert!(error.context_line.is_empty());
    assert_eq!(error.message, "something broke");
    assert_eq!(error.raw_message, "something broke");
    assert_eq!(error.category, ErrorCategory::Unknown);
}

#[tokio::test]
async fn out_of_range_line_keeps_empty_context() {
    let validator = MockEngine::failing("Parse error on line 99: expecting something");
    let result = SyntaxValidator::new(validator).validate("sequenceDiagram").await;
    let error = &result.errors[0];
    assert_eq!(error.line, 99);
    assert!(error.context_line.is_empty());
    assert_eq!(error.category, ErrorCategory::GenericSyntax);
}

#[tokio::test]
async fn diagram_type_reported_even_when_invalid() {
    let validator = SyntaxValidator::new(MockEngine::failing("boom"));
    let result = validator.validate("gantt\ntitle X").await;
    assert_eq!(result.diagram_type, DiagramType::Schedule);
}

#[tokio::test]
async fn validation_is_idempotent() {
    let validator = SyntaxValidator::new(Arc::new(SequenceGrammar));

    let valid = "sequenceDiagram\nA->>B: hi";
    assert!(validator.validate(valid).await.is_valid);
    assert!(validator.validate(valid).await.is_valid);

    let invalid = "sequenceDiagram\nA->B: hi";
    let first = validator.validate(invalid).await;
    let second = validator.validate(invalid).await;
    assert_eq!(first.errors[0].category, second.errors[0].category);
    assert_eq!(first.errors[0].line, second.errors[0].line);
}

// =============================================================================
// POSITION EXTRACTION
// =============================================================================

#[test]
fn extracts_line_and_column() {
    let raw = "Parse error on line 12, column 4: oops";
    assert_eq!(extract_number(raw, "line"), 12);
    assert_eq!(extract_number(raw, "column"), 4);
}

#[test]
fn extraction_tolerates_other_shapes() {
    assert_eq!(extract_number("error at Line: 7 in input", "line"), 7);
    assert_eq!(extract_number("LINE 3 bad", "line"), 3);
    assert_eq!(extract_number("no position here", "line"), 0);
    assert_eq!(extract_number("", "line"), 0);
}

#[test]
fn extraction_requires_word_boundary() {
    assert_eq!(extract_number("multiline 5 problem", "line"), 0);
    assert_eq!(extract_number("newline 9", "line"), 0);
    // a later standalone key still matches
    assert_eq!(extract_number("multiline text, line 9", "line"), 9);
}

#[test]
fn prefix_stripping() {
    assert_eq!(
        strip_position_prefix("Parse error on line 2, column 8: invalid arrow '->'"),
        "invalid arrow '->'"
    );
    assert_eq!(strip_position_prefix("Parse error on line 4: missing 'end'"), "missing 'end'");
    // non-positional text passes through whole
    assert_eq!(strip_position_prefix("expected X: Y here"), "expected X: Y here");
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn classify_arrow_from_message() {
    assert_eq!(classify("invalid arrow '->'", ""), ErrorCategory::ArrowSyntax);
}

#[test]
fn classify_arrow_from_context_evidence() {
    // vague message, but the offending line carries a bad arrow
    assert_eq!(classify("syntax error near token", "Alice->Bob: Hi"), ErrorCategory::ArrowSyntax);
}

#[test]
fn classify_keyword_lines_never_give_arrow_evidence() {
    // an arrow-shaped participant name inside a note is not arrow evidence
    assert_eq!(classify("note missing ':' here", "Note over A->B x"), ErrorCategory::NoteSyntax);
}

#[test]
fn classify_missing_declaration() {
    assert_eq!(
        classify("activate of undeclared participant 'Bob'", "activate Bob"),
        ErrorCategory::MissingDeclaration
    );
    assert_eq!(
        classify("deactivate of inactive participant 'Bob'", "deactivate Bob"),
        ErrorCategory::MissingDeclaration
    );
    assert_eq!(
        classify("participant declaration missing a name", "participant"),
        ErrorCategory::MissingDeclaration
    );
}

#[test]
fn classify_note_syntax() {
    assert_eq!(classify("invalid note position 'Bob'", "Note Bob: x"), ErrorCategory::NoteSyntax);
    // context alone is enough
    assert_eq!(classify("weird failure", "Note over Alice"), ErrorCategory::NoteSyntax);
}

#[test]
fn classify_generic_vocabulary() {
    for message in [
        "syntax error, unrecognized statement 'zzz'",
        "expecting a diagram type declaration",
        "unexpected 'end' with no open block",
        "message missing ':' before the message text",
    ] {
        assert_eq!(classify(message, "zzz"), ErrorCategory::GenericSyntax, "{message}");
    }
}

#[test]
fn classify_unknown_when_nothing_matches() {
    assert_eq!(classify("empty diagram source", ""), ErrorCategory::Unknown);
    assert_eq!(classify("renderer exploded", "A->>B: fine"), ErrorCategory::Unknown);
}

// =============================================================================
// QUICK ARROW CHECK
// =============================================================================

#[test]
fn quick_check_passes_valid_arrows() {
    let code = "sequenceDiagram\nA->>B: hi\nB-->>A: yo\nA-)B: async\nA-xB: cross";
    let check = SyntaxValidator::quick_arrow_check(code);
    assert!(check.is_valid);
    assert!(check.invalid_lines.is_empty());
}

#[test]
fn quick_check_flags_each_bad_line() {
    let code = "sequenceDiagram\nA->B: one\nB->>A: fine\nB-->A: two";
    let check = SyntaxValidator::quick_arrow_check(code);
    assert!(!check.is_valid);
    assert_eq!(check.invalid_lines.len(), 2);
    assert_eq!(check.invalid_lines[0].line, 2);
    assert!(check.invalid_lines[0].reason.contains("'->'"));
    assert_eq!(check.invalid_lines[1].line, 4);
    assert!(check.invalid_lines[1].reason.contains("'-->'"));
}

#[test]
fn quick_check_skips_non_message_lines() {
    let code = "sequenceDiagram\n%% A->B in a comment\n\nNote over A->B: odd name\nparticipant X->Y\nA->>B: ok";
    let check = SyntaxValidator::quick_arrow_check(code);
    assert!(check.is_valid, "{:?}", check.invalid_lines);
}

#[test]
fn quick_check_ignores_message_text() {
    let code = "sequenceDiagram\nA->>B: use -> in C++";
    assert!(SyntaxValidator::quick_arrow_check(code).is_valid);
}

#[test]
fn quick_check_trivially_passes_other_families() {
    let code = "flowchart TD\nA --> B\nB --> C";
    let check = SyntaxValidator::quick_arrow_check(code);
    assert!(check.is_valid);
}

#[test]
fn quick_check_scans_unknown_family() {
    let code = "no header here\nA->B: broken";
    let check = SyntaxValidator::quick_arrow_check(code);
    assert!(!check.is_valid);
    assert_eq!(check.invalid_lines[0].line, 2);
}
