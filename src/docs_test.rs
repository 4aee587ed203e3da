use super::*;

// =============================================================================
// LOOKUP
// =============================================================================

#[test]
fn arrow_errors_cite_messages_only() {
    let entries = lookup(ErrorCategory::ArrowSyntax);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].topic, "messages");
}

#[test]
fn declaration_errors_cite_participants_and_activations() {
    let entries = lookup(ErrorCategory::MissingDeclaration);
    let topics: Vec<&str> = entries.iter().map(|e| e.topic).collect();
    assert_eq!(topics, vec!["participants", "activations"]);
}

#[test]
fn note_errors_cite_notes() {
    let entries = lookup(ErrorCategory::NoteSyntax);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].topic, "notes");
}

#[test]
fn generic_errors_cite_structure_and_blocks() {
    let topics: Vec<&str> = lookup(ErrorCategory::GenericSyntax).iter().map(|e| e.topic).collect();
    // corpus order, not mapping order
    assert_eq!(topics, vec!["blocks", "structure"]);
}

#[test]
fn unknown_pulls_the_whole_corpus() {
    let entries = lookup(ErrorCategory::Unknown);
    assert_eq!(entries.len(), 6);
}

#[test]
fn every_entry_is_usable() {
    for entry in lookup(ErrorCategory::Unknown) {
        assert!(!entry.section.is_empty());
        assert!(!entry.topic.is_empty());
        assert!(!entry.description.is_empty());
        assert!(!entry.syntax.is_empty());
        assert!(!entry.examples.is_empty(), "{} has no examples", entry.topic);
        assert!(!entry.mistakes.is_empty(), "{} has no mistakes", entry.topic);
    }
}

// =============================================================================
// CONTEXT RENDERING
// =============================================================================

#[test]
fn context_is_deterministic() {
    let first = build_context(ErrorCategory::ArrowSyntax);
    let second = build_context(ErrorCategory::ArrowSyntax);
    assert_eq!(first, second);
}

#[test]
fn arrow_context_shows_forms_and_mistakes() {
    let context = build_context(ErrorCategory::ArrowSyntax);
    assert!(context.contains("[sequence: messages]"));
    assert!(context.contains("Sender->>Receiver: Message text"));
    assert!(context.contains("Valid examples:"));
    assert!(context.contains("Alice->>Bob: Hello Bob"));
    assert!(context.contains("Common mistakes:"));
    assert!(context.contains("Alice->Bob: Hello"));
    // focused: no note material for an arrow error
    assert!(!context.contains("[sequence: notes]"));
}

#[test]
fn note_context_includes_positions() {
    let context = build_context(ErrorCategory::NoteSyntax);
    assert!(context.contains("Note right of Bob"));
    assert!(context.contains("left of"));
}

#[test]
fn multiline_examples_are_indented_per_line() {
    let context = build_context(ErrorCategory::GenericSyntax);
    // block examples span lines; each rendered line carries the indent
    assert!(context.contains("  loop Every minute"));
    assert!(context.contains("  end"));
}
