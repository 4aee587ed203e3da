//! Static syntax reference corpus and targeted lookup.
//!
//! DESIGN
//! ======
//! The corpus ships with the crate instead of being fetched: the repair
//! prompt needs a few focused paragraphs, not a documentation site, and a
//! static table keeps lookups deterministic. Entries are keyed by topic;
//! each [`ErrorCategory`] maps to the topics worth citing for it, and
//! [`ErrorCategory::Unknown`] pulls the whole corpus.

use std::fmt::Write as _;

use crate::validator::ErrorCategory;

/// One reference entry of the syntax corpus.
#[derive(Debug, Clone, Copy)]
pub struct DocEntry {
    /// Corpus section, e.g. `sequence`.
    pub section: &'static str,
    /// Topic key used by category lookup.
    pub topic: &'static str,
    pub description: &'static str,
    /// Canonical statement shape.
    pub syntax: &'static str,
    pub examples: &'static [&'static str],
    pub mistakes: &'static [Mistake],
}

/// A frequently seen wrong form paired with its corrective note.
#[derive(Debug, Clone, Copy)]
pub struct Mistake {
    pub wrong: &'static str,
    pub note: &'static str,
}

// =============================================================================
// CORPUS
// =============================================================================

static CORPUS: [DocEntry; 6] = [
    DocEntry {
        section: "sequence",
        topic: "messages",
        description: "Messages connect two participants with an arrow and carry their text after a colon.",
        syntax: "Sender->>Receiver: Message text",
        examples: &[
            "Alice->>Bob: Hello Bob",
            "Bob-->>Alice: Hi Alice",
            "Client-)Server: Fire and forget",
            "Server--)Client: Async reply",
            "Alice-xBob: Lost message",
        ],
        mistakes: &[
            Mistake {
                wrong: "Alice->Bob: Hello",
                note: "single '>' arrowhead, write 'Alice->>Bob: Hello'",
            },
            Mistake {
                wrong: "Alice-->Bob: Hello",
                note: "dotted lines also need a double arrowhead, write 'Alice-->>Bob: Hello'",
            },
            Mistake {
                wrong: "Alice->>>Bob: Hello",
                note: "too many arrowheads, write 'Alice->>Bob: Hello'",
            },
            Mistake {
                wrong: "Alice->>Bob Hello",
                note: "the message text needs a ':' before it",
            },
        ],
    },
    DocEntry {
        section: "sequence",
        topic: "participants",
        description: "Participants are declared up front with an optional display alias. Declaration order fixes column order.",
        syntax: "participant Name as Display Name",
        examples: &[
            "participant A as Alice",
            "participant B as Bob",
            "actor U as User",
            "participant DB",
        ],
        mistakes: &[
            Mistake {
                wrong: "participant",
                note: "the declaration needs a name",
            },
            Mistake {
                wrong: "participant A as",
                note: "'as' must be followed by a display alias",
            },
        ],
    },
    DocEntry {
        section: "sequence",
        topic: "activations",
        description: "Activations mark a participant as busy between activate and deactivate. Participants must appear before they are activated, and deactivate requires a matching activate.",
        syntax: "activate Name / deactivate Name",
        examples: &[
            "activate Bob",
            "deactivate Bob",
        ],
        mistakes: &[
            Mistake {
                wrong: "deactivate Bob (without a prior activate)",
                note: "deactivating an inactive participant is an error",
            },
            Mistake {
                wrong: "activate Bob (before Bob is declared or messaged)",
                note: "introduce the participant first",
            },
        ],
    },
    DocEntry {
        section: "sequence",
        topic: "notes",
        description: "Notes attach commentary to one or two participants at a position.",
        syntax: "Note left of|right of|over Name[,Other]: Note text",
        examples: &[
            "Note right of Bob: Bob thinks",
            "Note left of Alice: Alice waits",
            "Note over Alice,Bob: A shared note",
        ],
        mistakes: &[
            Mistake {
                wrong: "Note Bob: text",
                note: "a note needs a position, 'left of', 'right of' or 'over'",
            },
            Mistake {
                wrong: "Note over Alice Bob: text",
                note: "two participants are separated by a comma",
            },
        ],
    },
    DocEntry {
        section: "sequence",
        topic: "blocks",
        description: "Blocks group messages: loop, alt/else, opt, par/and, critical/option and break. Every block closes with 'end'.",
        syntax: "loop Label ... end",
        examples: &[
            "loop Every minute\n    Alice->>Bob: Ping\nend",
            "alt Success\n    A->>B: Ok\nelse Failure\n    A->>B: Retry\nend",
            "par First\n    A->>B: One\nand Second\n    A->>C: Two\nend",
        ],
        mistakes: &[
            Mistake {
                wrong: "loop without end",
                note: "every block needs a closing 'end'",
            },
            Mistake {
                wrong: "else inside loop",
                note: "'else' belongs to 'alt', 'and' to 'par', 'option' to 'critical'",
            },
        ],
    },
    DocEntry {
        section: "sequence",
        topic: "structure",
        description: "A sequence diagram starts with the sequenceDiagram keyword; statements follow one per line. Comment lines start with %%.",
        syntax: "sequenceDiagram",
        examples: &[
            "sequenceDiagram\n    Alice->>Bob: Hello\n    Bob-->>Alice: Hi",
        ],
        mistakes: &[
            Mistake {
                wrong: "sequence diagram",
                note: "the root keyword is a single word, 'sequenceDiagram'",
            },
            Mistake {
                wrong: "Alice->>Bob: Hello (as the first line)",
                note: "the diagram type declaration comes first",
            },
        ],
    },
];

// =============================================================================
// LOOKUP
// =============================================================================

fn topics_for(category: ErrorCategory) -> &'static [&'static str] {
    match category {
        ErrorCategory::ArrowSyntax => &["messages"],
        ErrorCategory::MissingDeclaration => &["participants", "activations"],
        ErrorCategory::NoteSyntax => &["notes"],
        ErrorCategory::GenericSyntax => &["structure", "blocks"],
        // no focused topics, the caller gets everything
        ErrorCategory::Unknown => &[],
    }
}

/// Entries worth citing for an error category, in stable corpus order.
/// [`ErrorCategory::Unknown`] returns the whole corpus.
#[must_use]
pub fn lookup(category: ErrorCategory) -> Vec<&'static DocEntry> {
    let topics = topics_for(category);
    if topics.is_empty() {
        return CORPUS.iter().collect();
    }
    CORPUS
        .iter()
        .filter(|entry| topics.contains(&entry.topic))
        .collect()
}

/// Render the entries for a category as prompt-ready reference text.
///
/// Deterministic: same category, same text.
#[must_use]
pub fn build_context(category: ErrorCategory) -> String {
    let mut out = String::new();
    for entry in lookup(category) {
        let _ = writeln!(out, "[{}: {}]", entry.section, entry.topic);
        let _ = writeln!(out, "{}", entry.description);
        let _ = writeln!(out, "Syntax: {}", entry.syntax);
        if !entry.examples.is_empty() {
            let _ = writeln!(out, "Valid examples:");
            for example in entry.examples {
                for line in example.lines() {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }
        if !entry.mistakes.is_empty() {
            let _ = writeln!(out, "Common mistakes:");
            for mistake in entry.mistakes {
                let _ = writeln!(out, "  {} ({})", mistake.wrong, mistake.note);
            }
        }
        let _ = writeln!(out);
    }
    out.trim_end().to_string()
}

#[cfg(test)]
#[path = "docs_test.rs"]
mod tests;
