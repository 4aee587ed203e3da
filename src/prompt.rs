//! Repair prompt construction.
//!
//! Prompts are deterministic: same source, same error, same docs context,
//! same prompt. The rules section carries the line-count contract that the
//! healer later enforces mechanically.

use std::fmt::Write as _;

use crate::source::line_count;
use crate::validator::SyntaxError;

/// System prompt for the repair role.
#[must_use]
pub fn system_prompt() -> &'static str {
    "You repair diagram markup. Make the smallest possible edit: change only \
     the broken syntax on the indicated line and keep every other character \
     identical. Never reorder, add, or remove lines. Return the full corrected \
     diagram in a ```mermaid fenced code block, then at most one short \
     sentence naming what you changed."
}

/// Build the user prompt for one repair iteration.
#[must_use]
pub fn build_repair_prompt(source: &str, error: &SyntaxError, docs_context: &str) -> String {
    let total = line_count(source);
    let mut prompt = String::new();

    let _ = writeln!(prompt, "This diagram fails to parse.");
    let _ = writeln!(prompt);
    if error.line > 0 {
        let _ = writeln!(prompt, "Error at line {}: {}", error.line, error.message);
        if !error.context_line.is_empty() {
            let _ = writeln!(prompt, "Failing line {}:", error.line);
            let _ = writeln!(prompt, "    {}", error.context_line);
        }
    } else {
        let _ = writeln!(prompt, "Error: {}", error.message);
    }
    let _ = writeln!(prompt);

    let _ = writeln!(prompt, "Full diagram source ({total} lines):");
    let _ = writeln!(prompt, "```mermaid");
    let _ = writeln!(prompt, "{}", source.trim_end());
    let _ = writeln!(prompt, "```");
    let _ = writeln!(prompt);

    if !docs_context.is_empty() {
        let _ = writeln!(prompt, "Relevant syntax reference:");
        let _ = writeln!(prompt, "{docs_context}");
        let _ = writeln!(prompt);
    }

    let _ = writeln!(prompt, "Rules:");
    if error.line > 0 {
        let _ = writeln!(prompt, "1. Fix only line {}.", error.line);
    } else {
        let _ = writeln!(prompt, "1. Fix only the broken statement.");
    }
    let _ = writeln!(prompt, "2. Do not reorder, delete, or insert lines.");
    let _ = writeln!(
        prompt,
        "3. Preserve all message and label text; change only the broken syntax."
    );
    let _ = writeln!(
        prompt,
        "4. Return exactly {total} lines, the same count as the input."
    );
    let _ = writeln!(prompt);
    let _ = write!(
        prompt,
        "Respond with the corrected diagram in a ```mermaid fenced code block."
    );

    prompt
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
