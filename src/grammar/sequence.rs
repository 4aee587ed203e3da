//! Bundled strict sequence-diagram grammar.
//!
//! DESIGN
//! ======
//! Statement-per-line checks over the raw source, keeping original line
//! numbers so failures can cite them. Unlike a forgiving renderer parser,
//! unrecognized statements are errors here: the healing loop needs the
//! engine to object to broken lines, not skip them. Only the first error
//! is reported, because repair happens one error per iteration.
//!
//! Error text follows the `Parse error on line N[, column M]: detail`
//! convention that the validator knows how to strip.

use super::arrows::{self, ArrowVerdict};
use super::{EngineError, GrammarEngine};
use crate::source::DiagramType;

/// Strict parser for `sequenceDiagram` sources.
///
/// Other recognized diagram families validate the root keyword only and
/// accept the body as-is. Callers that need full multi-family grammar
/// checks plug in their own [`GrammarEngine`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceGrammar;

#[async_trait::async_trait]
impl GrammarEngine for SequenceGrammar {
    async fn parse(&self, code: &str) -> Result<(), EngineError> {
        parse_source(code)
    }
}

// =============================================================================
// SOURCE-LEVEL CHECKS
// =============================================================================

fn parse_source(code: &str) -> Result<(), EngineError> {
    let lines: Vec<(usize, &str)> = code
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with("%%"))
        .collect();

    let Some(&(header_line, header)) = lines.first() else {
        return Err(fail(1, None, "empty diagram source".to_string()));
    };

    match DiagramType::from_root_keyword(header) {
        Some(DiagramType::Sequence) => parse_sequence_body(&lines[1..]),
        Some(_) => Ok(()),
        None => Err(fail(
            header_line,
            None,
            format!(
                "expecting a diagram type declaration such as 'sequenceDiagram', got '{}'",
                snippet(header)
            ),
        )),
    }
}

// =============================================================================
// SEQUENCE BODY
// =============================================================================

struct OpenBlock {
    keyword: &'static str,
    line: usize,
    /// Section separator this block accepts: `else`, `and` or `option`.
    section: Option<&'static str>,
}

fn parse_sequence_body(lines: &[(usize, &str)]) -> Result<(), EngineError> {
    let mut participants: Vec<String> = Vec::new();
    let mut active: Vec<String> = Vec::new();
    let mut blocks: Vec<OpenBlock> = Vec::new();

    for &(line_no, line) in lines {
        // repeated header, harmless
        if line.eq_ignore_ascii_case("sequenceDiagram") {
            continue;
        }

        if let Some(rest) =
            strip_keyword(line, "participant").or_else(|| strip_keyword(line, "actor"))
        {
            declare_participant(rest, line_no, &mut participants)?;
            continue;
        }

        if let Some(rest) = strip_keyword(line, "activate") {
            let id = require_name(rest, line_no, "activate")?;
            if !is_declared(&participants, id) {
                return Err(fail(
                    line_no,
                    None,
                    format!("activate of undeclared participant '{id}'"),
                ));
            }
            active.push(id.to_string());
            continue;
        }

        if let Some(rest) = strip_keyword(line, "deactivate") {
            let id = require_name(rest, line_no, "deactivate")?;
            if !is_declared(&participants, id) {
                return Err(fail(
                    line_no,
                    None,
                    format!("deactivate of undeclared participant '{id}'"),
                ));
            }
            let Some(pos) = active.iter().rposition(|a| a == id) else {
                return Err(fail(
                    line_no,
                    None,
                    format!("deactivate of inactive participant '{id}'"),
                ));
            };
            active.remove(pos);
            continue;
        }

        if let Some(rest) = strip_keyword(line, "note") {
            check_note(rest, line_no, &mut participants)?;
            continue;
        }

        if let Some(keyword) = block_keyword(line) {
            blocks.push(OpenBlock {
                keyword,
                line: line_no,
                section: section_separator(keyword),
            });
            continue;
        }

        if let Some(sep) = section_keyword(line) {
            match blocks.last() {
                Some(open) if open.section == Some(sep) => {}
                Some(open) => {
                    return Err(fail(
                        line_no,
                        None,
                        format!("unexpected '{sep}' inside a '{}' block", open.keyword),
                    ));
                }
                None => {
                    return Err(fail(
                        line_no,
                        None,
                        format!("unexpected '{sep}' outside of a block"),
                    ));
                }
            }
            continue;
        }

        if line.eq_ignore_ascii_case("end") {
            if blocks.pop().is_none() {
                return Err(fail(
                    line_no,
                    None,
                    "unexpected 'end' with no open block".to_string(),
                ));
            }
            continue;
        }

        check_message(line, line_no, &mut participants)?;
    }

    if let Some(open) = blocks.last() {
        return Err(fail(
            open.line,
            None,
            format!("missing 'end' for '{}' block", open.keyword),
        ));
    }

    Ok(())
}

// =============================================================================
// STATEMENT CHECKS
// =============================================================================

fn declare_participant(
    rest: &str,
    line_no: usize,
    participants: &mut Vec<String>,
) -> Result<(), EngineError> {
    let (id, alias) = match rest.split_once(" as ") {
        Some((name, alias)) => (name.trim(), Some(alias.trim())),
        // a trailing bare 'as' is a started-but-empty alias
        None => match rest.strip_suffix(" as") {
            Some(name) => (name.trim(), Some("")),
            None => (rest.trim(), None),
        },
    };
    if id.is_empty() {
        return Err(fail(
            line_no,
            None,
            "participant declaration missing a name".to_string(),
        ));
    }
    if alias.is_some_and(str::is_empty) {
        return Err(fail(
            line_no,
            None,
            format!("participant '{id}' has an empty alias"),
        ));
    }
    ensure_declared(participants, id);
    Ok(())
}

/// Messages put arrows before the `:`; text after it is free-form.
fn check_message(
    line: &str,
    line_no: usize,
    participants: &mut Vec<String>,
) -> Result<(), EngineError> {
    let head = line.split_once(':').map_or(line, |(h, _)| h);
    let Some(scan) = arrows::find_arrow(head) else {
        return Err(fail(
            line_no,
            None,
            format!("syntax error, unrecognized statement '{}'", snippet(line)),
        ));
    };
    if scan.verdict != ArrowVerdict::Valid {
        return Err(fail(line_no, Some(scan.column), scan.reason()));
    }

    let from = line[..scan.start].trim();
    if from.is_empty() {
        return Err(fail(
            line_no,
            Some(scan.column),
            "message missing a sender participant".to_string(),
        ));
    }
    let after = &line[scan.end..];
    let Some((to, _text)) = after.split_once(':') else {
        return Err(fail(
            line_no,
            None,
            "message missing ':' before the message text".to_string(),
        ));
    };
    let to = to.trim();
    if to.is_empty() {
        return Err(fail(
            line_no,
            None,
            "message missing a recipient participant".to_string(),
        ));
    }

    ensure_declared(participants, from);
    ensure_declared(participants, to);
    Ok(())
}

fn check_note(
    rest: &str,
    line_no: usize,
    participants: &mut Vec<String>,
) -> Result<(), EngineError> {
    let lower = rest.to_ascii_lowercase();
    let (consumed, position) = if lower.starts_with("left of ") {
        ("left of ".len(), "left of")
    } else if lower.starts_with("right of ") {
        ("right of ".len(), "right of")
    } else if lower.starts_with("over ") {
        ("over ".len(), "over")
    } else {
        let word = rest
            .split_whitespace()
            .next()
            .unwrap_or("")
            .trim_end_matches(':');
        return Err(fail(
            line_no,
            None,
            format!("invalid note position '{word}', expecting 'left of', 'right of' or 'over'"),
        ));
    };

    let after = &rest[consumed..];
    let Some((targets, _text)) = after.split_once(':') else {
        return Err(fail(
            line_no,
            None,
            "note missing ':' before the note text".to_string(),
        ));
    };
    if position != "over" && targets.contains(',') {
        return Err(fail(
            line_no,
            None,
            format!("note '{position}' takes a single participant"),
        ));
    }
    for target in targets.split(',') {
        let id = target.trim();
        if id.is_empty() {
            return Err(fail(
                line_no,
                None,
                "note with an empty participant name".to_string(),
            ));
        }
        ensure_declared(participants, id);
    }
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn fail(line: usize, column: Option<usize>, detail: String) -> EngineError {
    match column {
        Some(col) => EngineError::new(format!("Parse error on line {line}, column {col}: {detail}")),
        None => EngineError::new(format!("Parse error on line {line}: {detail}")),
    }
}

/// Strip a leading keyword followed by whitespace, case-insensitive.
/// Returns the trimmed remainder, which may be empty.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    if line.len() < keyword.len() || !line.is_char_boundary(keyword.len()) {
        return None;
    }
    let (head, rest) = line.split_at(keyword.len());
    if head.eq_ignore_ascii_case(keyword) && (rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn require_name<'a>(rest: &'a str, line_no: usize, keyword: &str) -> Result<&'a str, EngineError> {
    let id = rest.trim();
    if id.is_empty() {
        return Err(fail(
            line_no,
            None,
            format!("{keyword} missing a participant name"),
        ));
    }
    Ok(id)
}

fn is_declared(participants: &[String], id: &str) -> bool {
    participants.iter().any(|p| p == id)
}

fn ensure_declared(participants: &mut Vec<String>, id: &str) {
    if !is_declared(participants, id) {
        participants.push(id.to_string());
    }
}

fn block_keyword(line: &str) -> Option<&'static str> {
    let word = line.split_whitespace().next()?;
    match word.to_ascii_lowercase().as_str() {
        "loop" => Some("loop"),
        "alt" => Some("alt"),
        "opt" => Some("opt"),
        "par" => Some("par"),
        "critical" => Some("critical"),
        "break" => Some("break"),
        _ => None,
    }
}

fn section_keyword(line: &str) -> Option<&'static str> {
    let word = line.split_whitespace().next()?;
    match word.to_ascii_lowercase().as_str() {
        "else" => Some("else"),
        "and" => Some("and"),
        "option" => Some("option"),
        _ => None,
    }
}

fn section_separator(keyword: &str) -> Option<&'static str> {
    match keyword {
        "alt" => Some("else"),
        "par" => Some("and"),
        "critical" => Some("option"),
        _ => None,
    }
}

fn snippet(line: &str) -> String {
    const MAX: usize = 24;
    if line.chars().count() <= MAX {
        line.to_string()
    } else {
        let head: String = line.chars().take(MAX).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
#[path = "sequence_test.rs"]
mod tests;
