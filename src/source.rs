//! Diagram source classification.
//!
//! The diagram family is inferred from the leading keyword of the first
//! content line, the same way the grammar headers declare it. Detection is
//! a tag, not a validation: a source tagged [`DiagramType::Sequence`] can
//! still fail to parse.

use serde::{Deserialize, Serialize};

/// Diagram family, detected from the first non-blank, non-comment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramType {
    Sequence,
    Flow,
    State,
    Class,
    EntityRelation,
    Schedule,
    Unknown,
}

impl DiagramType {
    /// Map a diagram-root keyword (the first word of a header line) to its
    /// family. Returns `None` for anything that is not a recognized root.
    #[must_use]
    pub fn from_root_keyword(line: &str) -> Option<Self> {
        let word = line.trim().split_whitespace().next()?;
        match word {
            "sequenceDiagram" => Some(Self::Sequence),
            "flowchart" | "graph" => Some(Self::Flow),
            "stateDiagram" | "stateDiagram-v2" => Some(Self::State),
            "classDiagram" => Some(Self::Class),
            "erDiagram" => Some(Self::EntityRelation),
            "gantt" => Some(Self::Schedule),
            _ => None,
        }
    }

    /// Detect the diagram family of a full source text.
    ///
    /// Scans past blank and `%%` comment lines; the first content line
    /// decides. Unrecognized headers and empty sources are
    /// [`DiagramType::Unknown`].
    #[must_use]
    pub fn detect(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with("%%"))
            .and_then(Self::from_root_keyword)
            .unwrap_or(Self::Unknown)
    }
}

/// Raw diagram text together with its inferred family tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramSource {
    pub text: String,
    pub diagram_type: DiagramType,
}

impl DiagramSource {
    /// Wrap raw text, detecting the family tag from its first content line.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let diagram_type = DiagramType::detect(&text);
        Self { text, diagram_type }
    }
}

/// Count the lines of a source, ignoring blank lines at either end.
///
/// Trims the same way extracted repair candidates are trimmed, so newline
/// padding on either side of the original or the candidate never shows up
/// in the line-count comparison. Interior blank lines count; a candidate
/// that splits one statement onto a new line is still caught even when it
/// also drops a trailing newline.
#[must_use]
pub fn line_count(text: &str) -> usize {
    text.trim_start_matches(['\r', '\n']).trim_end().lines().count()
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
