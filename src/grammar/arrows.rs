//! Arrow token scanning shared by the strict parser and the quick check.
//!
//! Both layers must agree on which arrows are valid. A quick check stricter
//! than the engine would flag candidates the engine then accepts, and the
//! repair loop would wedge between the two verdicts.

/// Characters that can terminate an arrow shaft. The valid arrows are
/// `->>` and `-->>` (solid and dotted), `-x` and `--x` (cross), `-)` and
/// `--)` (async).
const HEAD_CHARS: [char; 3] = ['>', 'x', ')'];

/// Verdict for one scanned arrow-like token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArrowVerdict {
    Valid,
    /// A single `>` head, the classic `->` / `-->` mistake.
    SingleAngle,
    /// Three or more `>` heads.
    TooManyHeads,
    /// Three or more dashes in the shaft.
    TooManyDashes,
    /// Head characters that do not form any known arrow.
    GarbledHeads,
}

/// An arrow-like token found in a line segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArrowScan {
    /// 1-based character column of the token start.
    pub column: usize,
    /// Byte offset of the token start within the scanned segment.
    pub start: usize,
    /// Byte offset just past the token end.
    pub end: usize,
    pub token: String,
    pub verdict: ArrowVerdict,
}

impl ArrowScan {
    /// Human-readable reason naming the valid forms, used verbatim in
    /// engine errors and quick-check findings.
    pub fn reason(&self) -> String {
        match self.verdict {
            ArrowVerdict::Valid => format!("arrow '{}' is valid", self.token),
            ArrowVerdict::SingleAngle => format!(
                "invalid arrow '{}': single '>' arrowhead, use '->>' (or '-->>' for a dotted line)",
                self.token
            ),
            ArrowVerdict::TooManyHeads => format!(
                "invalid arrow '{}': too many arrowheads, use '->>' or '-->>'",
                self.token
            ),
            ArrowVerdict::TooManyDashes => format!(
                "invalid arrow '{}': too many dashes, use '->>' or '-->>'",
                self.token
            ),
            ArrowVerdict::GarbledHeads => format!(
                "invalid arrow '{}': expecting '->>', '-->>', '-x', '--x', '-)' or '--)'",
                self.token
            ),
        }
    }
}

/// Find the first arrow-like token in `segment`: a run of dashes followed
/// immediately by at least one head character. Dashes inside identifiers
/// (`my-service`) are skipped because no head follows them. A receiver
/// whose name starts with a head letter (`Alice->>xavier`) is not part of
/// the arrow: the token stops at the longest valid arrow when the leftover
/// can begin a name.
pub(crate) fn find_arrow(segment: &str) -> Option<ArrowScan> {
    let chars: Vec<(usize, char)> = segment.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].1 != '-' {
            i += 1;
            continue;
        }
        let token_start = i;
        let mut j = i;
        while j < chars.len() && chars[j].1 == '-' {
            j += 1;
        }
        let dash_count = j - token_start;
        let head_start = j;
        while j < chars.len() && HEAD_CHARS.contains(&chars[j].1) {
            j += 1;
        }
        let head_count = j - head_start;
        if head_count == 0 {
            i = j;
            continue;
        }

        let heads: Vec<char> = chars[head_start..j].iter().map(|&(_, c)| c).collect();
        let mut verdict = classify(dash_count, &heads);
        let mut token_end = j;

        // The head run swallows a receiver name that starts with 'x'
        // (`Alice->>xavier` scans as `->>x`). Trim to the longest valid
        // arrow whose leftover can begin a name; a leftover head character
        // keeps the full run invalid, so `->>>` and `-x)` stay flagged.
        if verdict != ArrowVerdict::Valid && dash_count <= 2 {
            for take in [2usize, 1] {
                if take >= head_count {
                    continue;
                }
                let next = chars[head_start + take].1;
                if classify(dash_count, &heads[..take]) == ArrowVerdict::Valid
                    && (next.is_alphanumeric() || next == '_')
                {
                    verdict = ArrowVerdict::Valid;
                    token_end = head_start + take;
                    break;
                }
            }
        }

        let start = chars[token_start].0;
        let end = chars.get(token_end).map_or(segment.len(), |&(b, _)| b);
        return Some(ArrowScan {
            column: token_start + 1,
            start,
            end,
            token: segment[start..end].to_string(),
            verdict,
        });
    }
    None
}

fn classify(dashes: usize, heads: &[char]) -> ArrowVerdict {
    if dashes > 2 {
        return ArrowVerdict::TooManyDashes;
    }
    match heads {
        ['>', '>'] | ['x'] | [')'] => ArrowVerdict::Valid,
        ['>'] => ArrowVerdict::SingleAngle,
        h if h.iter().all(|&c| c == '>') => ArrowVerdict::TooManyHeads,
        _ => ArrowVerdict::GarbledHeads,
    }
}

#[cfg(test)]
#[path = "arrows_test.rs"]
mod tests;
