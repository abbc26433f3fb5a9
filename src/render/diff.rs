//! Unified-diff line classification and numbering.
//!
//! Every logical line is classified once, in priority order (hunk header,
//! file metadata, added, removed, context, anything else). Hunk headers
//! reseed the left/right counters; added, removed and context lines consume
//! them.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::line_index::LineIndex;
use super::span::{SpanOwner, StyledSpan};
use crate::theme::Theme;

/// Classification of one logical diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLineKind {
    /// `@@ -l,c +r,c @@`
    Header,
    /// `diff --git`, `index `, `+++`, `---`
    FileMeta,
    /// Line present only on the right side.
    Added,
    /// Line present only on the left side.
    Removed,
    /// Line present on both sides.
    Context,
    /// Anything else.
    Unclassified,
}

/// Left-file and right-file numbers for one logical line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineNumbers {
    /// Number in the old file.
    pub left: Option<usize>,
    /// Number in the new file.
    pub right: Option<usize>,
}

impl LineNumbers {
    /// A line that exists only on the left side.
    #[must_use]
    pub fn is_pure_removal(&self) -> bool {
        self.left.is_some() && self.right.is_none()
    }

    /// Larger of the two numbers, if any.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        self.left.max(self.right)
    }
}

/// A classified diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Line classification.
    pub kind: DiffLineKind,
    /// Numbers to print in the gutter.
    pub numbers: LineNumbers,
}

/// Output of a diff tokenizer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffLayout {
    /// One entry per logical line.
    pub lines: Vec<DiffLine>,
    /// Line colouring.
    pub spans: Vec<StyledSpan>,
    /// Largest left or right number handed out.
    pub max_number: Option<usize>,
}

/// Stateful hunk counters.
#[derive(Debug, Clone, Copy, Default)]
struct HunkCounters {
    left: Option<usize>,
    right: Option<usize>,
}

impl HunkCounters {
    // A side that would overflow goes back to unset.
    fn take_left(&mut self) -> Option<usize> {
        let current = self.left;
        self.left = current.and_then(|n| n.checked_add(1));
        current
    }

    fn take_right(&mut self) -> Option<usize> {
        let current = self.right;
        self.right = current.and_then(|n| n.checked_add(1));
        current
    }
}

/// Classify a single line without touching any counters.
#[must_use]
pub fn classify(line: &str) -> DiffLineKind {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.starts_with("@@") {
        DiffLineKind::Header
    } else if line.starts_with("diff --git")
        || line.starts_with("index ")
        || line.starts_with("+++")
        || line.starts_with("---")
    {
        DiffLineKind::FileMeta
    } else if line.starts_with('+') {
        DiffLineKind::Added
    } else if line.starts_with('-') {
        DiffLineKind::Removed
    } else if line.starts_with(' ') {
        DiffLineKind::Context
    } else {
        DiffLineKind::Unclassified
    }
}

/// Parse the run-start values of a hunk header.
///
/// Returns `(left, right)`: the digits right after the first `-` and the first
/// `+`. A side without digits is `None`.
#[must_use]
pub fn parse_hunk_header(line: &str) -> (Option<usize>, Option<usize>) {
    (number_after(line, '-'), number_after(line, '+'))
}

fn number_after(line: &str, marker: char) -> Option<usize> {
    let rest = &line[line.find(marker)? + marker.len_utf8()..];
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits_end].parse().ok()
}

/// Heuristic check for unified-diff input.
///
/// Looks at the first non-empty line only.
#[must_use]
pub fn looks_like_diff(text: &str) -> bool {
    text.lines()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| {
            line.starts_with("diff --git") || line.starts_with("--- ") || line.starts_with("@@")
        })
}

/// Diff-mode tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffTokenizer;

impl DiffTokenizer {
    /// Create a tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify and colour every logical line of `text`.
    #[must_use]
    pub fn tokenize(&self, text: &str, index: &LineIndex, theme: &Theme) -> DiffLayout {
        let mut counters = HunkCounters::default();
        let mut layout = DiffLayout {
            lines: Vec::with_capacity(index.line_count()),
            ..DiffLayout::default()
        };

        for range in index.line_ranges(text.len()) {
            let line = &text[range.clone()];
            let kind = classify(line);
            let numbers = match kind {
                DiffLineKind::Header => {
                    let (left, right) = parse_hunk_header(line);
                    if left.is_none() || right.is_none() {
                        trace!(line, "hunk header with unparseable side");
                    }
                    counters = HunkCounters { left, right };
                    LineNumbers::default()
                }
                DiffLineKind::Added => LineNumbers {
                    left: None,
                    right: counters.take_right(),
                },
                DiffLineKind::Removed => LineNumbers {
                    left: counters.take_left(),
                    right: None,
                },
                DiffLineKind::Context => LineNumbers {
                    left: counters.take_left(),
                    right: counters.take_right(),
                },
                DiffLineKind::FileMeta | DiffLineKind::Unclassified => LineNumbers::default(),
            };

            layout.max_number = layout.max_number.max(numbers.max());

            // Include the terminating break so backgrounds span the full row.
            let painted = range.start..(range.end + 1).min(text.len());
            match kind {
                DiffLineKind::Added => layout.spans.push(StyledSpan::bg(
                    painted,
                    theme.diff_added_bg,
                    SpanOwner::Diff,
                )),
                DiffLineKind::Removed => layout.spans.push(StyledSpan::bg(
                    painted,
                    theme.diff_removed_bg,
                    SpanOwner::Diff,
                )),
                DiffLineKind::Header => layout.spans.push(StyledSpan {
                    start: painted.start,
                    end: painted.end,
                    fg: Some(theme.diff_header_fg),
                    bg: Some(theme.diff_header_bg),
                    owner: SpanOwner::Diff,
                }),
                DiffLineKind::FileMeta => layout.spans.push(StyledSpan {
                    start: painted.start,
                    end: painted.end,
                    fg: Some(theme.diff_meta_fg),
                    bg: Some(theme.diff_meta_bg),
                    owner: SpanOwner::Diff,
                }),
                DiffLineKind::Context | DiffLineKind::Unclassified => {}
            }

            layout.lines.push(DiffLine { kind, numbers });
        }

        layout
    }
}
