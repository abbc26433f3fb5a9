//! Visual-line layout and per-fragment gutter labels.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::diff::LineNumbers;
use super::line_index::LineIndex;

/// How a gutter number should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// Regular line number.
    Normal,
    /// Left-side number of a removed diff line.
    Deletion,
}

/// A number to draw beside one visual line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GutterLabel {
    /// The number to print.
    pub number: usize,
    /// Colouring hint.
    pub kind: LabelKind,
}

impl GutterLabel {
    fn normal(number: usize) -> Self {
        Self {
            number,
            kind: LabelKind::Normal,
        }
    }
}

/// Split every logical line into visual fragments of at most `columns` chars.
///
/// With `wrap` off (or `columns == 0`) each logical line is one fragment.
/// Empty lines still produce one empty fragment. Break characters are never
/// part of a fragment.
#[must_use]
pub fn visual_fragments(
    text: &str,
    index: &LineIndex,
    wrap: bool,
    columns: usize,
) -> Vec<Range<usize>> {
    let mut fragments = Vec::with_capacity(index.line_count());
    for line in index.line_ranges(text.len()) {
        if !wrap || columns == 0 {
            fragments.push(line);
            continue;
        }

        let mut start = line.start;
        let mut chars = 0;
        for (offset, _) in text[line.clone()].char_indices() {
            if chars == columns {
                fragments.push(start..line.start + offset);
                start = line.start + offset;
                chars = 0;
            }
            chars += 1;
        }
        fragments.push(start..line.end);
    }
    fragments
}

/// Decides which number, if any, to draw beside each visual fragment.
///
/// Fragments must be visited in document order. The only state is the last
/// logical line that received a number, used to suppress repeats when wrap is
/// off.
#[derive(Debug, Clone)]
pub struct GutterPainter<'a> {
    index: &'a LineIndex,
    diff_numbers: Option<&'a [LineNumbers]>,
    wrap: bool,
    last_drawn: Option<usize>,
}

impl<'a> GutterPainter<'a> {
    /// Painter for plain text.
    #[must_use]
    pub fn plain(index: &'a LineIndex, wrap: bool) -> Self {
        Self {
            index,
            diff_numbers: None,
            wrap,
            last_drawn: None,
        }
    }

    /// Painter for diff text, using per-logical-line numbers.
    #[must_use]
    pub fn diff(index: &'a LineIndex, numbers: &'a [LineNumbers], wrap: bool) -> Self {
        Self {
            index,
            diff_numbers: Some(numbers),
            wrap,
            last_drawn: None,
        }
    }

    /// Label for the fragment whose first byte is at `fragment_start`.
    pub fn label_for_fragment(&mut self, fragment_start: usize) -> Option<GutterLabel> {
        let line = self.index.line_number_for(fragment_start);
        if !self.wrap && self.last_drawn == Some(line) {
            return None;
        }
        self.last_drawn = Some(line);

        match self.diff_numbers {
            None => Some(GutterLabel::normal(line)),
            Some(numbers) => {
                let numbers = numbers.get(line - 1)?;
                if numbers.is_pure_removal() {
                    numbers.left.map(|number| GutterLabel {
                        number,
                        kind: LabelKind::Deletion,
                    })
                } else {
                    numbers.right.map(GutterLabel::normal)
                }
            }
        }
    }
}
