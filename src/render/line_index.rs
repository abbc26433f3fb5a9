//! Line-break index over a document.
//!
//! Built in one linear scan; answers "which logical line holds byte X" by
//! binary search. Offsets are UTF-8 byte offsets, the same unit used by
//! [`StyledSpan`](super::StyledSpan) ranges.

use std::ops::Range;

/// Byte offsets of every `\n` in a document.
///
/// Offsets are strictly increasing and `breaks().len() + 1` is the number of
/// logical lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    breaks: Vec<usize>,
}

impl LineIndex {
    /// Scan `text` once and record each line break.
    #[must_use]
    pub fn build(text: &str) -> Self {
        let breaks = text
            .bytes()
            .enumerate()
            .filter_map(|(offset, byte)| (byte == b'\n').then_some(offset))
            .collect();
        Self { breaks }
    }

    /// Rebuild from offsets previously produced by [`LineIndex::build`].
    ///
    /// Unsorted or duplicate offsets are normalized.
    #[must_use]
    pub fn from_breaks(mut breaks: Vec<usize>) -> Self {
        if !breaks.windows(2).all(|w| w[0] < w[1]) {
            breaks.sort_unstable();
            breaks.dedup();
        }
        Self { breaks }
    }

    /// Recorded line-break offsets.
    #[must_use]
    pub fn breaks(&self) -> &[usize] {
        &self.breaks
    }

    /// Number of logical lines (always at least one).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.breaks.len() + 1
    }

    /// 1-based logical line containing `offset`.
    ///
    /// A break character belongs to the line it terminates. Offsets past the
    /// end of the text report the last line.
    #[must_use]
    pub fn line_number_for(&self, offset: usize) -> usize {
        self.breaks.partition_point(|&b| b < offset) + 1
    }

    /// Byte offset where 1-based `line` starts, if it exists.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        match line {
            0 => None,
            1 => Some(0),
            n => self.breaks.get(n - 2).map(|b| b + 1),
        }
    }

    /// Byte range of 1-based `line`, excluding its terminating break.
    #[must_use]
    pub fn line_range(&self, line: usize, text_len: usize) -> Option<Range<usize>> {
        let start = self.line_start(line)?;
        let end = self.breaks.get(line - 1).copied().unwrap_or(text_len);
        Some(start.min(text_len)..end.min(text_len))
    }

    /// Iterate over the byte ranges of every logical line.
    pub fn line_ranges(&self, text_len: usize) -> impl Iterator<Item = Range<usize>> + '_ {
        (1..=self.line_count()).filter_map(move |line| self.line_range(line, text_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_one_line() {
        let index = LineIndex::build("");
        assert!(index.breaks().is_empty());
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_number_for(0), 1);
    }

    #[test]
    fn test_line_number_for() {
        let index = LineIndex::build("ab\ncd\n\nef");
        assert_eq!(index.breaks(), &[2, 5, 6]);
        assert_eq!(index.line_number_for(0), 1);
        assert_eq!(index.line_number_for(2), 1);
        assert_eq!(index.line_number_for(3), 2);
        assert_eq!(index.line_number_for(6), 3);
        assert_eq!(index.line_number_for(7), 4);
        assert_eq!(index.line_number_for(100), 4);
    }

    #[test]
    fn test_line_ranges() {
        let text = "ab\ncd\n\nef";
        let index = LineIndex::build(text);
        let ranges: Vec<_> = index.line_ranges(text.len()).collect();
        assert_eq!(ranges, vec![0..2, 3..5, 6..6, 7..9]);
        assert_eq!(index.line_start(0), None);
        assert_eq!(index.line_range(5, text.len()), None);
    }

    #[test]
    fn test_trailing_newline_adds_empty_line() {
        let text = "one\n";
        let index = LineIndex::build(text);
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_range(2, text.len()), Some(4..4));
    }

    #[test]
    fn test_multibyte_offsets_are_bytes() {
        let text = "é\nü";
        let index = LineIndex::build(text);
        assert_eq!(index.breaks(), &[2]);
        assert_eq!(index.line_number_for(3), 2);
    }
}
