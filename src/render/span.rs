//! Styled spans and their composition.
//!
//! Tokenizers and the search highlighter append [`StyledSpan`]s to a
//! [`StyledText`]. Spans may overlap; composition is per attribute, so a later
//! span that only sets a background keeps the foreground chosen by an earlier
//! span for the same bytes.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Which pass produced a span.
///
/// The search highlighter only ever clears spans carrying its own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanOwner {
    /// Diff line colouring.
    Diff,
    /// Lexical colouring in plain mode.
    Syntax,
    /// Live search highlight.
    Search,
}

/// A coloured byte range of the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyledSpan {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Foreground override.
    pub fg: Option<Rgb>,
    /// Background override.
    pub bg: Option<Rgb>,
    /// Pass that produced the span.
    pub owner: SpanOwner,
}

impl StyledSpan {
    /// Create a foreground-only span.
    #[must_use]
    pub fn fg(range: Range<usize>, color: Rgb, owner: SpanOwner) -> Self {
        Self {
            start: range.start,
            end: range.end,
            fg: Some(color),
            bg: None,
            owner,
        }
    }

    /// Create a background-only span.
    #[must_use]
    pub fn bg(range: Range<usize>, color: Rgb, owner: SpanOwner) -> Self {
        Self {
            start: range.start,
            end: range.end,
            fg: None,
            bg: Some(color),
            owner,
        }
    }

    /// Byte range covered by this span.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A maximal run of bytes sharing one resolved style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Byte range of the run.
    pub range: Range<usize>,
    /// Resolved foreground, if any span set one.
    pub fg: Option<Rgb>,
    /// Resolved background, if any span set one.
    pub bg: Option<Rgb>,
}

/// Ordered span list over a document of known length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    len: usize,
    spans: Vec<StyledSpan>,
}

impl StyledText {
    /// Create an empty span list for a document of `len` bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            spans: Vec::new(),
        }
    }

    /// Rebuild from an existing span list, clamping every span to `len`.
    #[must_use]
    pub fn from_spans(len: usize, spans: impl IntoIterator<Item = StyledSpan>) -> Self {
        let mut text = Self::new(len);
        for span in spans {
            text.push(span);
        }
        text
    }

    /// Document length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no spans are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Append a span. Out-of-range offsets are clamped; empty spans are dropped.
    pub fn push(&mut self, mut span: StyledSpan) {
        span.end = span.end.min(self.len);
        span.start = span.start.min(span.end);
        if !span.is_empty() {
            self.spans.push(span);
        }
    }

    /// Append many spans.
    pub fn extend(&mut self, spans: impl IntoIterator<Item = StyledSpan>) {
        for span in spans {
            self.push(span);
        }
    }

    /// Remove every span produced by `owner`, leaving the rest in order.
    pub fn clear_owner(&mut self, owner: SpanOwner) {
        self.spans.retain(|span| span.owner != owner);
    }

    /// All spans in application order.
    #[must_use]
    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// Spans produced by `owner`.
    pub fn spans_of(&self, owner: SpanOwner) -> impl Iterator<Item = &StyledSpan> {
        self.spans.iter().filter(move |span| span.owner == owner)
    }

    /// Consume into the raw span list.
    #[must_use]
    pub fn into_spans(self) -> Vec<StyledSpan> {
        self.spans
    }

    /// Flatten overlapping spans into non-overlapping styled runs.
    ///
    /// Unstyled gaps are omitted; callers paint them with the default style.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        if self.spans.is_empty() {
            return Vec::new();
        }

        let mut bounds: Vec<usize> = self
            .spans
            .iter()
            .flat_map(|span| [span.start, span.end])
            .collect();
        bounds.sort_unstable();
        bounds.dedup();

        let cells = bounds.len().saturating_sub(1);
        let mut fg: Vec<Option<Rgb>> = vec![None; cells];
        let mut bg: Vec<Option<Rgb>> = vec![None; cells];
        let mut touched = vec![false; cells];

        for span in &self.spans {
            let first = bounds.partition_point(|&b| b < span.start);
            let last = bounds.partition_point(|&b| b < span.end);
            for cell in first..last {
                touched[cell] = true;
                if span.fg.is_some() {
                    fg[cell] = span.fg;
                }
                if span.bg.is_some() {
                    bg[cell] = span.bg;
                }
            }
        }

        let mut segments: Vec<Segment> = Vec::new();
        for cell in 0..cells {
            if !touched[cell] {
                continue;
            }
            let range = bounds[cell]..bounds[cell + 1];
            match segments.last_mut() {
                Some(prev) if prev.range.end == range.start && prev.fg == fg[cell] && prev.bg == bg[cell] => {
                    prev.range.end = range.end;
                }
                _ => segments.push(Segment {
                    range,
                    fg: fg[cell],
                    bg: bg[cell],
                }),
            }
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);
    const YELLOW: Rgb = Rgb::new(255, 255, 0);

    #[test]
    fn test_push_clamps_out_of_range() {
        let mut text = StyledText::new(5);
        text.push(StyledSpan::fg(3..40, RED, SpanOwner::Syntax));
        text.push(StyledSpan::fg(9..12, RED, SpanOwner::Syntax));
        assert_eq!(text.spans().len(), 1);
        assert_eq!(text.spans()[0].range(), 3..5);
    }

    #[test]
    fn test_clear_owner_keeps_other_spans() {
        let mut text = StyledText::new(10);
        text.push(StyledSpan::bg(0..10, BLUE, SpanOwner::Diff));
        text.push(StyledSpan::bg(2..4, YELLOW, SpanOwner::Search));
        text.clear_owner(SpanOwner::Search);
        assert_eq!(text.spans().len(), 1);
        assert_eq!(text.spans()[0].owner, SpanOwner::Diff);
    }

    #[test]
    fn test_segments_layer_per_attribute() {
        let mut text = StyledText::new(10);
        text.push(StyledSpan::fg(0..6, RED, SpanOwner::Syntax));
        text.push(StyledSpan::bg(4..8, YELLOW, SpanOwner::Search));

        let segments = text.segments();
        assert_eq!(
            segments,
            vec![
                Segment { range: 0..4, fg: Some(RED), bg: None },
                Segment { range: 4..6, fg: Some(RED), bg: Some(YELLOW) },
                Segment { range: 6..8, fg: None, bg: Some(YELLOW) },
            ]
        );
    }

    #[test]
    fn test_later_span_wins() {
        let mut text = StyledText::new(4);
        text.push(StyledSpan::fg(0..4, RED, SpanOwner::Syntax));
        text.push(StyledSpan::fg(1..3, BLUE, SpanOwner::Syntax));
        let segments = text.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].fg, Some(BLUE));
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb::new(255, 16, 0).to_hex(), "#ff1000");
    }
}
