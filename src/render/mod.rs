//! The rendering pipeline.
//!
//! A render pass is a pure function of a [`Document`]:
//!
//! 1. build the [`LineIndex`]
//! 2. tokenize: [`DiffTokenizer`] in diff mode, [`SyntaxTokenizer`] otherwise
//! 3. overlay search highlights with [`SearchHighlighter`]
//! 4. size the gutter with [`GutterMetrics`]
//!
//! The result is a [`RenderResult`] that toolkit adapters paint. Nothing here
//! touches a window system, so every stage is unit-testable on its own.

mod diff;
mod gutter;
mod layout;
mod line_index;
mod search;
mod span;
mod syntax;

pub use diff::{
    classify, looks_like_diff, parse_hunk_header, DiffLayout, DiffLine, DiffLineKind,
    DiffTokenizer, LineNumbers,
};
pub use gutter::{
    digit_count, sanitize_font_size, CellMetrics, FontMetrics, GutterMetrics, GutterPadding,
    MonospaceMetrics, DEFAULT_FONT_SIZE,
};
pub use layout::{visual_fragments, GutterLabel, GutterPainter, LabelKind};
pub use line_index::LineIndex;
pub use search::SearchHighlighter;
pub use span::{Rgb, Segment, SpanOwner, StyledSpan, StyledText};
pub use syntax::{KeywordTable, SyntaxTokenizer, COMMENT_MARKERS, STRING_QUOTES};

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::theme::Theme;

/// Immutable input to one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The text to render.
    pub text: Arc<str>,
    /// Treat the text as a unified diff.
    pub diff_mode: bool,
    /// Wrap long lines.
    pub wrap: bool,
    /// Font size used to size the gutter.
    pub font_size: f32,
    /// Live search query (may be blank).
    pub search_query: String,
}

impl Document {
    /// Plain, unwrapped document at the default font size.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            diff_mode: false,
            wrap: false,
            font_size: DEFAULT_FONT_SIZE,
            search_query: String::new(),
        }
    }

    /// Set diff mode.
    pub fn with_diff_mode(mut self, diff_mode: bool) -> Self {
        self.diff_mode = diff_mode;
        self
    }

    /// Set word wrap.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the search query.
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Length of the rendered text in bytes.
    pub text_len: usize,
    /// Spans in application order; later spans win per attribute.
    pub styled_spans: Vec<StyledSpan>,
    /// Byte offsets of each line break.
    pub line_break_offsets: Vec<usize>,
    /// Number of logical lines.
    pub logical_line_count: usize,
    /// Gutter width in layout units.
    pub gutter_width: f32,
    /// Full gutter measurements.
    pub gutter: GutterMetrics,
    /// Left/right numbers per logical line (diff mode only).
    pub per_line_numbers: Vec<LineNumbers>,
    /// Classification per logical line (diff mode only).
    pub line_kinds: Vec<DiffLineKind>,
    /// Number of search matches.
    pub search_matches: usize,
}

impl RenderResult {
    /// Reconstruct the line index.
    #[must_use]
    pub fn line_index(&self) -> LineIndex {
        LineIndex::from_breaks(self.line_break_offsets.clone())
    }

    /// Spans as a composable [`StyledText`].
    #[must_use]
    pub fn styled_text(&self) -> StyledText {
        StyledText::from_spans(self.text_len, self.styled_spans.iter().cloned())
    }

    /// Whether this pass ran in diff mode.
    #[must_use]
    pub fn is_diff(&self) -> bool {
        !self.line_kinds.is_empty()
    }

    /// Gutter painter matching this result.
    #[must_use]
    pub fn gutter_painter<'a>(&'a self, index: &'a LineIndex, wrap: bool) -> GutterPainter<'a> {
        if self.is_diff() {
            GutterPainter::diff(index, &self.per_line_numbers, wrap)
        } else {
            GutterPainter::plain(index, wrap)
        }
    }
}

/// Configured render pipeline.
///
/// Cheap to clone and safe to share across worker threads.
#[derive(Clone)]
pub struct Renderer {
    theme: Theme,
    syntax: SyntaxTokenizer,
    diff: DiffTokenizer,
    search: SearchHighlighter,
    padding: GutterPadding,
    metrics: Arc<dyn FontMetrics>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("theme", &self.theme.name)
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Renderer with the default keyword table and monospace metrics.
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            syntax: SyntaxTokenizer::new(),
            diff: DiffTokenizer::new(),
            search: SearchHighlighter::new(),
            padding: GutterPadding::default(),
            metrics: Arc::new(MonospaceMetrics::default()),
        }
    }

    /// Use a custom keyword table.
    pub fn with_keywords(mut self, table: &KeywordTable) -> Self {
        self.syntax = SyntaxTokenizer::with_keywords(table);
        self
    }

    /// Use custom gutter padding.
    pub fn with_padding(mut self, padding: GutterPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Use the host's font measurement.
    pub fn with_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Active theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Run a full render pass.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = doc.text.len(), diff = doc.diff_mode))]
    pub fn render(&self, doc: &Document) -> RenderResult {
        let started = Instant::now();
        let text: &str = &doc.text;
        let index = LineIndex::build(text);
        let mut styled = StyledText::new(text.len());

        let (per_line_numbers, line_kinds, widest) = if doc.diff_mode {
            let layout = self.diff.tokenize(text, &index, &self.theme);
            styled.extend(layout.spans);
            let (kinds, numbers): (Vec<DiffLineKind>, Vec<LineNumbers>) =
                layout.lines.iter().map(|l| (l.kind, l.numbers)).unzip();
            (numbers, kinds, layout.max_number.unwrap_or(1))
        } else {
            styled.extend(self.syntax.tokenize(text, &self.theme));
            (Vec::new(), Vec::new(), index.line_count())
        };

        let search_matches = self
            .search
            .apply(&mut styled, text, &doc.search_query, &self.theme);

        let gutter = GutterMetrics::compute(
            widest,
            doc.font_size,
            self.metrics.as_ref(),
            &self.padding,
        );

        let logical_line_count = index.line_count();
        let styled_spans = styled.into_spans();
        debug!(
            lines = logical_line_count,
            spans = styled_spans.len(),
            matches = search_matches,
            elapsed_us = started.elapsed().as_micros() as u64,
            "render pass complete"
        );

        RenderResult {
            text_len: text.len(),
            styled_spans,
            line_break_offsets: index.breaks().to_vec(),
            logical_line_count,
            gutter_width: gutter.width,
            gutter,
            per_line_numbers,
            line_kinds,
            search_matches,
        }
    }

    /// Re-run only the search highlighter over an existing result.
    ///
    /// Diff and syntax spans are left untouched.
    pub fn rehighlight(&self, result: &mut RenderResult, text: &str, query: &str) {
        let mut styled = result.styled_text();
        result.search_matches = self.search.apply(&mut styled, text, query, &self.theme);
        result.styled_spans = styled.into_spans();
    }
}

/// Render `doc` with the default theme and monospace metrics.
#[must_use]
pub fn render(doc: &Document) -> RenderResult {
    Renderer::default().render(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_render() {
        let doc = Document::new("fn main() {\n    let x = 42;\n}\n").with_search("LET");
        let result = render(&doc);
        assert_eq!(result.line_break_offsets, vec![11, 27, 29]);
        assert_eq!(result.logical_line_count, 4);
        assert!(result.per_line_numbers.is_empty());
        assert!(!result.is_diff());
        assert_eq!(result.search_matches, 1);
        assert!(result
            .styled_spans
            .iter()
            .any(|s| s.owner == SpanOwner::Syntax));
    }

    #[test]
    fn test_diff_render_numbers_drive_gutter() {
        let text = "@@ -998 +1000 @@\n-a\n+b";
        let result = render(&Document::new(text).with_diff_mode(true));
        assert!(result.is_diff());
        assert_eq!(result.gutter.digits, 4);
        assert_eq!(
            result.per_line_numbers,
            vec![
                LineNumbers::default(),
                LineNumbers { left: Some(998), right: None },
                LineNumbers { left: None, right: Some(1000) },
            ]
        );
        assert!(result.styled_spans.iter().all(|s| s.owner == SpanOwner::Diff));
    }

    #[test]
    fn test_diff_without_numbers_uses_one_digit() {
        let result = render(&Document::new("no hunks here").with_diff_mode(true));
        assert_eq!(result.gutter.digits, 1);
    }

    #[test]
    fn test_rehighlight_preserves_tokenizer_spans() {
        let renderer = Renderer::default();
        let text = "let a = \"foo\"; // foo";
        let mut result = renderer.render(&Document::new(text).with_search("foo"));
        assert_eq!(result.search_matches, 2);

        let base = renderer.render(&Document::new(text));
        renderer.rehighlight(&mut result, text, " ");
        assert_eq!(result.search_matches, 0);
        assert_eq!(result.styled_spans, base.styled_spans);
    }

    #[test]
    fn test_result_line_index_round_trip() {
        let result = render(&Document::new("a\nb\nc"));
        let index = result.line_index();
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_number_for(4), 3);
    }
}
