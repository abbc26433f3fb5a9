//! Terminal adapters for render results.
//!
//! The render core knows nothing about terminals. This module turns a
//! [`RenderResult`] into visual rows (gutter label plus styled pieces), then
//! into ratatui [`Line`]s. The interactive pager in [`app`] drives the
//! background scheduler from a crossterm event loop.

mod app;

pub use app::{run, PagerOptions};

use std::ops::Range;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::render::{visual_fragments, GutterLabel, LabelKind, RenderResult, Rgb, Segment};
use crate::theme::Theme;
use crate::util::clamp_range;

/// A styled piece of one visual row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Byte range into the source text.
    pub range: Range<usize>,
    /// Foreground override.
    pub fg: Option<Rgb>,
    /// Background override.
    pub bg: Option<Rgb>,
}

/// One visual row ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Number to draw in the gutter, if any.
    pub label: Option<GutterLabel>,
    /// Text pieces in order, covering the whole fragment.
    pub pieces: Vec<Piece>,
}

/// Split `text` into visual rows using `result`.
///
/// `columns` is the text width available after the gutter; it only matters
/// when `wrap` is on. Ranges are clamped, so a result computed for slightly
/// different text still paints without panicking.
#[must_use]
pub fn paint_rows(text: &str, result: &RenderResult, wrap: bool, columns: usize) -> Vec<Row> {
    let index = result.line_index();
    let segments = result.styled_text().segments();
    let mut painter = result.gutter_painter(&index, wrap);

    visual_fragments(text, &index, wrap, columns)
        .into_iter()
        .map(|fragment| {
            let fragment = clamp_range(text, fragment);
            Row {
                label: painter.label_for_fragment(fragment.start),
                pieces: pieces_for(text, &segments, fragment),
            }
        })
        .collect()
}

fn pieces_for(text: &str, segments: &[Segment], fragment: Range<usize>) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut cursor = fragment.start;
    let first = segments.partition_point(|s| s.range.end <= fragment.start);

    for segment in &segments[first..] {
        if segment.range.start >= fragment.end {
            break;
        }
        let start = segment.range.start.max(fragment.start);
        let end = segment.range.end.min(fragment.end);
        if start > cursor {
            pieces.push(Piece {
                range: clamp_range(text, cursor..start),
                fg: None,
                bg: None,
            });
        }
        let range = clamp_range(text, start..end);
        if !range.is_empty() {
            cursor = range.end;
            pieces.push(Piece {
                range,
                fg: segment.fg,
                bg: segment.bg,
            });
        }
    }

    if cursor < fragment.end {
        pieces.push(Piece {
            range: cursor..fragment.end,
            fg: None,
            bg: None,
        });
    }
    pieces
}

/// Width in cells of the number column, excluding padding.
#[must_use]
pub fn number_width(result: &RenderResult) -> usize {
    (result.gutter_width.round() as usize)
        .saturating_sub(2)
        .max(result.gutter.digits)
}

/// Gutter text for a row: the number right-aligned between single spaces.
#[must_use]
pub fn gutter_text(label: Option<GutterLabel>, width: usize) -> String {
    match label {
        Some(label) => format!(" {:>width$} ", label.number),
        None => " ".repeat(width + 2),
    }
}

/// Convert a render colour into a ratatui colour.
#[must_use]
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Build ratatui lines for the whole document.
#[must_use]
pub fn to_lines(
    text: &str,
    result: &RenderResult,
    theme: &Theme,
    wrap: bool,
    columns: usize,
) -> Vec<Line<'static>> {
    let width = number_width(result);
    paint_rows(text, result, wrap, columns)
        .into_iter()
        .map(|row| {
            let gutter_fg = match row.label.map(|l| l.kind) {
                Some(LabelKind::Deletion) => theme.gutter_deletion,
                _ => theme.gutter,
            };
            let mut spans = vec![Span::styled(
                gutter_text(row.label, width),
                Style::default().fg(color(gutter_fg)),
            )];
            spans.extend(row.pieces.into_iter().map(|piece| {
                let mut style = Style::default();
                if let Some(fg) = piece.fg {
                    style = style.fg(color(fg));
                }
                if let Some(bg) = piece.bg {
                    style = style.bg(color(bg));
                }
                let content = text[piece.range].trim_end_matches('\r').to_string();
                Span::styled(content, style)
            }));
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CellMetrics, Document, GutterPadding, Renderer};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn cell_renderer() -> Renderer {
        Renderer::new(Theme::dark())
            .with_metrics(Arc::new(CellMetrics))
            .with_padding(GutterPadding::cells())
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_rows_cover_every_byte_of_each_line() {
        let text = "let x = \"hi\"; // ok\nplain";
        let result = cell_renderer().render(&Document::new(text));
        let rows = paint_rows(text, &result, false, 0);
        assert_eq!(rows.len(), 2);
        let first: String = rows[0].pieces.iter().map(|p| &text[p.range.clone()]).collect();
        assert_eq!(first, "let x = \"hi\"; // ok");
        assert_eq!(rows[1].pieces, vec![Piece { range: 20..25, fg: None, bg: None }]);
    }

    #[test]
    fn test_diff_lines_render_with_gutter() {
        let text = "@@ -1 +1 @@\n-old\n+new";
        let renderer = cell_renderer();
        let result = renderer.render(&Document::new(text).with_diff_mode(true));
        let lines = to_lines(text, &result, renderer.theme(), false, 0);
        assert_eq!(
            lines.iter().map(line_text).collect::<Vec<_>>(),
            vec!["   @@ -1 +1 @@", " 1 -old", " 1 +new"]
        );
        assert_eq!(lines[1].spans[0].style.fg, Some(color(renderer.theme().gutter_deletion)));
    }

    #[test]
    fn test_wrapped_rows_repeat_number() {
        let text = "abcdefgh";
        let result = cell_renderer().render(&Document::new(text).with_wrap(true));
        let rows = paint_rows(text, &result, true, 3);
        let labels: Vec<_> = rows.iter().map(|r| r.label.map(|l| l.number)).collect();
        assert_eq!(labels, vec![Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn test_stale_result_is_clamped() {
        let long = "0123456789\nabcdef";
        let result = cell_renderer().render(&Document::new(long).with_search("f"));
        let rows = paint_rows("012", &result, false, 0);
        assert_eq!(rows[0].pieces.last().map(|p| p.range.end), Some(3));
        assert!(rows[1..].iter().all(|r| r.pieces.is_empty()));
    }

    #[test]
    fn test_gutter_text() {
        let label = GutterLabel { number: 7, kind: LabelKind::Normal };
        assert_eq!(gutter_text(Some(label), 3), "   7 ");
        assert_eq!(gutter_text(None, 2), "    ");
    }
}
