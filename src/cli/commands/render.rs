//! Render command implementation.
//!
//! Prints a file with a line-number gutter and ANSI colours, or dumps the
//! full render result as JSON.

use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use tracing::info;

use crate::cli::{Cli, OutputFormat, RenderArgs};
use crate::config::Config;
use crate::error::{Result, ViewError};
use crate::render::{CellMetrics, Document, GutterPadding, LabelKind, RenderResult, Rgb};
use crate::theme::Theme;
use crate::tui::{gutter_text, number_width, paint_rows};
use crate::util::read_input;

use super::{resolve_diff_mode, with_theme_override};

/// Fallback width when stdout is not a terminal.
const DEFAULT_WIDTH: usize = 80;

/// Run the render command.
pub fn run(cli: &Cli, args: &RenderArgs, config: &Config) -> Result<()> {
    if let Some(size) = args.font_size {
        if !size.is_finite() || size <= 0.0 {
            return Err(ViewError::invalid_argument(
                "font-size",
                "must be a positive number",
            ));
        }
    }

    let text = read_input(&args.input)?;
    let config = with_theme_override(config, args.theme.as_deref());
    let diff_mode = resolve_diff_mode(&text, &args.mode, config.render.diff_detection);
    let wrap = args.mode.wrap || config.render.wrap;

    let doc = Document::new(text)
        .with_diff_mode(diff_mode)
        .with_wrap(wrap)
        .with_font_size(args.font_size.unwrap_or(config.render.font_size))
        .with_search(args.search.clone().unwrap_or_default());

    match cli.effective_output() {
        OutputFormat::Json => {
            let result = config.renderer()?.render(&doc);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            // Terminal output measures the gutter in cells, not pixels
            let renderer = config
                .renderer()?
                .with_metrics(Arc::new(CellMetrics))
                .with_padding(GutterPadding::cells());
            let result = renderer.render(&doc);
            info!(
                lines = result.logical_line_count,
                diff = diff_mode,
                matches = result.search_matches,
                "rendered input"
            );

            let width = args.width.unwrap_or_else(terminal_width);
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            write_ansi(
                &mut out,
                &doc.text,
                &result,
                renderer.theme(),
                &AnsiOptions {
                    wrap,
                    width,
                    color: cli.use_color(&config),
                },
            )
            .and_then(|()| out.flush())
            .map_err(|e| ViewError::io("Failed to write rendered output", e))?;
        }
    }

    Ok(())
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Layout options for [`write_ansi`].
#[derive(Debug, Clone, Copy)]
pub struct AnsiOptions {
    /// Wrap rows at `width`.
    pub wrap: bool,
    /// Total row width including the gutter.
    pub width: usize,
    /// Emit colour escapes.
    pub color: bool,
}

/// Write `result` as gutter-prefixed rows.
pub fn write_ansi<W: Write>(
    out: &mut W,
    text: &str,
    result: &RenderResult,
    theme: &Theme,
    options: &AnsiOptions,
) -> io::Result<()> {
    let digits = number_width(result);
    let columns = options.width.saturating_sub(digits + 2);

    for row in paint_rows(text, result, options.wrap, columns) {
        let gutter = gutter_text(row.label, digits);
        if options.color {
            let fg = match row.label.map(|l| l.kind) {
                Some(LabelKind::Deletion) => theme.gutter_deletion,
                _ => theme.gutter,
            };
            queue!(out, SetForegroundColor(ansi(fg)), Print(gutter), ResetColor)?;
        } else {
            out.write_all(gutter.as_bytes())?;
        }

        for piece in row.pieces {
            let content = text[piece.range].trim_end_matches('\r');
            if !options.color || (piece.fg.is_none() && piece.bg.is_none()) {
                out.write_all(content.as_bytes())?;
                continue;
            }
            if let Some(fg) = piece.fg {
                queue!(out, SetForegroundColor(ansi(fg)))?;
            }
            if let Some(bg) = piece.bg {
                queue!(out, SetBackgroundColor(ansi(bg)))?;
            }
            queue!(out, Print(content), ResetColor)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn ansi(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Renderer;
    use pretty_assertions::assert_eq;

    fn cell_renderer() -> Renderer {
        Renderer::default()
            .with_metrics(Arc::new(CellMetrics))
            .with_padding(GutterPadding::cells())
    }

    fn plain_output(doc: &Document, width: usize) -> String {
        let renderer = cell_renderer();
        let result = renderer.render(doc);
        let mut buf = Vec::new();
        let options = AnsiOptions {
            wrap: doc.wrap,
            width,
            color: false,
        };
        write_ansi(&mut buf, &doc.text, &result, renderer.theme(), &options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain_output_has_gutter() {
        let out = plain_output(&Document::new("alpha\nbeta"), 80);
        assert_eq!(out, " 1 alpha\n 2 beta\n");
    }

    #[test]
    fn test_diff_output_uses_hunk_numbers() {
        let doc = Document::new("@@ -7 +9 @@\n ctx\n-gone\n+new").with_diff_mode(true);
        let out = plain_output(&doc, 80);
        assert_eq!(out, "    @@ -7 +9 @@\n  9  ctx\n  8 -gone\n 10 +new\n");
    }

    #[test]
    fn test_wrapped_output() {
        let doc = Document::new("abcdefgh").with_wrap(true);
        // 3 gutter cells leave 5 text columns
        let out = plain_output(&doc, 8);
        assert_eq!(out, " 1 abcde\n 1 fgh\n");
    }

    #[test]
    fn test_crlf_is_trimmed() {
        let out = plain_output(&Document::new("a\r\nb"), 80);
        assert_eq!(out, " 1 a\n 2 b\n");
    }

    #[test]
    fn test_color_output_contains_escapes() {
        let renderer = cell_renderer();
        let doc = Document::new("let x = 1;").with_search("x");
        let result = renderer.render(&doc);
        let mut buf = Vec::new();
        let options = AnsiOptions {
            wrap: false,
            width: 80,
            color: true,
        };
        write_ansi(&mut buf, &doc.text, &result, renderer.theme(), &options).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("\u{1b}["));
        assert!(out.ends_with('\n'));
    }
}
