//! Gutter sizing.
//!
//! One width is computed per render pass and applied to every visual line. It
//! must fit the widest number that will be drawn: the logical line count in
//! plain mode, or the largest left/right number in diff mode.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Font size used when the caller passes something unusable.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Glyph advance of the fallback monospace metric, as a fraction of font size.
pub const MONOSPACE_ADVANCE: f32 = 0.6;

/// Measures rendered text width at a given font size.
///
/// Hosts inject their toolkit's measurement. Returning `None` makes the
/// renderer fall back to [`MonospaceMetrics`].
pub trait FontMetrics: Send + Sync {
    /// Width of `sample` at `font_size`, in the host's layout units.
    fn measure(&self, sample: &str, font_size: f32) -> Option<f32>;
}

/// Fixed-advance metric used when no real font is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Advance per glyph as a fraction of font size.
    pub advance: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: MONOSPACE_ADVANCE,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn measure(&self, sample: &str, font_size: f32) -> Option<f32> {
        Some(sample.chars().count() as f32 * self.advance * font_size)
    }
}

/// Terminal cells: every glyph is one unit wide regardless of font size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMetrics;

impl FontMetrics for CellMetrics {
    fn measure(&self, sample: &str, _font_size: f32) -> Option<f32> {
        Some(sample.chars().count() as f32)
    }
}

/// Fixed padding around gutter numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GutterPadding {
    /// Space between the number and the text.
    #[serde(default = "default_gap")]
    pub gap: f32,
    /// Space before the number.
    #[serde(default = "default_left_padding")]
    pub left_padding: f32,
    /// Width floor.
    #[serde(default = "default_min_width")]
    pub min_width: f32,
}

impl Default for GutterPadding {
    fn default() -> Self {
        Self {
            gap: default_gap(),
            left_padding: default_left_padding(),
            min_width: default_min_width(),
        }
    }
}

impl GutterPadding {
    /// Padding for a character-cell terminal.
    #[must_use]
    pub fn cells() -> Self {
        Self {
            gap: 1.0,
            left_padding: 1.0,
            min_width: 3.0,
        }
    }
}

fn default_gap() -> f32 {
    8.0
}

fn default_left_padding() -> f32 {
    6.0
}

fn default_min_width() -> f32 {
    20.0
}

/// Derived gutter dimensions for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GutterMetrics {
    /// Digits in the widest number.
    pub digits: usize,
    /// Measured width of the digits alone.
    pub digits_width: f32,
    /// Total gutter width including padding.
    pub width: f32,
}

impl GutterMetrics {
    /// Size a gutter for numbers up to `max_number`.
    #[must_use]
    pub fn compute(
        max_number: usize,
        font_size: f32,
        metrics: &dyn FontMetrics,
        padding: &GutterPadding,
    ) -> Self {
        let font_size = sanitize_font_size(font_size);
        let digits = digit_count(max_number);
        // '8' is the widest digit in most proportional fonts.
        let sample = "8".repeat(digits);
        let digits_width = metrics
            .measure(&sample, font_size)
            .filter(|w| w.is_finite() && *w >= 0.0)
            .unwrap_or_else(|| {
                trace!("font metrics unavailable, using monospace fallback");
                digits as f32 * MONOSPACE_ADVANCE * font_size
            });

        let width = (padding.left_padding + digits_width + padding.gap).max(padding.min_width);
        Self {
            digits,
            digits_width,
            width,
        }
    }
}

/// Replace non-finite or non-positive font sizes with [`DEFAULT_FONT_SIZE`].
#[must_use]
pub fn sanitize_font_size(font_size: f32) -> f32 {
    if font_size.is_finite() && font_size > 0.0 {
        font_size
    } else {
        DEFAULT_FONT_SIZE
    }
}

/// Number of decimal digits in `value` (at least one).
#[must_use]
pub fn digit_count(value: usize) -> usize {
    let mut digits = 1;
    let mut n = value;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
