//! Colour themes for rendered output.
//!
//! A [`Theme`] is the palette every tokenizer paints with. It is toolkit
//! independent; the terminal adapters convert [`Rgb`] into their own colour
//! types at paint time.

use crate::render::Rgb;

/// Rendering palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name of the theme.
    pub name: String,
    /// Default text colour.
    pub foreground: Rgb,
    /// Background for added diff lines.
    pub diff_added_bg: Rgb,
    /// Background for removed diff lines.
    pub diff_removed_bg: Rgb,
    /// Background for hunk headers.
    pub diff_header_bg: Rgb,
    /// Foreground for hunk headers.
    pub diff_header_fg: Rgb,
    /// Background for file metadata lines.
    pub diff_meta_bg: Rgb,
    /// Foreground for file metadata lines.
    pub diff_meta_fg: Rgb,
    /// String literal colour.
    pub string: Rgb,
    /// Comment colour.
    pub comment: Rgb,
    /// Keyword colour.
    pub keyword: Rgb,
    /// Number literal colour.
    pub number: Rgb,
    /// Search match background.
    pub search_bg: Rgb,
    /// Search match foreground.
    pub search_fg: Rgb,
    /// Gutter line-number colour.
    pub gutter: Rgb,
    /// Gutter colour for numbers of removed lines.
    pub gutter_deletion: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: Rgb::new(0xd8, 0xde, 0xe9),
            diff_added_bg: Rgb::new(0x1f, 0x3a, 0x26),
            diff_removed_bg: Rgb::new(0x4a, 0x1f, 0x24),
            diff_header_bg: Rgb::new(0x1d, 0x2b, 0x45),
            diff_header_fg: Rgb::new(0x81, 0xa1, 0xc1),
            diff_meta_bg: Rgb::new(0x2e, 0x32, 0x38),
            diff_meta_fg: Rgb::new(0x7b, 0x83, 0x8e),
            string: Rgb::new(0xa3, 0xbe, 0x8c),
            comment: Rgb::new(0x6c, 0x76, 0x82),
            keyword: Rgb::new(0xc5, 0x86, 0xc0),
            number: Rgb::new(0xd0, 0x87, 0x70),
            search_bg: Rgb::new(0xeb, 0xcb, 0x8b),
            search_fg: Rgb::new(0x1e, 0x1e, 0x1e),
            gutter: Rgb::new(0x5c, 0x63, 0x70),
            gutter_deletion: Rgb::new(0xbf, 0x61, 0x6a),
        }
    }

    /// Create a light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            foreground: Rgb::new(0x24, 0x29, 0x2e),
            diff_added_bg: Rgb::new(0xe6, 0xff, 0xec),
            diff_removed_bg: Rgb::new(0xff, 0xeb, 0xe9),
            diff_header_bg: Rgb::new(0xdd, 0xf4, 0xff),
            diff_header_fg: Rgb::new(0x05, 0x50, 0xae),
            diff_meta_bg: Rgb::new(0xf6, 0xf8, 0xfa),
            diff_meta_fg: Rgb::new(0x6e, 0x77, 0x81),
            string: Rgb::new(0x0a, 0x30, 0x69),
            comment: Rgb::new(0x6e, 0x77, 0x81),
            keyword: Rgb::new(0xcf, 0x22, 0x2e),
            number: Rgb::new(0x05, 0x50, 0xae),
            search_bg: Rgb::new(0xff, 0xdf, 0x5d),
            search_fg: Rgb::new(0x24, 0x29, 0x2e),
            gutter: Rgb::new(0x8c, 0x95, 0x9f),
            gutter_deletion: Rgb::new(0xcf, 0x22, 0x2e),
        }
    }

    /// Create a high contrast theme.
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            foreground: Rgb::new(0xff, 0xff, 0xff),
            diff_added_bg: Rgb::new(0x00, 0x5f, 0x00),
            diff_removed_bg: Rgb::new(0x87, 0x00, 0x00),
            diff_header_bg: Rgb::new(0x00, 0x00, 0x87),
            diff_header_fg: Rgb::new(0xff, 0xff, 0x00),
            diff_meta_bg: Rgb::new(0x30, 0x30, 0x30),
            diff_meta_fg: Rgb::new(0xc0, 0xc0, 0xc0),
            string: Rgb::new(0x00, 0xff, 0x00),
            comment: Rgb::new(0x00, 0xff, 0xff),
            keyword: Rgb::new(0xff, 0xff, 0x00),
            number: Rgb::new(0xff, 0x00, 0xff),
            search_bg: Rgb::new(0xff, 0xff, 0x00),
            search_fg: Rgb::new(0x00, 0x00, 0x00),
            gutter: Rgb::new(0xff, 0xff, 0xff),
            gutter_deletion: Rgb::new(0xff, 0x00, 0x00),
        }
    }

    /// Get theme by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "high-contrast" | "highcontrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }
}

/// Available themes list.
pub fn available_themes() -> Vec<&'static str> {
    vec!["dark", "light", "high-contrast"]
}
