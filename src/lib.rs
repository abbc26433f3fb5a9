//! snatch-view: incremental text rendering for session-log and diff viewers.
//!
//! This crate turns raw log or unified-diff text into a styled representation:
//! colour spans, a line-break index, per-line diff numbers and a gutter width.
//! Rendering is a pure function of a [`Document`], so it can run on a background
//! pool while the interactive thread keeps responding.
//!
//! # Quick Start
//!
//! ```rust
//! use snatch_view::{render, Document};
//!
//! let doc = Document::new("@@ -1 +1 @@\n-old\n+new").with_diff_mode(true);
//! let result = render(&doc);
//! assert_eq!(result.logical_line_count, 3);
//! assert_eq!(result.per_line_numbers[2].right, Some(1));
//! ```
//!
//! # Architecture
//!
//! - [`render`]: line index, diff and syntax tokenizers, search, gutter
//! - [`scheduler`]: background passes with generation gating
//! - [`cache`]: memoized render results
//! - [`tui`]: ratatui adapter and interactive pager
//! - [`cli`]: command-line interface
//! - [`config`]: configuration management
//! - [`theme`]: colour palettes
//! - [`error`]: error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod theme;
pub mod tui;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{Result, ViewError};
pub use render::{render, Document, RenderResult, Renderer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cache::RenderCache;
    pub use crate::error::{Result, ViewError};
    pub use crate::render::{
        Document, FontMetrics, LineIndex, RenderResult, Renderer, SpanOwner, StyledSpan,
    };
    pub use crate::scheduler::{RenderScheduler, RenderedView};
    pub use crate::theme::Theme;
}
