//! View command implementation.
//!
//! Opens a file in the interactive pager.

use crate::cache::RenderCache;
use crate::cli::ViewArgs;
use crate::config::Config;
use crate::error::Result;
use crate::render::{CellMetrics, GutterPadding};
use crate::tui::{self, PagerOptions};
use crate::util::read_input;

use super::{resolve_diff_mode, with_theme_override};

/// Run the view command.
pub fn run(args: &ViewArgs, config: &Config) -> Result<()> {
    let text = read_input(&args.input)?;
    let config = with_theme_override(config, args.theme.as_deref());

    let renderer = config
        .renderer()?
        .with_metrics(std::sync::Arc::new(CellMetrics))
        .with_padding(GutterPadding::cells());

    let options = PagerOptions {
        title: format!(" {} ", args.input.display()),
        diff_mode: resolve_diff_mode(&text, &args.mode, config.render.diff_detection),
        wrap: args.mode.wrap || config.render.wrap,
        search: args.search.clone().unwrap_or_default(),
        font_size: config.render.font_size,
    };

    tui::run(text, options, renderer, RenderCache::new(&config.cache))
}
