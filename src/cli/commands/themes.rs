//! Themes command implementation.

use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::theme::{available_themes, Theme};

/// Run the themes command.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let active = Theme::from_name(&config.theme.name).map(|t| t.name);

    match cli.effective_output() {
        OutputFormat::Json => {
            let themes: Vec<_> = available_themes()
                .into_iter()
                .filter_map(Theme::from_name)
                .map(|t| {
                    json!({
                        "name": t.name,
                        "active": active.as_deref() == Some(t.name.as_str()),
                        "foreground": t.foreground.to_hex(),
                        "diff_added_bg": t.diff_added_bg.to_hex(),
                        "diff_removed_bg": t.diff_removed_bg.to_hex(),
                        "search_bg": t.search_bg.to_hex(),
                        "gutter": t.gutter.to_hex(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&themes)?);
        }
        OutputFormat::Text => {
            for name in available_themes() {
                let marker = if active.as_deref() == Some(name) { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
    }

    Ok(())
}
