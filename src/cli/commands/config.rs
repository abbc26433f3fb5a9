//! Config command implementation.
//!
//! View and modify snatch-view configuration settings.

use crate::cli::{Cli, ConfigAction, ConfigArgs, OutputFormat};
use crate::config::{default_config_path, Config, DiffDetection};
use crate::error::{Result, ViewError};

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Get { key } => get_config_value(cli, key),
        ConfigAction::Set { key, value } => set_config_value(key, value),
        ConfigAction::Path => show_config_path(),
        ConfigAction::Init => init_config(),
        ConfigAction::Reset => reset_config(),
    }
}

/// Show full configuration.
fn show_config(cli: &Cli) -> Result<()> {
    let config = Config::load().unwrap_or_default();

    match cli.effective_output() {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!("snatch-view Configuration");
            println!("=========================\n");

            println!("[render]");
            println!("  wrap = {}", config.render.wrap);
            println!("  font_size = {}", config.render.font_size);
            println!(
                "  diff_detection = \"{}\"",
                detection_name(config.render.diff_detection)
            );
            println!();

            println!("[gutter]");
            println!("  gap = {}", config.gutter.gap);
            println!("  left_padding = {}", config.gutter.left_padding);
            println!("  min_width = {}", config.gutter.min_width);
            println!();

            println!("[theme]");
            println!("  name = \"{}\"", config.theme.name);
            println!("  color = {}", config.theme.color);
            println!();

            println!("[syntax]");
            println!("  extra_keywords = {:?}", config.syntax.extra_keywords);
            println!();

            println!("[cache]");
            println!("  enabled = {}", config.cache.enabled);
            println!("  max_entries = {}", config.cache.max_entries);
            println!("  max_size = {}", config.cache.max_size);
        }
    }

    Ok(())
}

/// Read one value by dotted key.
pub fn config_value(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "render.wrap" => config.render.wrap.to_string(),
        "render.font_size" => config.render.font_size.to_string(),
        "render.diff_detection" => detection_name(config.render.diff_detection).to_string(),

        "gutter.gap" => config.gutter.gap.to_string(),
        "gutter.left_padding" => config.gutter.left_padding.to_string(),
        "gutter.min_width" => config.gutter.min_width.to_string(),

        "theme.name" => config.theme.name.clone(),
        "theme.color" => config.theme.color.to_string(),

        "syntax.extra_keywords" => config.syntax.extra_keywords.join(","),

        "cache.enabled" => config.cache.enabled.to_string(),
        "cache.max_entries" => config.cache.max_entries.to_string(),
        "cache.max_size" => config.cache.max_size.to_string(),

        _ => {
            return Err(ViewError::ConfigError {
                message: format!("Unknown configuration key: {key}"),
            })
        }
    };
    Ok(value)
}

/// Update one value by dotted key.
pub fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "render.wrap" => config.render.wrap = parse_bool(value)?,
        "render.font_size" => config.render.font_size = parse_non_negative_f32(value)?,
        "render.diff_detection" => config.render.diff_detection = parse_detection(value)?,

        "gutter.gap" => config.gutter.gap = parse_non_negative_f32(value)?,
        "gutter.left_padding" => config.gutter.left_padding = parse_non_negative_f32(value)?,
        "gutter.min_width" => config.gutter.min_width = parse_non_negative_f32(value)?,

        "theme.name" => {
            if crate::theme::Theme::from_name(value).is_none() {
                return Err(ViewError::ConfigError {
                    message: format!(
                        "Unknown theme: {value} (available: {})",
                        crate::theme::available_themes().join(", ")
                    ),
                });
            }
            config.theme.name = value.to_string();
        }
        "theme.color" => config.theme.color = parse_bool(value)?,

        "syntax.extra_keywords" => {
            config.syntax.extra_keywords = value
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect();
        }

        "cache.enabled" => config.cache.enabled = parse_bool(value)?,
        "cache.max_entries" => config.cache.max_entries = parse_usize(value)?,
        "cache.max_size" => config.cache.max_size = parse_u64(value)?,

        _ => {
            return Err(ViewError::ConfigError {
                message: format!("Unknown configuration key: {key}"),
            })
        }
    }
    Ok(())
}

/// Get a specific configuration value.
fn get_config_value(cli: &Cli, key: &str) -> Result<()> {
    let config = Config::load().unwrap_or_default();
    let value = config_value(&config, key)?;

    match cli.effective_output() {
        OutputFormat::Json => println!("{}", serde_json::json!({ key: value })),
        OutputFormat::Text => println!("{value}"),
    }

    Ok(())
}

/// Set a configuration value.
fn set_config_value(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load().unwrap_or_default();
    apply_config_value(&mut config, key, value)?;
    config.save()?;
    println!("Set {key} = {value}");
    Ok(())
}

/// Show configuration file path.
fn show_config_path() -> Result<()> {
    let path = default_config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Initialize configuration file with defaults.
fn init_config() -> Result<()> {
    let path = default_config_path()?;

    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use 'snatch-view config reset' to reset to defaults.");
        return Ok(());
    }

    Config::default().save()?;
    println!("Created configuration file at: {}", path.display());

    Ok(())
}

/// Reset configuration to defaults.
fn reset_config() -> Result<()> {
    let path = default_config_path()?;

    if !path.exists() {
        println!("No configuration file exists. Use 'snatch-view config init' to create one.");
        return Ok(());
    }

    Config::default().save()?;
    println!("Reset configuration to defaults at: {}", path.display());

    Ok(())
}

fn detection_name(detection: DiffDetection) -> &'static str {
    match detection {
        DiffDetection::Auto => "auto",
        DiffDetection::Always => "always",
        DiffDetection::Never => "never",
    }
}

fn parse_detection(s: &str) -> Result<DiffDetection> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(DiffDetection::Auto),
        "always" => Ok(DiffDetection::Always),
        "never" => Ok(DiffDetection::Never),
        _ => Err(ViewError::ConfigError {
            message: format!("Invalid diff detection: {s}. Use auto/always/never."),
        }),
    }
}

/// Parse boolean value.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ViewError::ConfigError {
            message: format!("Invalid boolean value: {s}. Use true/false."),
        }),
    }
}

fn parse_non_negative_f32(s: &str) -> Result<f32> {
    s.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| ViewError::ConfigError {
            message: format!("Invalid number: {s}"),
        })
}

/// Parse usize value.
fn parse_usize(s: &str) -> Result<usize> {
    s.parse().map_err(|_| ViewError::ConfigError {
        message: format!("Invalid number: {s}"),
    })
}

/// Parse u64 value.
fn parse_u64(s: &str) -> Result<u64> {
    s.parse().map_err(|_| ViewError::ConfigError {
        message: format!("Invalid number: {s}"),
    })
}
