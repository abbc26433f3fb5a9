//! Configuration management for snatch-view.
//!
//! Handles:
//! - Render defaults (wrap, font size, diff detection)
//! - Gutter padding
//! - Theme selection
//! - Extra syntax keywords
//! - Render cache limits

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::render::{GutterPadding, KeywordTable, Renderer, DEFAULT_FONT_SIZE};
use crate::theme::Theme;
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Render defaults.
    #[serde(default)]
    pub render: RenderConfig,
    /// Gutter padding.
    #[serde(default)]
    pub gutter: GutterPadding,
    /// Theme settings.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Syntax colouring settings.
    #[serde(default)]
    pub syntax: SyntaxConfig,
    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Project-specific configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = ".snatch-view.toml";

impl Config {
    /// Load configuration from default locations.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration with project-specific overrides.
    ///
    /// Searches for `.snatch-view.toml` in the given project directory
    /// and merges it with the global configuration.
    pub fn load_for_project(project_dir: &Path) -> Result<Self> {
        let mut config = Self::load().unwrap_or_default();

        let project_config_path = project_dir.join(PROJECT_CONFIG_FILENAME);
        if project_config_path.exists() {
            let project_config = Self::load_from(&project_config_path)?;
            config.merge_from(&project_config);
        }

        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| ViewError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge_from(&mut self, other: &Config) {
        let defaults = Config::default();

        if other.render.wrap != defaults.render.wrap {
            self.render.wrap = other.render.wrap;
        }
        if other.render.font_size != defaults.render.font_size {
            self.render.font_size = other.render.font_size;
        }
        if other.render.diff_detection != defaults.render.diff_detection {
            self.render.diff_detection = other.render.diff_detection;
        }

        if other.gutter != defaults.gutter {
            self.gutter = other.gutter;
        }

        if other.theme.name != defaults.theme.name {
            self.theme.name = other.theme.name.clone();
        }
        if other.theme.color != defaults.theme.color {
            self.theme.color = other.theme.color;
        }

        for word in &other.syntax.extra_keywords {
            if !self.syntax.extra_keywords.contains(word) {
                self.syntax.extra_keywords.push(word.clone());
            }
        }

        if other.cache.enabled != defaults.cache.enabled {
            self.cache.enabled = other.cache.enabled;
        }
        if other.cache.max_entries != defaults.cache.max_entries {
            self.cache.max_entries = other.cache.max_entries;
        }
        if other.cache.max_size != defaults.cache.max_size {
            self.cache.max_size = other.cache.max_size;
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    ///
    /// Uses an atomic write so a crash never leaves a truncated file behind.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ViewError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())
    }

    /// Resolve the configured theme.
    pub fn resolve_theme(&self) -> Result<Theme> {
        Theme::from_name(&self.theme.name).ok_or_else(|| ViewError::InvalidConfig {
            message: format!(
                "unknown theme '{}' (available: {})",
                self.theme.name,
                crate::theme::available_themes().join(", ")
            ),
        })
    }

    /// Keyword table: the built-in list plus any configured extras.
    pub fn keyword_table(&self) -> KeywordTable {
        let mut table = KeywordTable::default();
        table.extend(self.syntax.extra_keywords.iter().cloned());
        table
    }

    /// Build a renderer from this configuration.
    pub fn renderer(&self) -> Result<Renderer> {
        Ok(Renderer::new(self.resolve_theme()?)
            .with_keywords(&self.keyword_table())
            .with_padding(self.gutter))
    }
}

/// When to treat input as a unified diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffDetection {
    /// Sniff the first non-empty line.
    #[default]
    Auto,
    /// Always render as a diff.
    Always,
    /// Never render as a diff.
    Never,
}

/// Render defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Wrap long lines.
    #[serde(default)]
    pub wrap: bool,
    /// Font size for gutter sizing.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Diff detection policy.
    #[serde(default)]
    pub diff_detection: DiffDetection,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wrap: false,
            font_size: DEFAULT_FONT_SIZE,
            diff_detection: DiffDetection::Auto,
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme name.
    #[serde(default = "default_theme")]
    pub name: String,
    /// Use color output.
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme(),
            color: true,
        }
    }
}

/// Syntax colouring configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxConfig {
    /// Words coloured as keywords in addition to the built-in list.
    #[serde(default)]
    pub extra_keywords: Vec<String>,
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable caching.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of cached render results.
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,
    /// Maximum cache size in bytes.
    #[serde(default = "default_cache_size")]
    pub max_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_entries(),
            max_size: default_cache_size(),
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_cache_entries() -> usize {
    32
}

fn default_cache_size() -> u64 {
    64 * 1024 * 1024
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| ViewError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join("snatch-view").join("config.toml"))
}
