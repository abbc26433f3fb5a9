//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod config;
pub mod render;
pub mod search;
pub mod themes;
pub mod view;

use crate::cli::ModeArgs;
use crate::config::{Config, DiffDetection};
use crate::render::looks_like_diff;

/// Decide whether `text` is rendered as a diff.
///
/// Explicit `--diff`/`--plain` flags win over the configured detection policy.
#[must_use]
pub fn resolve_diff_mode(text: &str, mode: &ModeArgs, detection: DiffDetection) -> bool {
    if mode.diff {
        return true;
    }
    if mode.plain {
        return false;
    }
    match detection {
        DiffDetection::Always => true,
        DiffDetection::Never => false,
        DiffDetection::Auto => looks_like_diff(text),
    }
}

/// Copy of `config` with the theme overridden from the command line.
#[must_use]
pub fn with_theme_override(config: &Config, theme: Option<&str>) -> Config {
    let mut config = config.clone();
    if let Some(name) = theme {
        config.theme.name = name.to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_detection() {
        let diff = "diff --git a/x b/x\n";
        let plain = ModeArgs {
            plain: true,
            ..ModeArgs::default()
        };
        assert!(!resolve_diff_mode(diff, &plain, DiffDetection::Always));

        let forced = ModeArgs {
            diff: true,
            ..ModeArgs::default()
        };
        assert!(resolve_diff_mode("hello", &forced, DiffDetection::Never));
    }

    #[test]
    fn test_auto_detection() {
        let auto = ModeArgs::default();
        assert!(resolve_diff_mode("\n@@ -1 +1 @@\n", &auto, DiffDetection::Auto));
        assert!(!resolve_diff_mode("just a log\n", &auto, DiffDetection::Auto));
        assert!(resolve_diff_mode("just a log\n", &auto, DiffDetection::Always));
    }

    #[test]
    fn test_theme_override() {
        let config = Config::default();
        assert_eq!(with_theme_override(&config, Some("light")).theme.name, "light");
        assert_eq!(with_theme_override(&config, None).theme.name, "dark");
    }
}
