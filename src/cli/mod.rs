//! Command-line interface for snatch-view.
//!
//! Commands:
//! - `render`: print a file with colours and a line-number gutter, or as JSON
//! - `search`: list case-insensitive matches with line numbers
//! - `view`: interactive pager
//! - `config`: view and modify configuration
//! - `themes`: list colour themes

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::config::Config;
use crate::error::Result;

/// Render logs and diffs with a line-number gutter and search highlighting.
#[derive(Debug, Parser)]
#[command(name = "snatch-view")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for structured data.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "SNATCH_VIEW_OUTPUT")]
    pub output: OutputFormat,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true, env = "SNATCH_VIEW_JSON")]
    pub json: bool,

    /// Enable colored output (auto-detected by default).
    #[arg(long, global = true, env = "SNATCH_VIEW_COLOR")]
    pub color: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "SNATCH_VIEW_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "SNATCH_VIEW_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Number of background render threads (default: number of CPUs).
    #[arg(short = 'j', long, global = true, env = "SNATCH_VIEW_THREADS")]
    pub threads: Option<usize>,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "SNATCH_VIEW_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
}

impl Cli {
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Whether to emit ANSI colours, given the configured default.
    #[must_use]
    pub fn use_color(&self, config: &Config) -> bool {
        use std::io::IsTerminal;
        self.color
            .unwrap_or_else(|| config.theme.color && io::stdout().is_terminal())
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a file with colours and a line-number gutter.
    #[command(alias = "r")]
    Render(RenderArgs),

    /// List case-insensitive matches in a file.
    #[command(alias = "s", alias = "find")]
    Search(SearchArgs),

    /// Open a file in the interactive pager.
    #[command(alias = "v")]
    View(ViewArgs),

    /// View and modify configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// List available colour themes.
    Themes,

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Diff-mode selection shared by `render` and `view`.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct ModeArgs {
    /// Render as a unified diff.
    #[arg(long, conflicts_with = "plain")]
    pub diff: bool,

    /// Render as plain text even if the input looks like a diff.
    #[arg(long)]
    pub plain: bool,

    /// Wrap long lines.
    #[arg(short = 'w', long)]
    pub wrap: bool,
}

/// Arguments for the render command.
#[derive(Debug, Parser)]
pub struct RenderArgs {
    /// File to render (`-` for stdin).
    pub input: PathBuf,

    /// Diff and wrap flags.
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Wrap width in columns (default: terminal width).
    #[arg(long)]
    pub width: Option<usize>,

    /// Highlight matches of this query.
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Font size used to size the gutter in JSON output.
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Theme to use.
    #[arg(long, env = "SNATCH_VIEW_THEME")]
    pub theme: Option<String>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// File to search (`-` for stdin).
    pub input: PathBuf,

    /// Text to find (case-insensitive, literal).
    pub query: String,

    /// Maximum results.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Show count of matches only (like grep -c).
    #[arg(short = 'c', long)]
    pub count: bool,
}

/// Arguments for the view command.
#[derive(Debug, Parser)]
pub struct ViewArgs {
    /// File to view (`-` for stdin).
    pub input: PathBuf,

    /// Diff and wrap flags.
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Initial search query.
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Theme to use.
    #[arg(long, env = "SNATCH_VIEW_THEME")]
    pub theme: Option<String>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Config action to perform.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show all configuration values.
    Show,

    /// Get a specific configuration value.
    Get {
        /// Configuration key (e.g., "render.wrap").
        key: String,
    },

    /// Set a configuration value.
    Set {
        /// Configuration key (e.g., "render.wrap").
        key: String,
        /// Value to set.
        value: String,
    },

    /// Show configuration file path.
    Path,

    /// Initialize configuration file with defaults.
    Init,

    /// Reset configuration to defaults.
    Reset,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "snatch-view", &mut io::stdout());
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Size the rayon pool that runs background render passes.
fn init_thread_pool(threads: Option<usize>) {
    if let Some(num_threads) = threads {
        if num_threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .ok(); // Ignore error if already initialized
        }
    }
}

/// Load configuration: an explicit `--config` file, or the global file with
/// the current directory's project override merged on top.
fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            Config::default()
        }),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Config::load_for_project(&cwd).unwrap_or_else(|e| {
                warn!(error = %e, "failed to load project config, using defaults");
                Config::default()
            })
        }
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Before any render pass touches the pool
    init_thread_pool(cli.threads);
    init_logging(&cli);

    let config = load_config(&cli);

    match &cli.command {
        Commands::Render(args) => commands::render::run(&cli, args, &config),
        Commands::Search(args) => commands::search::run(&cli, args),
        Commands::View(args) => commands::view::run(args, &config),
        Commands::Config(args) => commands::config::run(&cli, args),
        Commands::Themes => commands::themes::run(&cli, &config),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
