//! Clap derive structures for the `netwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netwatch -- connection quality monitor
#[derive(Debug, Parser)]
#[command(
    name = "netwatch",
    version,
    about = "Monitor connection quality from the command line",
    long_about = "Probes a set of HTTP endpoints, scores latency, packet loss,\n\
        bandwidth and stability, and reports an overall connection quality\n\
        level with actionable recommendations.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file path (defaults to the platform config directory)
    #[arg(long, env = "NETWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Probe endpoint, repeatable (overrides the configured set)
    #[arg(long = "endpoint", short = 'e', value_name = "URL", global = true)]
    pub endpoints: Vec<String>,

    /// Per-endpoint probe timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "NETWATCH_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Log line format on stderr
    #[arg(
        long,
        env = "NETWATCH_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON (one object per line in `watch`)
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the monitor and print every change until Ctrl-C
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Run one probe round and report connection quality
    #[command(alias = "c")]
    Check(CheckArgs),

    /// Measure download speed and latency
    #[command(alias = "st")]
    SpeedTest,

    /// Manage netwatch configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this long (e.g. "90s", "5m")
    #[arg(long = "for", value_name = "DURATION", value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Run a speed test periodically (minimum 60s)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub speed_test_every: Option<Duration>,

    /// Read connectivity events as JSON lines from stdin,
    /// e.g. {"kind":"offline"}
    #[arg(long)]
    pub stdin_events: bool,
}

// ── Check ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Also run a speed test when the connection is up
    #[arg(long, short = 's')]
    pub speed_test: bool,

    /// Exit with status 9 when no endpoint is reachable
    #[arg(long)]
    pub fail_offline: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current resolved configuration
    Show,

    /// Write a config file populated with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

fn parse_duration(raw: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(raw)
}
