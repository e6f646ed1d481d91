//! Clap derive structures for the `abflow` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// abflow -- reconcile AlgoSec BusinessFlow applications and flows
#[derive(Debug, Parser)]
#[command(
    name = "abflow",
    version,
    about = "Manage AlgoSec BusinessFlow applications and flows from the command line",
    long_about = "Manage AlgoSec BusinessFlow applications, application flows and drafts.\n\n\
        Only applications listed in the profile's managed_applications are ever\n\
        modified; an empty or missing list manages every application.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "ABFLOW_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device credentials file (JSON), used instead of a profile
    #[arg(long, env = "ABFLOW_CREDENTIALS_FILE", global = true)]
    pub credentials_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ABFLOW_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ABFLOW_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides the profile)
    #[arg(long, env = "ABFLOW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage BusinessFlow applications
    #[command(alias = "apps")]
    Applications(ApplicationsArgs),

    /// Manage application flows
    Flows(FlowsArgs),

    /// Inspect and apply application drafts
    Drafts(DraftsArgs),

    /// Reconcile the device against a desired-state manifest
    Apply(ApplyArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  APPLICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApplicationsArgs {
    #[command(subcommand)]
    pub command: ApplicationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApplicationsCommand {
    /// List managed applications
    #[command(alias = "ls")]
    List,

    /// Create an application
    Create {
        /// Application name
        name: String,
    },

    /// Decommission an application
    #[command(alias = "rm")]
    Delete {
        /// Application name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FLOWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FlowsArgs {
    #[command(subcommand)]
    pub command: FlowsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FlowsCommand {
    /// List application flows of managed applications
    #[command(alias = "ls")]
    List {
        /// Only show flows of this application
        #[arg(long, short = 'a')]
        application: Option<String>,
    },

    /// Create an application flow
    Create(FlowCreateArgs),

    /// Delete an application flow
    #[command(alias = "rm")]
    Delete {
        /// Flow title: <application>/<flow>
        title: String,
    },
}

#[derive(Debug, Args)]
pub struct FlowCreateArgs {
    /// Flow title: <application>/<flow>
    pub title: String,

    /// Source address or object (repeatable)
    #[arg(long = "source", required = true)]
    pub sources: Vec<String>,

    /// Destination address or object (repeatable)
    #[arg(long = "destination", required = true)]
    pub destinations: Vec<String>,

    /// Service name or tcp/<port>, udp/<port> (repeatable)
    #[arg(long = "service", required = true)]
    pub services: Vec<String>,

    /// Network user (repeatable)
    #[arg(long = "user")]
    pub users: Vec<String>,

    /// Network application (repeatable)
    #[arg(long = "network-application")]
    pub network_applications: Vec<String>,

    /// Free-form comment
    #[arg(long, default_value = "")]
    pub comment: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DRAFTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DraftsArgs {
    #[command(subcommand)]
    pub command: DraftsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DraftsCommand {
    /// Show managed applications with an unapplied draft
    Status,

    /// Apply every outstanding draft of managed applications
    Apply,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  APPLY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Manifest file (YAML, or JSON with a .json extension)
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Report planned changes without making them
    #[arg(long, short = 'n')]
    pub noop: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the current configuration (passwords masked)
    Show,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
