//! Clap derive structures for the `sitedeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sitedeck -- admin console for subscription fetcher sites
#[derive(Debug, Parser)]
#[command(
    name = "sitedeck",
    version,
    about = "Manage subscription fetcher sites from the command line",
    long_about = "Administer the site configurations and global settings of a \
        browser-automation subscription fetcher.\n\n\
        Edit configs as JSON in $EDITOR or field by field, trigger fetches \
        and read the resulting subscription content.",
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
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOpts {
    /// Console profile to use
    #[arg(long, short = 'p', env = "SITEDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL, e.g. http://localhost:8000/api (overrides profile)
    #[arg(long, short = 'u', env = "SITEDECK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Public origin for subscription URLs (defaults to the API URL's origin)
    #[arg(long, env = "SITEDECK_ORIGIN", global = true)]
    pub origin: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "SITEDECK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SITEDECK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, env = "SITEDECK_COLOR", default_value = "auto", global = true)]
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SITEDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SITEDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Timeout in seconds for fetch and subscription requests
    #[arg(long, env = "SITEDECK_FETCH_TIMEOUT", global = true)]
    pub fetch_timeout: Option<u64>,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage site configurations
    #[command(alias = "site", alias = "s")]
    Sites(SitesArgs),

    /// Show and edit the global configuration
    #[command(alias = "g")]
    Global(GlobalArgs),

    /// Show the form fields derived from the service schemas
    Schema(SchemaArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Edit Arguments ────────────────────────────────────────────

/// How an interactive edit is performed.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Prompt field by field instead of opening $EDITOR on the JSON
    #[arg(long, short = 'F')]
    pub form: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List configured sites
    #[command(alias = "ls")]
    List {
        /// Show secrets instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Show one site
    Get {
        /// Site id
        id: String,

        /// Show secrets instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Create a site from a JSON file, in $EDITOR, or with form prompts
    Create {
        /// Read the site JSON from a file ("-" for stdin)
        #[arg(long, short = 'f', conflicts_with = "form")]
        from_file: Option<PathBuf>,

        #[command(flatten)]
        edit: EditArgs,
    },

    /// Edit an existing site
    Edit {
        /// Site id
        id: String,

        #[command(flatten)]
        edit: EditArgs,
    },

    /// Set individual fields on a site
    Set {
        /// Site id
        id: String,

        /// Field assignments, e.g. name=Acme captcha_retry_count=3
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },

    /// Delete a site
    #[command(alias = "rm")]
    Delete {
        /// Site id
        id: String,
    },

    /// Run a remote fetch for one or more sites
    Fetch {
        /// Site ids; fetches run concurrently
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print a site's public subscription URL
    Url {
        /// Site id
        id: String,
    },

    /// Print a site's subscription content
    Content {
        /// Site id
        id: String,

        /// Force a fresh fetch instead of reading the service cache
        #[arg(long)]
        no_cache: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GLOBAL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub command: GlobalCommand,
}

#[derive(Debug, Subcommand)]
pub enum GlobalCommand {
    /// Show the global configuration
    Show {
        /// Show secrets instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Edit the global configuration
    Edit {
        #[command(flatten)]
        edit: EditArgs,
    },

    /// Set individual global fields
    Set {
        /// Field assignments, e.g. headless=true timeout=60000
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SCHEMA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Which schema to show
    #[arg(value_enum)]
    pub target: SchemaTarget,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaTarget {
    /// Site configuration fields
    Site,
    /// Global configuration fields
    Global,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key, e.g. "api_url" or "fetch_timeout"
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
