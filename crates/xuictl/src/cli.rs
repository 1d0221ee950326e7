//! Clap derive structures for the `xuictl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// xuictl -- manage 3x-ui panels from the command line
#[derive(Debug, Parser)]
#[command(
    name = "xuictl",
    version,
    about = "Manage 3x-ui panels from the command line",
    long_about = "Administer inbounds, clients and backups on a 3x-ui panel\n\
        through its JSON API. Connection details come from a named profile,\n\
        XUI_* environment variables, or the flags below.",
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
    /// Panel profile to use
    #[arg(long, short = 'p', env = "XUI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Panel URL including any web base path (overrides profile)
    #[arg(long, short = 'H', env = "XUI_HOST", global = true)]
    pub host: Option<String>,

    /// Panel username (overrides profile)
    #[arg(long, short = 'u', env = "XUI_USERNAME", global = true)]
    pub username: Option<String>,

    /// Panel password (prefer the keyring or XUI_PASSWORD)
    #[arg(long, env = "XUI_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "XUI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

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
    #[arg(long, short = 'k', env = "XUI_INSECURE", global = true)]
    pub insecure: bool,

    /// Per-attempt request timeout in seconds
    #[arg(long, env = "XUI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Total attempts per request on connection errors and timeouts
    #[arg(long, env = "XUI_MAX_RETRIES", global = true)]
    pub retries: Option<u32>,
}

// ── Output Enum ──────────────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage inbounds
    #[command(alias = "ib", alias = "i")]
    Inbounds(InboundsArgs),

    /// Manage clients on inbounds
    #[command(alias = "cl", alias = "c")]
    Clients(ClientsArgs),

    /// Panel database operations
    #[command(alias = "database")]
    Db(DbArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INBOUNDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InboundsArgs {
    #[command(subcommand)]
    pub command: InboundsCommand,
}

#[derive(Debug, Subcommand)]
pub enum InboundsCommand {
    /// List inbounds
    #[command(alias = "ls")]
    List,

    /// Show one inbound
    Get {
        /// Inbound ID
        id: i64,
    },

    /// Create an inbound from a JSON file
    Add {
        /// Inbound definition (panel wire format)
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Replace an inbound from a JSON file
    Update {
        /// Inbound ID
        id: i64,

        /// Inbound definition (panel wire format)
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Enable an inbound
    Enable {
        /// Inbound ID
        id: i64,
    },

    /// Disable an inbound
    Disable {
        /// Inbound ID
        id: i64,
    },

    /// Delete an inbound
    #[command(alias = "rm")]
    Delete {
        /// Inbound ID
        id: i64,
    },

    /// Reset traffic counters of every inbound
    ResetTraffic,

    /// Reset traffic counters of every client on one inbound
    ResetClientTraffic {
        /// Inbound ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients with their traffic
    #[command(alias = "ls")]
    List {
        /// Only clients of this inbound
        #[arg(long, short = 'i')]
        inbound: Option<i64>,
    },

    /// Show a client's traffic record by email
    Get {
        /// Client email
        email: String,
    },

    /// Show traffic records for a client UUID
    Traffic {
        /// Client UUID
        uuid: String,
    },

    /// Show IPs recorded for a client
    Ips {
        /// Client email
        email: String,
    },

    /// Add a client to an inbound
    Add(ClientAddArgs),

    /// Change an existing client
    Update(ClientUpdateArgs),

    /// Clear the IPs recorded for a client
    ResetIps {
        /// Client email
        email: String,
    },

    /// Reset a client's traffic counters
    ResetTraffic {
        /// Inbound ID
        #[arg(long, short = 'i')]
        inbound: i64,

        /// Client email
        email: String,
    },

    /// Remove a client from an inbound
    #[command(alias = "rm")]
    Delete {
        /// Inbound ID
        #[arg(long, short = 'i')]
        inbound: i64,

        /// Client UUID
        uuid: String,
    },

    /// Remove clients whose quota or expiry is used up
    DeleteDepleted {
        /// Inbound ID
        #[arg(long, short = 'i')]
        inbound: i64,
    },

    /// List emails of connected clients
    Online,
}

#[derive(Debug, Args)]
pub struct ClientAddArgs {
    /// Inbound ID
    #[arg(long, short = 'i')]
    pub inbound: i64,

    /// Client email (unique per panel)
    pub email: String,

    /// Client UUID (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// XTLS flow, e.g. xtls-rprx-vision
    #[arg(long)]
    pub flow: Option<String>,

    /// Traffic quota in GiB (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub total_gb: u64,

    /// Days until expiry (omit for never)
    #[arg(long)]
    pub expiry_days: Option<u32>,

    /// Maximum concurrent IPs (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub limit_ip: i64,

    /// Telegram user ID
    #[arg(long)]
    pub tg_id: Option<String>,

    /// Subscription ID
    #[arg(long)]
    pub sub_id: Option<String>,

    /// Create the client disabled
    #[arg(long)]
    pub disabled: bool,
}

#[derive(Debug, Args)]
pub struct ClientUpdateArgs {
    /// Inbound ID
    #[arg(long, short = 'i')]
    pub inbound: i64,

    /// Client UUID
    pub uuid: String,

    /// Enable the client
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable the client
    #[arg(long)]
    pub disable: bool,

    /// New email
    #[arg(long)]
    pub email: Option<String>,

    /// New traffic quota in GiB (0 = unlimited)
    #[arg(long)]
    pub total_gb: Option<u64>,

    /// New expiry, in days from now (0 = never)
    #[arg(long)]
    pub expiry_days: Option<u32>,

    /// New concurrent IP limit
    #[arg(long)]
    pub limit_ip: Option<i64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DATABASE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Send a database backup to the panel's configured admins
    #[command(alias = "backup")]
    Export,
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

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (host, username, password_env, insecure, timeout, max_retries, ca_cert)
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

    /// Store the active profile's password in the system keyring
    SetPassword,

    /// Delete a profile and its keyring password
    #[command(alias = "rm")]
    Remove {
        /// Profile name to remove
        name: String,
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
