use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use easyrest_core::VERSION;

/// easyrest - schema-driven entity service
#[derive(Parser)]
#[command(name = "easyrest")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "EASYREST_CONFIG")]
    pub config: Option<String>,

    /// Path to the schema declarations (overrides the config file)
    #[arg(short, long, global = true, env = "EASYREST_SCHEMAS")]
    pub schemas: Option<String>,

    /// Path to the SQLite store (overrides the config file)
    #[arg(long, global = true, env = "EASYREST_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments for the `schemas` command
#[derive(Args)]
pub struct SchemasArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `schema` command
#[derive(Args)]
pub struct SchemaShowArgs {
    /// Schema slug
    #[arg(value_name = "SLUG")]
    pub slug: String,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Schema slug
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u64>,

    /// Page size (0 uses the default)
    #[arg(long)]
    pub size: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `get` command
#[derive(Args)]
pub struct GetArgs {
    /// Schema slug
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Document ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output compact JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// Schema slug
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Use this ID instead of a generated one
    #[arg(long)]
    pub id: Option<String>,

    /// Document JSON ("-" or omitted reads stdin)
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,
}

/// Arguments for the `replace` and `patch` commands
#[derive(Args)]
pub struct WriteArgs {
    /// Schema slug
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Document ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Document JSON ("-" or omitted reads stdin)
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Schema slug
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Document ID
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

/// Arguments for the internal cache daemon command
#[derive(Args)]
pub struct InternalCacheDaemonArgs {
    #[arg(long)]
    pub socket: String,
    #[arg(long)]
    pub idle_seconds: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List declared schemas
    Schemas(SchemasArgs),

    /// Show the JSON Schema declared for a slug
    Schema(SchemaShowArgs),

    /// List one page of documents
    List(ListArgs),

    /// Show a document by ID
    Get(GetArgs),

    /// Validate and store a new document
    Create(CreateArgs),

    /// Replace a document wholesale
    Replace(WriteArgs),

    /// Merge fields into an existing document
    Patch(WriteArgs),

    /// Delete a document
    Delete(DeleteArgs),

    /// Drop every entry held by the cache daemon
    FlushCache,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Internal cache daemon (not user-facing)
    #[command(hide = true, name = "internal-cache-daemon")]
    InternalCacheDaemon(InternalCacheDaemonArgs),
}
