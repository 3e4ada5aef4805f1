//! easyrest CLI - schema-driven entity service from the command line
//!
//! This is the command-line interface for easyrest. It loads schema
//! declarations and configuration, builds the entity service, and maps each
//! subcommand onto one service operation.

mod app;
mod cache;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{entities, maintenance, misc, schemas};
use crate::errors::classify;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli).await {
        classify(e).exit();
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the default is warn.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Schemas(args)) => {
            schemas::handle_schemas(ctx, args)?;
        }
        Some(Commands::Schema(args)) => {
            schemas::handle_schema(ctx, args)?;
        }
        Some(Commands::List(args)) => {
            entities::handle_list(ctx, args).await?;
        }
        Some(Commands::Get(args)) => {
            entities::handle_get(ctx, args).await?;
        }
        Some(Commands::Create(args)) => {
            entities::handle_create(ctx, args).await?;
        }
        Some(Commands::Replace(args)) => {
            entities::handle_replace(ctx, args).await?;
        }
        Some(Commands::Patch(args)) => {
            entities::handle_patch(ctx, args).await?;
        }
        Some(Commands::Delete(args)) => {
            entities::handle_delete(ctx, args).await?;
        }
        Some(Commands::FlushCache) => {
            maintenance::handle_flush_cache(ctx).await?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        Some(Commands::InternalCacheDaemon(args)) => {
            maintenance::handle_internal_cache_daemon(args).await?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }
    Ok(())
}
