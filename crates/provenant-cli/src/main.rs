//! Provenant CLI - record items, verification and ownership in a registry journal.

use clap::{Parser, Subcommand};
use provenant_core::{EventKind, Identity, ItemId, Price, RegistryError};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{audit, init, log, mutate, query, Context};

const DEFAULT_LOG: &str = "provenant=warn,provenant_core=warn,provenant_journal=warn";
const VERBOSE_LOG: &str = "provenant=debug,provenant_core=debug,provenant_journal=debug";

#[derive(Parser)]
#[command(name = "provenant")]
#[command(about = "Provenance registry: items, verification and ownership history")]
#[command(version)]
struct Cli {
    /// Journal file holding the registry
    #[arg(long, global = true, env = "PROVENANT_JOURNAL")]
    journal: Option<PathBuf>,

    /// Identity performing the operation
    #[arg(long = "as", global = true, env = "PROVENANT_IDENTITY", value_name = "IDENTITY")]
    identity: Option<Identity>,

    /// TOML configuration file
    #[arg(long, global = true, env = "PROVENANT_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new registry journal
    Init {
        /// Administrator identity, fixed for the life of the registry
        #[arg(long)]
        admin: Identity,
    },
    /// Register an item owned by the caller
    Register(mutate::RegisterArgs),
    /// Mark an item as verified (authorized verifiers only)
    Verify {
        /// Item identifier
        item: ItemId,
    },
    /// Transfer an item to a new owner (current owner only)
    Transfer {
        /// Item identifier
        item: ItemId,
        /// New owner
        #[arg(long)]
        to: Identity,
        /// Sale price in minor units
        #[arg(long, default_value = "0")]
        price: Price,
    },
    /// Add a verifier (administrator only)
    Authorize {
        /// Identity to authorize
        identity: Identity,
    },
    /// Remove a verifier (administrator only)
    Revoke {
        /// Identity to revoke
        identity: Identity,
    },
    /// Show an item
    Item {
        /// Item identifier
        item: ItemId,
    },
    /// Show an item's ownership history, oldest first
    History {
        /// Item identifier
        item: ItemId,
    },
    /// Show an item's verification status
    Status {
        /// Item identifier
        item: ItemId,
    },
    /// Check whether an identity may verify items
    IsVerifier {
        /// Identity to check
        identity: Identity,
    },
    /// List the administrator and all verifiers
    Verifiers,
    /// Show the number of registered items
    Total,
    /// List items owned by an identity (default: the caller)
    Owned {
        /// Owner to look up
        identity: Option<Identity>,
    },
    /// List journal events
    Log {
        /// Only events about this item
        #[arg(long)]
        item: Option<ItemId>,
        /// Only events of this kind (e.g. ownership_transferred)
        #[arg(long)]
        kind: Option<EventKind>,
        /// Only events performed by this identity
        #[arg(long)]
        actor: Option<Identity>,
    },
    /// Check the journal's hash chain and replay it
    Audit,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("PROVENANT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { VERBOSE_LOG } else { DEFAULT_LOG })
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        match error_code(&e) {
            Some(code) => eprintln!("Error [{}]: {:#}", code, e),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::new(cli.journal, cli.identity, cli.config.as_deref(), cli.json)?;

    match cli.command {
        Commands::Init { admin } => init::run(admin, &ctx),
        Commands::Register(args) => mutate::register(args, &ctx),
        Commands::Verify { item } => mutate::verify(item, &ctx),
        Commands::Transfer { item, to, price } => mutate::transfer(item, to, price, &ctx),
        Commands::Authorize { identity } => mutate::authorize(identity, &ctx),
        Commands::Revoke { identity } => mutate::revoke(identity, &ctx),
        Commands::Item { item } => query::item(item, &ctx),
        Commands::History { item } => query::history(item, &ctx),
        Commands::Status { item } => query::status(item, &ctx),
        Commands::IsVerifier { identity } => query::is_verifier(identity, &ctx),
        Commands::Verifiers => query::verifiers(&ctx),
        Commands::Total => query::total(&ctx),
        Commands::Owned { identity } => query::owned(identity, &ctx),
        Commands::Log { item, kind, actor } => log::run(item, kind, actor, &ctx),
        Commands::Audit => audit::run(&ctx),
    }
}

/// Stable code of the registry error behind `err`, if there is one.
fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<RegistryError>())
        .map(RegistryError::kind)
}
