//! vStore node
//!
//! Entry point for the vstore binary: a verifiable, signature-attested
//! data store. The default command runs the store as a node; the
//! subcommands cover identity-backed transaction tooling.

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    // Initialize logging from RUST_LOG, defaulting to info
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("vstore: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = commands::Paths::resolve(&cli);

    match cli.command {
        Some(Command::Version) => commands::version::run(),
        Some(Command::Info(args)) => commands::info::run(&paths, &args),
        Some(Command::Query(args)) => commands::query::run(&paths, &args),
        Some(Command::Factory(args)) => commands::factory::run(&paths, &args),
        None => commands::server::run(&paths, &cli.socket),
    }
}
