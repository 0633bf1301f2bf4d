//! Command-line interface definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// vStore is a verifiable store for consensus-driven networks
#[derive(Parser, Debug)]
#[command(name = "vstore", version)]
#[command(about = "vStore is a verifiable, signature-attested data store")]
#[command(long_about = "vStore focusses on providing:

  - data integrity: attaching timestamp and signature information to data
  - data redundancy: running a vstore application on top of consensus nodes
  - data security: the consensus log is *not* used to store your data")]
pub struct Cli {
    /// Path to the vstore home directory (defaults to $HOME/.vstore)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Consensus callback socket address
    #[arg(long, global = true, default_value = "unix://vfs.sock")]
    pub socket: String,

    /// Path to the encrypted identity file (defaults to <home>/id)
    #[arg(long, global = true)]
    pub id: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// vstore subcommands; the default (no subcommand) runs the node
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print version information
    Version,

    /// Print the node's state information
    Info(InfoArgs),

    /// Query the store for a committed transaction
    Query(QueryArgs),

    /// Create, sign and optionally commit a transaction
    Factory(FactoryArgs),
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Display the information in JSON format
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Transaction hash in hexadecimal, as returned by factory
    #[arg(long)]
    pub hash: Option<String>,

    /// Display the information in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Display the transaction body as UTF-8 text instead of hex
    #[arg(short, long)]
    pub plain: bool,
}

#[derive(Args, Debug)]
pub struct FactoryArgs {
    /// The transaction body to sign
    #[arg(long)]
    pub data: Option<String>,

    /// Commit the signed transaction to the local store
    #[arg(short, long)]
    pub commit: bool,
}
