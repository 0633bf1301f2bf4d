//! The `info` subcommand
//!
//! Prints the state information needed to verify the integrity of a
//! vStore instance: height, transaction count, merkle root count and
//! the app-hash. Reads the local database directly; nothing here needs
//! the identity password.

use anyhow::Context;
use serde::Serialize;

use lib_vfs::app::types::{ABCI_VERSION, APP_VERSION};
use lib_vfs::VfsStore;

use crate::cli::InfoArgs;
use crate::commands::Paths;

#[derive(Serialize)]
struct AppInfo {
    abci_version: &'static str,
    app_version: u64,
    last_height: i64,
    transactions: i64,
    merkle_roots: usize,
    app_hash: String,
}

pub fn run(paths: &Paths, args: &InfoArgs) -> anyhow::Result<()> {
    let store = VfsStore::open(&paths.db)
        .with_context(|| format!("could not open database: {}", paths.db.display()))?;
    let state = store.load_state().context("could not load state")?;

    let info = AppInfo {
        abci_version: ABCI_VERSION,
        app_version: APP_VERSION,
        last_height: state.height,
        transactions: state.num_transactions,
        merkle_roots: state.merkle_roots.len(),
        app_hash: hex::encode(state.app_hash()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("vStore v1.0 (vfs v{APP_VERSION}) - ABCI:");
    println!("  ABCI Version: {}", info.abci_version);
    println!("   App Version: {}", info.app_version);
    println!("   Last Height: {}", info.last_height);
    println!("  Transactions: {}", info.transactions);
    println!("  Merkle Roots: {}", info.merkle_roots);
    println!("      App Hash: {}", info.app_hash);

    Ok(())
}
