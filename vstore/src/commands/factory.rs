//! The `factory` subcommand
//!
//! Creates digitally signed datasets. Without `--commit` the signed
//! transaction bytes are printed for out-of-band submission; with
//! `--commit` a full local block round is driven against the store.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};

use lib_vfs::app::types::code;
use lib_vfs::{LocalDriver, SignedTransaction, VStoreApp, VfsStore};

use crate::cli::FactoryArgs;
use crate::commands::{self, Paths};

pub fn run(paths: &Paths, args: &FactoryArgs) -> anyhow::Result<()> {
    let password = commands::read_password()?;
    let identity = commands::open_or_generate_identity(&paths.id, &password)?;

    let data = match &args.data {
        Some(data) => data.clone(),
        None => commands::read_line("Enter the data to sign: ")?,
    };

    let keypair = identity.keypair()?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_secs() as i64;

    let tx = SignedTransaction::sign(&keypair, data.into_bytes(), now);
    let tx_bytes = tx.to_bytes();

    if !args.commit {
        println!("Signed transaction bytes: ");
        println!("0x{}", hex::encode(&tx_bytes));
        return Ok(());
    }

    // Drive one full block round against the local store
    let store = VfsStore::open(&paths.db)
        .with_context(|| format!("could not open database: {}", paths.db.display()))?;
    let app = VStoreApp::new(store, identity)?;
    let mut driver = LocalDriver::new(app);

    let outcome = driver.commit_round(&[tx_bytes])?;

    match outcome.tx_results.first() {
        Some(result) if result.code == code::OK => {
            println!("Transaction successfully committed!");
            println!("Transaction Hash: {}", hex::encode(&result.data));
            println!("Committed Height: {}", outcome.height);
            Ok(())
        }
        Some(result) => bail!("transaction rejected with code {}: {}", result.code, result.log),
        None => bail!("transaction was filtered out by proposal validation"),
    }
}
