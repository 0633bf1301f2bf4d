//! The `query` subcommand
//!
//! Looks up a committed transaction by hash, decrypts it with the
//! node's identity and prints the signer, signature, size and body.

use anyhow::{bail, Context};
use serde::Serialize;

use lib_vfs::app::types::APP_VERSION;
use lib_vfs::{SignedTransaction, VStoreApp, VfsStore};

use crate::cli::QueryArgs;
use crate::commands::{self, Paths};

#[derive(Serialize)]
struct TxInfo {
    signer: String,
    signature: String,
    size: i64,
    data: String,
}

pub fn run(paths: &Paths, args: &QueryArgs) -> anyhow::Result<()> {
    let hash_hex = match &args.hash {
        Some(hash) => hash.clone(),
        None => commands::read_line("Enter the transaction hash: ")?,
    };
    let hash = hex::decode(hash_hex.trim())
        .context("could not use provided transaction hash")?;

    let password = commands::read_password()?;
    let identity = commands::open_identity(&paths.id, &password)?;

    let store = VfsStore::open(&paths.db)
        .with_context(|| format!("could not open database: {}", paths.db.display()))?;
    let app = VStoreApp::new(store, identity)?;

    let response = app.query("/hash", &hash, false);
    if response.value.is_empty() {
        bail!("could not find transaction with hash: {}", hex::encode(&hash));
    }

    let tx = SignedTransaction::from_bytes(&response.value)
        .context("could not parse transaction bytes")?;

    let body = if args.plain {
        String::from_utf8_lossy(&tx.body).into_owned()
    } else {
        hex::encode(&tx.body)
    };

    let info = TxInfo {
        signer: hex::encode(tx.signer.as_bytes()),
        signature: hex::encode(&tx.signature),
        size: i64::from(tx.size),
        data: body,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("vStore v1.0 (vfs v{APP_VERSION}) - ABCI:");
    println!("  Signer PubKey: {}", info.signer);
    println!("      Signature: {}", info.signature);
    println!("           Size: {}", info.size);
    println!("           Data: {}", info.data);

    Ok(())
}
