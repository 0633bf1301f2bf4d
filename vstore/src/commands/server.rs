//! The default node command
//!
//! Opens the database and the identity, builds the application and
//! keeps the process alive for the consensus side. The consensus
//! transport itself is an external collaborator; the `--socket` address
//! is where an engine would attach its callback connection.

use std::time::Duration;

use anyhow::Context;

use lib_vfs::{VStoreApp, VfsStore};

use crate::commands::{self, Paths};

pub fn run(paths: &Paths, socket: &str) -> anyhow::Result<()> {
    let password = commands::read_password()?;

    // Identity errors at startup are fatal to the process
    let identity = commands::open_or_generate_identity(&paths.id, &password)?;

    let store = VfsStore::open(&paths.db)
        .with_context(|| format!("could not open database: {}", paths.db.display()))?;
    tracing::info!(db = %paths.db.display(), "using database");

    let app = VStoreApp::new(store, identity)?;

    let info = app.info()?;
    tracing::info!(
        socket,
        height = info.last_block_height,
        app_hash = %hex::encode(info.last_block_app_hash),
        "vstore application ready"
    );

    // Lifecycle traffic arrives through the consensus engine attached at
    // the socket address; the process idles until it is terminated.
    loop {
        std::thread::sleep(Duration::from_secs(3600));
    }
}
