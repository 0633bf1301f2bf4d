//! The `version` subcommand

use lib_vfs::app::types::{ABCI_VERSION, APP_VERSION};

pub fn run() -> anyhow::Result<()> {
    println!("vstore v{} (vfs v{})", env!("CARGO_PKG_VERSION"), APP_VERSION);
    println!("callback interface: {ABCI_VERSION}");
    Ok(())
}
