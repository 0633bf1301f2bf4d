//! Subcommand implementations

pub mod factory;
pub mod info;
pub mod query;
pub mod server;
pub mod version;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;

use lib_identity::{IdentityFile, SecretProvider};

use crate::cli::Cli;

/// Resolved filesystem locations for a node
#[derive(Debug, Clone)]
pub struct Paths {
    /// The vstore home directory
    pub home: PathBuf,
    /// The sled database directory
    pub db: PathBuf,
    /// The encrypted identity file
    pub id: PathBuf,
}

impl Paths {
    /// Resolve paths from the command line, defaulting the home
    /// directory to `$HOME/.vstore` and the identity to `<home>/id`
    pub fn resolve(cli: &Cli) -> Self {
        let home = cli.home.clone().unwrap_or_else(|| {
            dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".vstore")
        });

        let db = home.join("db");
        let id = cli.id.clone().unwrap_or_else(|| home.join("id"));

        Self { home, db, id }
    }
}

/// Prompt for the identity password without echoing
pub fn read_password() -> anyhow::Result<Vec<u8>> {
    let password = rpassword::prompt_password("Enter your password: ")
        .context("could not read password")?;
    Ok(password.into_bytes())
}

/// Prompt for one line of input on stdin
pub fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).context("could not read input")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Open an existing identity as a secret provider
pub fn open_identity(id_path: &PathBuf, password: &[u8]) -> anyhow::Result<SecretProvider> {
    SecretProvider::new(IdentityFile::new(id_path), password.to_vec())
        .context("could not open identity")
}

/// Open the identity as a secret provider, generating the identity file
/// first when it does not exist yet
pub fn open_or_generate_identity(id_path: &PathBuf, password: &[u8]) -> anyhow::Result<SecretProvider> {
    let file = IdentityFile::new(id_path);

    if !file.exists() {
        let (id, pubkey) = IdentityFile::generate(id_path, password)
            .context("could not generate identity")?;
        tracing::info!(id = %id.display(), pubkey = %pubkey.display(), "created identity files");
    }

    SecretProvider::new(file, password.to_vec()).context("could not open identity")
}
