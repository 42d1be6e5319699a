//! Startup seeding of the directory store.
//!
//! A fresh store holds nothing, so the bot would reject every event (no token)
//! and answer every query with an empty hint. Seeding writes a directory
//! document and the webhook token, but never overwrites existing values.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::DirectoryDocument;
use crate::domain::ports::{DirectoryStore, DirectoryStoreError, SERVICES_KEY, TOKEN_KEY};

/// Errors returned while seeding the store.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Seed file could not be read.
    #[error("failed to read seed file at {path}: {source}")]
    Read {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Seed file is not a directory document.
    #[error("seed file at {path} is not a directory document: {source}")]
    Parse {
        /// Path to the seed file.
        path: PathBuf,
        /// Parser diagnostics.
        #[source]
        source: serde_json::Error,
    },
    /// The store rejected a read or write.
    #[error(transparent)]
    Store(#[from] DirectoryStoreError),
}

/// What seeding changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Services written from the seed file, when the directory was empty.
    pub services_seeded: Option<usize>,
    /// True when the token was written.
    pub token_seeded: bool,
}

/// Seed `store` from `seed_file` and `token`.
///
/// The seed file is validated even when the store already holds a directory,
/// so a broken file fails startup consistently.
///
/// # Errors
/// Returns [`SeedError`] when the file cannot be read or parsed or the store
/// fails.
pub async fn seed_store<S>(
    store: &S,
    seed_file: Option<&Path>,
    token: Option<&str>,
) -> Result<SeedOutcome, SeedError>
where
    S: DirectoryStore + ?Sized,
{
    let mut outcome = SeedOutcome::default();

    if let Some(path) = seed_file {
        let document = read_seed_file(path)?;
        if store.get(SERVICES_KEY).await?.is_some() {
            info!(path = %path.display(), "directory already stored; seed file ignored");
        } else {
            let json = document
                .to_json()
                .map_err(|err| DirectoryStoreError::serialization(err.to_string()))?;
            store.put(SERVICES_KEY, &json).await?;
            info!(
                path = %path.display(),
                services = document.services.len(),
                version = document.version,
                "directory seeded"
            );
            outcome.services_seeded = Some(document.services.len());
        }
    }

    if let Some(token) = token {
        if store.get(TOKEN_KEY).await?.is_none() {
            store.put(TOKEN_KEY, token).await?;
            info!("webhook token stored");
            outcome.token_seeded = true;
        }
    } else if store.get(TOKEN_KEY).await?.is_none() {
        warn!("no webhook token configured or stored; every event will be rejected");
    }

    Ok(outcome)
}

fn read_seed_file(path: &Path) -> Result<DirectoryDocument, SeedError> {
    let read_error = |source: std::io::Error| SeedError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must name a file",
        ))
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(file_name).map_err(read_error)?;
    DirectoryDocument::from_json(&contents).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
