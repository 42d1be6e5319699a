//! Test utilities for the ownerbot crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::io;
use std::sync::Arc;

use crate::domain::ports::{SERVICES_KEY, TOKEN_KEY};
use crate::domain::{DirectoryDocument, ServiceRecord};
use crate::outbound::kv::InMemoryDirectoryStore;

/// Token stored by [`seeded_store`].
pub const SAMPLE_TOKEN: &str = "s3cret-token";

/// A four-service directory at version 7.
///
/// | Name       | Owner          | Aliases                |
/// |------------|----------------|------------------------|
/// | Jira       | Dev Tools      | `jira-cloud`, `tickets`|
/// | NinjaPanel | Internal Tools | `np`, `ninja`          |
/// | Stash      | Dev Tools      | `Bitbucket`, `bb`      |
/// | Kibana     | Observability  | `logs`                 |
pub fn sample_document() -> DirectoryDocument {
    DirectoryDocument {
        services: vec![
            ServiceRecord::new(
                "Jira",
                "Dev Tools",
                "Dev Tools Help",
                "https://chat.example.com/room/jira",
                ["jira-cloud", "tickets"],
            ),
            ServiceRecord::new(
                "NinjaPanel",
                "Internal Tools",
                "Internal Tools",
                "https://chat.example.com/room/ninjapanel",
                ["np", "ninja"],
            ),
            ServiceRecord::new(
                "Stash",
                "Dev Tools",
                "Dev Tools Help",
                "https://chat.example.com/room/stash",
                ["Bitbucket", "bb"],
            ),
            ServiceRecord::new(
                "Kibana",
                "Observability",
                "Logging",
                "https://chat.example.com/room/kibana",
                ["logs"],
            ),
        ],
        version: 7,
    }
}

/// In-memory store holding [`sample_document`] and [`SAMPLE_TOKEN`].
///
/// # Panics
/// Panics if the sample document cannot be serialised.
pub fn seeded_store() -> Arc<InMemoryDirectoryStore> {
    let json = sample_document()
        .to_json()
        .expect("sample document serialises");
    Arc::new(InMemoryDirectoryStore::with_entries([
        (SERVICES_KEY, json.as_str()),
        (TOKEN_KEY, SAMPLE_TOKEN),
    ]))
}

/// Write `document` as pretty JSON to a fresh temporary file.
///
/// # Errors
/// Propagates I/O failures creating or writing the file.
pub fn write_seed_file(document: &DirectoryDocument) -> io::Result<tempfile::NamedTempFile> {
    let file = tempfile::NamedTempFile::new()?;
    let json = document.to_pretty_json().map_err(io::Error::other)?;
    cap_fs::write_file(file.path(), json.as_bytes())?;
    Ok(file)
}

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The crate avoids direct `std::fs` calls. These helpers build on
    //! `cap_std::fs::Dir` so test suites share consistent file access.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`, replacing existing content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ownerbot::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("ownerbot-cap-fs-example.json");
    /// write_file(&path, b"{}\n")?;
    /// assert_eq!(read_file_to_string(&path)?, "{}\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}
