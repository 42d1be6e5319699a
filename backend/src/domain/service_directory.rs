//! Service directory: CRUD over the single stored [`DirectoryDocument`].
//!
//! A directory is built per chat message, loaded once with
//! [`ServiceDirectory::init`], and written back as a full overwrite after each
//! successful mutation. Every write bumps the document version by one.
//!
//! Concurrent requests each read, mutate and overwrite their own copy, so the
//! last writer wins. The version is never compared against the value read.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::{DirectoryStore, DirectoryStoreError, SERVICES_KEY};
use crate::domain::{DirectoryDocument, ServiceRecord};

/// Required record fields, named as they appear in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// [`ServiceRecord::name`].
    Name,
    /// [`ServiceRecord::owner`].
    Owner,
    /// [`ServiceRecord::room`].
    Room,
    /// [`ServiceRecord::url`].
    Url,
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Name => "Name",
            Self::Owner => "Owner",
            Self::Room => "Room",
            Self::Url => "Url",
        };
        f.write_str(label)
    }
}

/// Broad category of a [`DirectoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryErrorKind {
    /// A record misses required data.
    Validation,
    /// A name or alias is already taken.
    Conflict,
    /// The directory was used before [`ServiceDirectory::init`].
    Uninitialized,
    /// The store failed or holds an unreadable document.
    Storage,
}

/// Failures raised by [`ServiceDirectory`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// A required field is empty.
    #[error("{field} required.")]
    MissingField {
        /// The empty field.
        field: RequiredField,
    },
    /// A record with this name, or an alias spelled like it, already exists.
    #[error("{name} already exists as a service. Delete it first or use another name")]
    DuplicateName {
        /// Name of the rejected record.
        name: String,
    },
    /// One of the new aliases is already a name or alias.
    #[error("{alias} is an alias of {existing}. You can delete it or use different aliases")]
    AliasCollision {
        /// Name of the rejected record.
        name: String,
        /// The alias that collided.
        alias: String,
        /// Name of the record already holding it.
        existing: String,
    },
    /// A read or write was attempted before loading the document.
    #[error("Not initialised. Load the directory before using it")]
    Uninitialized,
    /// The stored document is not valid directory JSON.
    #[error("stored directory is unreadable: {message}")]
    Corrupt {
        /// Parser diagnostics.
        message: String,
    },
    /// The store adapter failed.
    #[error(transparent)]
    Store(#[from] DirectoryStoreError),
}

impl DirectoryError {
    /// Category used by callers that only care about the failure class.
    #[must_use]
    pub fn kind(&self) -> DirectoryErrorKind {
        match self {
            Self::MissingField { .. } => DirectoryErrorKind::Validation,
            Self::DuplicateName { .. } | Self::AliasCollision { .. } => {
                DirectoryErrorKind::Conflict
            }
            Self::Uninitialized => DirectoryErrorKind::Uninitialized,
            Self::Corrupt { .. } | Self::Store(_) => DirectoryErrorKind::Storage,
        }
    }
}

/// In-memory view of the stored directory for one request.
pub struct ServiceDirectory<S: ?Sized> {
    store: Arc<S>,
    document: Option<DirectoryDocument>,
}

impl<S> ServiceDirectory<S>
where
    S: DirectoryStore + ?Sized,
{
    /// Create an unloaded directory backed by `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            document: None,
        }
    }

    /// Create a directory and load it straight away.
    ///
    /// # Errors
    /// See [`ServiceDirectory::init`].
    pub async fn load(store: Arc<S>) -> Result<Self, DirectoryError> {
        let mut directory = Self::new(store);
        directory.init().await?;
        Ok(directory)
    }

    /// Load the document stored under [`SERVICES_KEY`].
    ///
    /// A missing key yields an empty directory at version 1.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Store`] when the read fails and
    /// [`DirectoryError::Corrupt`] when the stored JSON cannot be parsed.
    pub async fn init(&mut self) -> Result<(), DirectoryError> {
        let stored = self.store.get(SERVICES_KEY).await?;
        let document = match stored {
            Some(json) => DirectoryDocument::from_json(&json).map_err(|err| {
                DirectoryError::Corrupt {
                    message: err.to_string(),
                }
            })?,
            None => {
                info!("no stored directory found; starting empty");
                DirectoryDocument::default()
            }
        };
        info!(
            services = document.services.len(),
            version = document.version,
            "directory loaded"
        );
        self.document = Some(document);
        Ok(())
    }

    fn document(&self) -> Result<&DirectoryDocument, DirectoryError> {
        self.document.as_ref().ok_or(DirectoryError::Uninitialized)
    }

    /// First record, in stored order, whose name or any alias equals
    /// `name_or_alias` ignoring case.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Uninitialized`] before [`Self::init`].
    pub fn find(&self, name_or_alias: &str) -> Result<Option<&ServiceRecord>, DirectoryError> {
        let found = self
            .document()?
            .services
            .iter()
            .find(|service| service.matches(name_or_alias));
        if found.is_some() {
            debug!(query = name_or_alias, "directory match");
        }
        Ok(found)
    }

    /// Position of the record named `name` (aliases are ignored).
    ///
    /// # Errors
    /// Returns [`DirectoryError::Uninitialized`] before [`Self::init`].
    pub fn find_index_by_name(&self, name: &str) -> Result<Option<usize>, DirectoryError> {
        Ok(self
            .document()?
            .services
            .iter()
            .position(|service| service.has_name(name)))
    }

    /// Names of every record, sorted for display.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Uninitialized`] before [`Self::init`].
    pub fn names(&self) -> Result<Vec<String>, DirectoryError> {
        Ok(self.document()?.sorted_names())
    }

    /// The loaded document as-is.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Uninitialized`] before [`Self::init`].
    pub fn export(&self) -> Result<&DirectoryDocument, DirectoryError> {
        self.document()
    }

    /// Current document version.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Uninitialized`] before [`Self::init`].
    pub fn version(&self) -> Result<u64, DirectoryError> {
        Ok(self.document()?.version)
    }

    /// Number of records.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Uninitialized`] before [`Self::init`].
    pub fn service_count(&self) -> Result<usize, DirectoryError> {
        Ok(self.document()?.services.len())
    }

    /// Validate, append and persist `record`, returning the new record count.
    ///
    /// Nothing changes, in memory or in the store, when an error is returned.
    ///
    /// # Errors
    /// - [`DirectoryError::MissingField`] for an empty name, owner, room or url.
    /// - [`DirectoryError::DuplicateName`] when the name is already a name or
    ///   alias.
    /// - [`DirectoryError::AliasCollision`] when an alias is already a name or
    ///   alias, equals the record's own name, or repeats within the record.
    /// - [`DirectoryError::Store`] when the write fails.
    pub async fn add(&mut self, record: ServiceRecord) -> Result<usize, DirectoryError> {
        validate(&record)?;
        self.check_unique(&record)?;

        info!(service = %record.name, "adding service");
        let mut next = self.document()?.clone();
        next.services.push(record);
        let count = self.commit(next).await?;
        info!(services = count, "service added");
        Ok(count)
    }

    /// Remove the record named `name` and persist.
    ///
    /// Returns `None`, without writing, when no record has that name. Aliases
    /// are not considered.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Store`] when the write fails.
    pub async fn delete(&mut self, name: &str) -> Result<Option<usize>, DirectoryError> {
        let Some(index) = self.find_index_by_name(name)? else {
            return Ok(None);
        };

        info!(service = name, "deleting service");
        let mut next = self.document()?.clone();
        next.services.remove(index);
        let count = self.commit(next).await?;
        Ok(Some(count))
    }

    /// Write the current document back with its version bumped by one.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Uninitialized`] before [`Self::init`] and
    /// [`DirectoryError::Store`] when the write fails.
    pub async fn persist(&mut self) -> Result<u64, DirectoryError> {
        let next = self.document()?.clone();
        self.commit(next).await?;
        self.version()
    }

    async fn commit(&mut self, mut next: DirectoryDocument) -> Result<usize, DirectoryError> {
        next.version += 1;
        let json = next
            .to_json()
            .map_err(|err| DirectoryStoreError::serialization(err.to_string()))?;
        debug!(bytes = json.len(), version = next.version, "writing directory");
        self.store.put(SERVICES_KEY, &json).await?;
        info!(version = next.version, "directory persisted");

        let count = next.services.len();
        self.document = Some(next);
        Ok(count)
    }

    fn check_unique(&self, record: &ServiceRecord) -> Result<(), DirectoryError> {
        if self.find(&record.name)?.is_some() {
            return Err(DirectoryError::DuplicateName {
                name: record.name.clone(),
            });
        }

        for (position, alias) in record.aliases.iter().enumerate() {
            let existing = match self.find(alias)? {
                Some(existing) => Some(existing.name.clone()),
                None => own_collision(record, position, alias),
            };
            if let Some(existing) = existing {
                return Err(DirectoryError::AliasCollision {
                    name: record.name.clone(),
                    alias: alias.clone(),
                    existing,
                });
            }
        }
        Ok(())
    }
}

fn validate(record: &ServiceRecord) -> Result<(), DirectoryError> {
    let fields = [
        (RequiredField::Name, &record.name),
        (RequiredField::Owner, &record.owner),
        (RequiredField::Room, &record.room),
        (RequiredField::Url, &record.url),
    ];
    match fields.into_iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(DirectoryError::MissingField { field }),
        None => Ok(()),
    }
}

// An alias may not repeat the record's own name or an earlier alias of it.
fn own_collision(record: &ServiceRecord, position: usize, alias: &str) -> Option<String> {
    let earlier = record.aliases.iter().take(position);
    let prefix = ServiceRecord {
        aliases: earlier.cloned().collect(),
        ..record.clone()
    };
    prefix.matches(alias).then(|| record.name.clone())
}
