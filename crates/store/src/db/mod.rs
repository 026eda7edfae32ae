//! Record storage for Quickbuy.
//!
//! # Layout
//!
//! Every collection is persisted whole, as one JSON array under one key:
//!
//! - `quickbuy_agents` - Staff accounts (seeded with 2 demo agents)
//! - `quickbuy_customers` - Customer accounts (seeded with 1)
//! - `quickbuy_devices` - Buy-side catalog (seeded with 1)
//! - `quickbuy_transactions` - Trade-in submissions (seeded with 2)
//! - `transactions` - Legacy sell-flow submissions, read only by the migration
//!
//! Single-object session keys live in [`session`].
//!
//! # Layers
//!
//! - [`KeyValueStore`] - raw text get/set, implemented by [`MemoryStore`] and
//!   [`FileStore`]
//! - [`RecordStore`] - JSON save/load over an injected backend
//! - [`Repository`] - whole-collection CRUD for one [`Record`] type
//!
//! Writes replace the whole collection. Two handles over the same backend
//! race with last-writer-wins; there is no merge and no locking.

pub mod agents;
pub mod customers;
pub mod devices;
pub mod file;
pub mod memory;
pub mod session;
pub mod transactions;

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use chrono::NaiveDate;
use quickbuy_core::Email;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{StorageKind, StoreConfig};
use crate::models::{Agent, Customer, Device, Transaction};

pub use agents::AgentRepository;
pub use customers::CustomerRepository;
pub use devices::{DeviceFilter, DeviceRepository};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::SessionStore;
pub use transactions::TransactionRepository;

/// Storage keys for the record collections.
pub mod keys {
    /// Agent collection.
    pub const AGENTS: &str = "quickbuy_agents";

    /// Customer collection.
    pub const CUSTOMERS: &str = "quickbuy_customers";

    /// Device catalog.
    pub const DEVICES: &str = "quickbuy_devices";

    /// Trade-in transactions.
    pub const TRANSACTIONS: &str = "quickbuy_transactions";

    /// Submissions written by the old sell flow, in a looser shape.
    pub const LEGACY_TRANSACTIONS: &str = "transactions";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the underlying medium failed.
    #[error("storage i/o error for '{key}': {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the value would exceed the configured quota.
    #[error("quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the store would hold after the write.
        needed: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend refuses writes (disabled storage).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backend error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Stored or seeded data is invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record kind (e.g. "agent").
        kind: &'static str,
        /// Requested ID.
        id: String,
    },

    /// Uniqueness violation (e.g. duplicate username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Record failed validation.
    #[error("invalid {kind}: {reason}")]
    Invalid {
        /// Record kind.
        kind: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl RepositoryError {
    pub(crate) fn not_found(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            reason: reason.into(),
        }
    }
}

/// Synchronous string key-value storage.
///
/// All methods take `&self`; implementations use interior mutability where
/// they need it. Quickbuy is single-threaded, so nothing here is `Sync`.
pub trait KeyValueStore {
    /// Read the text stored at `key`. Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the text stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails or exceeds the quota.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// List stored keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

/// Typed JSON access to a [`KeyValueStore`].
///
/// Nothing is cached: every load re-parses from the backend and every save
/// replaces the stored value.
pub struct RecordStore {
    backend: Box<dyn KeyValueStore>,
}

impl RecordStore {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Record store over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Serialize `value` to JSON and overwrite `key` with it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the backend write fails. The
    /// previous value at `key` is left in place in that case.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        self.backend.set(key, &text).inspect_err(|e| {
            tracing::warn!(key, error = %e, "Failed to save value");
        })?;
        tracing::debug!(key, bytes = text.len(), "Saved value");
        Ok(())
    }

    /// Load and parse the value at `key`.
    ///
    /// Returns `default` if the key is absent or holds text that does not
    /// parse as `T`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only if the backend itself cannot be read.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StoreError> {
        Ok(self.load_opt(key)?.unwrap_or(default))
    }

    /// Load and parse the value at `key`, or `None` if absent or malformed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only if the backend itself cannot be read.
    pub fn load_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(text) = self.backend.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed stored value");
                Ok(None)
            }
        }
    }

    /// Whether anything is stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.backend.get(key)?.is_some())
    }

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be modified.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }
}

/// Open a record store on the backend selected by `config`.
///
/// # Errors
///
/// Returns `StoreError` if the file backend's data directory cannot be created.
pub fn open(config: &StoreConfig) -> Result<RecordStore, StoreError> {
    let store = match config.storage {
        StorageKind::Memory => {
            let mut backend = MemoryStore::new();
            if let Some(quota) = config.quota_bytes {
                backend = backend.with_quota(quota);
            }
            RecordStore::new(backend)
        }
        StorageKind::File => {
            let mut backend = FileStore::open(&config.data_dir)?;
            if let Some(quota) = config.quota_bytes {
                backend = backend.with_quota(quota);
            }
            RecordStore::new(backend)
        }
    };
    tracing::debug!(storage = ?config.storage, "Opened record store");
    Ok(store)
}

/// A record type persisted as one collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Typed ID of this record.
    type Id: Copy + Ord + fmt::Display + fmt::Debug + From<i64> + Into<i64>;

    /// Storage key of the collection.
    const KEY: &'static str;

    /// Human-readable record kind, for errors and logs.
    const KIND: &'static str;

    /// This record's ID.
    fn id(&self) -> Self::Id;

    /// Replace this record's ID (used when inserting).
    fn set_id(&mut self, id: Self::Id);

    /// Collection returned while nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the seed data cannot be built.
    fn seed() -> Result<Vec<Self>, RepositoryError>;

    /// Check the record before it is written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` describing the first problem found.
    fn validate(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Whole-collection repository for one record type.
pub struct Repository<'a, R> {
    store: &'a RecordStore,
    _record: PhantomData<R>,
}

impl<R> Clone for Repository<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Repository<'_, R> {}

impl<'a, R: Record> Repository<'a, R> {
    /// Create a repository over `store`.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Load the whole collection, falling back to the seed data while the
    /// key is absent or unreadable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend cannot be read or the seed
    /// data cannot be built.
    pub fn all(&self) -> Result<Vec<R>, RepositoryError> {
        match self.store.load_opt(R::KEY)? {
            Some(records) => Ok(records),
            None => R::seed(),
        }
    }

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    pub fn save_all(&self, records: &[R]) -> Result<(), RepositoryError> {
        self.store.save(R::KEY, records)?;
        Ok(())
    }

    /// Number of records in the collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.all()?.len())
    }

    /// Look up a record by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the collection cannot be loaded.
    pub fn get(&self, id: R::Id) -> Result<Option<R>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|r| r.id() == id))
    }

    /// Look up a record by ID, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this ID.
    pub fn require(&self, id: R::Id) -> Result<R, RepositoryError> {
        self.get(id)?
            .ok_or_else(|| RepositoryError::not_found(R::KIND, id))
    }

    /// Append a record, assigning it the next free ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if validation fails, or a store
    /// error if the write fails.
    pub fn insert(&self, mut record: R) -> Result<R, RepositoryError> {
        record.validate()?;
        let mut records = self.all()?;
        let next = records
            .iter()
            .map(|r| -> i64 { r.id().into() })
            .max()
            .map_or(1, |max| max.saturating_add(1));
        record.set_id(R::Id::from(next));
        records.push(record.clone());
        self.save_all(&records)?;
        tracing::info!(kind = R::KIND, id = %record.id(), "Inserted record");
        Ok(record)
    }

    /// Replace the record with the same ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this ID,
    /// `RepositoryError::Invalid` if validation fails.
    pub fn update(&self, record: R) -> Result<(), RepositoryError> {
        record.validate()?;
        let mut records = self.all()?;
        let id = record.id();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| RepositoryError::not_found(R::KIND, id))?;
        *slot = record;
        self.save_all(&records)?;
        tracing::info!(kind = R::KIND, %id, "Updated record");
        Ok(())
    }

    /// Load, mutate and write back one record.
    ///
    /// Nothing is written if `f` fails.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, `RepositoryError::NotFound` if no record
    /// has this ID, or a store error if the write fails.
    pub fn update_with<E, F>(&self, id: R::Id, f: F) -> Result<R, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&mut R) -> Result<(), E>,
    {
        let mut records = self.all()?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| RepositoryError::not_found(R::KIND, id))?;
        f(slot)?;
        slot.validate()?;
        let updated = slot.clone();
        self.save_all(&records)?;
        tracing::debug!(kind = R::KIND, %id, "Modified record");
        Ok(updated)
    }

    /// Remove a record. References held by other collections are left alone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this ID.
    pub fn delete(&self, id: R::Id) -> Result<R, RepositoryError> {
        let mut records = self.all()?;
        let pos = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| RepositoryError::not_found(R::KIND, id))?;
        let removed = records.remove(pos);
        self.save_all(&records)?;
        tracing::info!(kind = R::KIND, %id, "Deleted record");
        Ok(removed)
    }
}

pub(crate) fn seed_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        RepositoryError::DataCorruption(format!("invalid seed date {year}-{month}-{day}"))
    })
}

pub(crate) fn seed_email(address: &str) -> Result<Email, RepositoryError> {
    Email::parse(address)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid seed email: {e}")))
}

/// Outcome of [`seed_all`]: which collections were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Keys that received seed data.
    pub seeded: Vec<&'static str>,
    /// Keys left alone because they already held data.
    pub skipped: Vec<&'static str>,
}

/// Write the seed collections.
///
/// Without `force` only absent keys are written.
///
/// # Errors
///
/// Returns `RepositoryError` if seeding or a write fails.
pub fn seed_all(store: &RecordStore, force: bool) -> Result<SeedReport, RepositoryError> {
    let mut report = SeedReport::default();
    seed_one::<Agent>(store, force, &mut report)?;
    seed_one::<Customer>(store, force, &mut report)?;
    seed_one::<Device>(store, force, &mut report)?;
    seed_one::<Transaction>(store, force, &mut report)?;
    Ok(report)
}

fn seed_one<R: Record>(
    store: &RecordStore,
    force: bool,
    report: &mut SeedReport,
) -> Result<(), RepositoryError> {
    if !force && store.contains(R::KEY)? {
        report.skipped.push(R::KEY);
        return Ok(());
    }
    let records = R::seed()?;
    store.save(R::KEY, &records)?;
    tracing::info!(key = R::KEY, count = records.len(), "Seeded collection");
    report.seeded.push(R::KEY);
    Ok(())
}
