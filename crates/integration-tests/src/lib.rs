//! Integration tests for Quickbuy.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickbuy-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - File backend round trips, reopen, quota, concurrent handles
//! - `workflow` - Full trade-in lifecycle across agents and customers
//! - `migration` - Legacy submissions folded into the canonical collection
//!
//! Every test gets its own temporary data directory from [`TestContext`].

use std::path::Path;

use tempfile::TempDir;

use quickbuy_store::db::FileStore;
use quickbuy_store::{RecordStore, StoreConfig};

/// A temporary data directory and a store opened on it.
pub struct TestContext {
    pub dir: TempDir,
    pub store: RecordStore,
    pub config: StoreConfig,
}

impl TestContext {
    /// Fresh, empty data directory with the demo admin configured.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = open_dir(dir.path());
        let mut config = StoreConfig::for_memory().expect("demo config");
        config.storage = quickbuy_store::StorageKind::File;
        config.data_dir = dir.path().to_path_buf();
        Self { dir, store, config }
    }

    /// A second, independent handle on the same directory.
    #[must_use]
    pub fn reopen(&self) -> RecordStore {
        open_dir(self.dir.path())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn open_dir(path: &Path) -> RecordStore {
    RecordStore::new(FileStore::open(path).expect("open file store"))
}
