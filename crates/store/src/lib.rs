//! Quickbuy Store library.
//!
//! Persists the four Quickbuy record collections (agents, customers,
//! devices, trade-in transactions) as whole JSON documents in a synchronous
//! key-value store, and layers authentication, the trade-in workflow and
//! reporting on top of it.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`db`] - Key-value backends, the typed record store and repositories
//! - [`models`] - Record and session types
//! - [`services`] - Authentication, workflow, legacy migration, dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use config::{AdminCredentials, ConfigError, StorageKind, StoreConfig};
pub use db::{KeyValueStore, RecordStore, Repository, RepositoryError, StoreError};
