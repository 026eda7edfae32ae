//! Quickbuy Core - Shared types library.
//!
//! This crate provides common types used across all Quickbuy components:
//! - `store` - Persistent record store, repositories and workflow services
//! - `cli` - Command-line tools for seeding, inspecting and driving records
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails, catalog and
//!   account enums, and the transaction status state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
