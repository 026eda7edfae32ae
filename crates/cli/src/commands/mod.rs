//! Subcommand implementations.
//!
//! Each command opens nothing itself: it receives the record store opened by
//! `main` and reports through `tracing`.

pub mod admin;
pub mod agents;
pub mod customers;
pub mod devices;
pub mod migrate;
pub mod seed;
pub mod session;
pub mod stats;
pub mod transactions;

use thiserror::Error;

use quickbuy_core::{AgentId, CustomerId, Email};

/// Errors raised by the commands themselves, on top of the store's.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Removing the agent would orphan work in progress.
    #[error("agent {id} still has {open} open transaction(s); finish or reassign them first")]
    AgentHasOpenWork { id: AgentId, open: usize },

    /// A device listing needs at least one positive price.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Customer emails are unique.
    #[error("customer {id} already uses {email}")]
    DuplicateEmail { id: CustomerId, email: Email },

    /// The command changes admin-only data.
    #[error("admin login required (qb admin login)")]
    AdminLoginRequired,
}
