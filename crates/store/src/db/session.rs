//! Session and preference keys.
//!
//! Unlike the collections these hold a single object or flag each. Absent
//! and unreadable values both read as `None`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{RecordStore, StoreError};
use crate::models::{AdminProfile, PaymentDetails, SessionAgent, SessionCustomer};

/// Session keys.
pub mod keys {
    /// Logged-in customer.
    pub const CURRENT_USER: &str = "currentUser";

    /// Logged-in agent.
    pub const CURRENT_AGENT: &str = "currentAgent";

    /// Whether the admin is logged in.
    pub const IS_ADMIN: &str = "isAdmin";

    /// Payout details entered for a trade-in.
    pub const PAYMENT_DETAILS: &str = "paymentDetails";

    /// Admin profile.
    pub const ADMIN_PROFILE: &str = "adminProfile";

    /// Whether the chat assistant greeting was already shown.
    pub const QUICKBOT_VISITED: &str = "quickbot-visited";

    /// Keys cleared on logout.
    pub const LOGIN_KEYS: [&str; 3] = [CURRENT_USER, CURRENT_AGENT, IS_ADMIN];
}

/// Typed access to the session keys.
#[derive(Clone, Copy)]
pub struct SessionStore<'a> {
    store: &'a RecordStore,
}

impl<'a> SessionStore<'a> {
    /// Create a session store over `store`.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.store.load_opt(key)
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.store.save(key, value)
    }

    /// Logged-in customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    pub fn current_user(&self) -> Result<Option<SessionCustomer>, StoreError> {
        self.get(keys::CURRENT_USER)
    }

    /// Record the logged-in customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_current_user(&self, user: &SessionCustomer) -> Result<(), StoreError> {
        self.set(keys::CURRENT_USER, user)
    }

    /// Logged-in agent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    pub fn current_agent(&self) -> Result<Option<SessionAgent>, StoreError> {
        self.get(keys::CURRENT_AGENT)
    }

    /// Record the logged-in agent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_current_agent(&self, agent: &SessionAgent) -> Result<(), StoreError> {
        self.set(keys::CURRENT_AGENT, agent)
    }

    /// Whether the admin is logged in. Absent means no.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    pub fn is_admin(&self) -> Result<bool, StoreError> {
        Ok(self.get(keys::IS_ADMIN)?.unwrap_or(false))
    }

    /// Set the admin flag.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_admin(&self, is_admin: bool) -> Result<(), StoreError> {
        self.set(keys::IS_ADMIN, &is_admin)
    }

    /// Saved payout details.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    pub fn payment_details(&self) -> Result<Option<PaymentDetails>, StoreError> {
        self.get(keys::PAYMENT_DETAILS)
    }

    /// Save payout details.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_payment_details(&self, details: &PaymentDetails) -> Result<(), StoreError> {
        self.set(keys::PAYMENT_DETAILS, details)
    }

    /// Forget payout details.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be modified.
    pub fn clear_payment_details(&self) -> Result<(), StoreError> {
        self.store.remove(keys::PAYMENT_DETAILS)
    }

    /// Admin profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    pub fn admin_profile(&self) -> Result<Option<AdminProfile>, StoreError> {
        self.get(keys::ADMIN_PROFILE)
    }

    /// Save the admin profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_admin_profile(&self, profile: &AdminProfile) -> Result<(), StoreError> {
        self.set(keys::ADMIN_PROFILE, profile)
    }

    /// Whether the chat assistant greeting has been shown.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    pub fn quickbot_visited(&self) -> Result<bool, StoreError> {
        Ok(self.get(keys::QUICKBOT_VISITED)?.unwrap_or(false))
    }

    /// Remember that the chat assistant greeting has been shown.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn mark_quickbot_visited(&self) -> Result<(), StoreError> {
        self.set(keys::QUICKBOT_VISITED, &true)
    }

    /// Drop every login key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be modified.
    pub fn clear_login(&self) -> Result<(), StoreError> {
        for key in keys::LOGIN_KEYS {
            self.store.remove(key)?;
        }
        tracing::debug!("Cleared login session");
        Ok(())
    }
}
