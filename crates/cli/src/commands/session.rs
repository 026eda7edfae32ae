//! Current login.

use tracing::info;

use quickbuy_store::db::SessionStore;
use quickbuy_store::services::AuthService;
use quickbuy_store::{RecordStore, StoreConfig};

/// Show who is logged in.
///
/// # Errors
///
/// Returns an error if the session keys cannot be read.
pub fn show(store: &RecordStore) -> Result<(), Box<dyn std::error::Error>> {
    let session = SessionStore::new(store);
    let mut anyone = false;

    if session.is_admin()? {
        info!("Admin: logged in");
        anyone = true;
    }
    if let Some(agent) = session.current_agent()? {
        info!("Agent: {} ({}, {})", agent.name, agent.username, agent.role);
        anyone = true;
    }
    if let Some(customer) = session.current_user()? {
        info!("Customer: {} <{}>", customer.name, customer.email);
        anyone = true;
    }
    if !anyone {
        info!("Nobody is logged in");
    }
    if let Some(details) = session.payment_details()? {
        info!(
            "Saved payout: {:?} to {} ({})",
            details.method,
            details.account_name,
            details.masked_reference()
        );
    }
    Ok(())
}

/// Clear the login.
///
/// # Errors
///
/// Returns an error if the session keys cannot be removed.
pub fn logout(store: &RecordStore, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    AuthService::new(store, &config.admin).logout()?;
    info!("Logged out");
    Ok(())
}
