//! Admin commands.

use tracing::{info, warn};

use quickbuy_core::Email;
use quickbuy_store::db::SessionStore;
use quickbuy_store::models::AdminProfile;
use quickbuy_store::services::AuthService;
use quickbuy_store::{RecordStore, StoreConfig};

use super::CommandError;

/// Log in as the admin.
///
/// # Errors
///
/// Returns an error if the credentials are wrong.
pub fn login(
    store: &RecordStore,
    config: &StoreConfig,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    AuthService::new(store, &config.admin).login_admin(email, password)?;
    info!("Logged in as admin");
    if config.admin.is_demo {
        warn!("Using the demo admin credentials; set QUICKBUY_ADMIN_EMAIL and QUICKBUY_ADMIN_PASSWORD");
    }
    Ok(())
}

/// Show the admin profile, falling back to the configured admin email.
///
/// # Errors
///
/// Returns an error if the session keys cannot be read.
pub fn show_profile(
    store: &RecordStore,
    config: &StoreConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match SessionStore::new(store).admin_profile()? {
        Some(profile) => {
            info!("Name: {}", profile.name);
            info!("Email: {}", profile.email);
            if !profile.phone.is_empty() {
                info!("Phone: {}", profile.phone);
            }
        }
        None => {
            info!("No admin profile saved");
            info!("Login email: {}", config.admin.email);
        }
    }
    Ok(())
}

/// Save the admin profile.
///
/// # Errors
///
/// Returns an error if the admin is not logged in or the write fails.
pub fn set_profile(
    store: &RecordStore,
    name: String,
    email: Email,
    phone: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = SessionStore::new(store);
    if !session.is_admin()? {
        return Err(CommandError::AdminLoginRequired.into());
    }
    session.set_admin_profile(&AdminProfile { name, email, phone })?;
    info!("Admin profile saved");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile_email() -> Email {
        Email::parse("ops@quickbuy.com").unwrap()
    }

    #[test]
    fn test_set_profile_requires_admin_session() {
        let store = RecordStore::in_memory();
        let err = set_profile(&store, "Ops".to_owned(), profile_email(), String::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::AdminLoginRequired)
        ));
        assert!(SessionStore::new(&store).admin_profile().unwrap().is_none());
    }

    #[test]
    fn test_set_profile_after_login() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        login(&store, &config, "admin@quickbuy.com", "admin123").unwrap();

        set_profile(&store, "Ops".to_owned(), profile_email(), "555-0100".to_owned()).unwrap();
        let saved = SessionStore::new(&store).admin_profile().unwrap().unwrap();
        assert_eq!(saved.name, "Ops");
        assert_eq!(saved.email, profile_email());
    }
}
