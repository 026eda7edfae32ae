//! Authentication service.
//!
//! Agents log in with username and password against the agent collection.
//! The admin logs in with the configured email and password. Successful
//! logins are recorded in the session keys.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::ExposeSecret;

use quickbuy_core::{AccountStatus, AgentId, Email};

use crate::config::AdminCredentials;
use crate::db::{AgentRepository, RecordStore, RepositoryError, SessionStore};
use crate::models::{Agent, NewAgent, SessionAgent};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    agents: AgentRepository<'a>,
    session: SessionStore<'a>,
    admin: &'a AdminCredentials,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a RecordStore, admin: &'a AdminCredentials) -> Self {
        Self {
            agents: AgentRepository::new(store),
            session: SessionStore::new(store),
            admin,
        }
    }

    // =========================================================================
    // Agents
    // =========================================================================

    /// Check an agent's username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no agent has this username
    /// or the password is wrong.
    /// Returns `AuthError::AccountInactive` if the agent is deactivated.
    pub fn authenticate_agent(&self, username: &str, password: &str) -> Result<Agent, AuthError> {
        let agent = self
            .agents
            .find_by_username(username.trim())?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &agent.password_hash)?;

        // Status is only revealed once the password matched
        if !agent.status.is_active() {
            return Err(AuthError::AccountInactive);
        }

        Ok(agent)
    }

    /// Authenticate an agent and record them as the current session user.
    ///
    /// # Errors
    ///
    /// See [`AuthService::authenticate_agent`]; also fails if the session
    /// keys cannot be written.
    pub fn login_agent(&self, username: &str, password: &str) -> Result<Agent, AuthError> {
        let agent = self.authenticate_agent(username, password)?;
        self.session.set_current_agent(&SessionAgent::from(&agent))?;
        self.session.set_admin(false)?;
        tracing::info!(agent_id = %agent.id, username = %agent.username, "Agent logged in");
        Ok(agent)
    }

    /// Register a new agent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub fn register_agent(&self, new_agent: NewAgent) -> Result<Agent, AuthError> {
        validate_password(&new_agent.password)?;
        let password_hash = hash_password(&new_agent.password)?;

        let agent = Agent {
            id: AgentId::new(0),
            name: new_agent.name.trim().to_owned(),
            username: new_agent.username.trim().to_owned(),
            password_hash,
            email: new_agent.email,
            phone: new_agent.phone,
            role: new_agent.role,
            status: AccountStatus::Active,
            assigned_devices: 0,
            completed_assessments: 0,
            join_date: Utc::now().date_naive(),
        };

        let agent = self.agents.insert_unique(agent).map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(agent_id = %agent.id, username = %agent.username, "Registered agent");
        Ok(agent)
    }

    /// Set a new password for an agent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::Repository` if the agent does not exist.
    pub fn change_agent_password(&self, id: AgentId, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        self.agents.update_with(id, |agent| {
            agent.password_hash = password_hash;
            Ok::<(), AuthError>(())
        })?;
        tracing::info!(agent_id = %id, "Changed agent password");
        Ok(())
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Check the admin email and password.
    ///
    /// The email comparison ignores case.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if either value is wrong.
    pub fn authenticate_admin(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        // Verify even when the email is wrong
        let password_ok =
            verify_password(password, self.admin.password_hash.expose_secret()).is_ok();

        if self.admin.email.matches(email.as_str()) && password_ok {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Authenticate the admin and set the admin session flag.
    ///
    /// # Errors
    ///
    /// See [`AuthService::authenticate_admin`]; also fails if the session
    /// keys cannot be written.
    pub fn login_admin(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.authenticate_admin(email, password)?;
        self.session.set_admin(true)?;
        tracing::info!(demo = self.admin.is_demo, "Admin logged in");
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Clear every login key.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the session keys cannot be removed.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.clear_login()?;
        Ok(())
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match or
/// the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use quickbuy_core::AgentRole;

    use crate::config::StoreConfig;
    use crate::db::session;

    fn new_agent(username: &str, password: &str) -> NewAgent {
        NewAgent {
            name: "Priya Shah".to_owned(),
            username: username.to_owned(),
            password: password.to_owned(),
            email: Email::parse("priya.shah@quickbuy.com").unwrap(),
            phone: "+1 (555) 222-3333".to_owned(),
            role: AgentRole::RepairTechnician,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash).is_ok());
        assert!(verify_password("password124", &hash).is_err());
        assert!(verify_password("password123", "not a phc string").is_err());
    }

    #[test]
    fn test_authenticate_seed_agent() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        let auth = AuthService::new(&store, &config.admin);

        let agent = auth.authenticate_agent("sarah.mitchell", "password123").unwrap();
        assert_eq!(agent.name, "Sarah Mitchell");

        assert!(matches!(
            auth.authenticate_agent("sarah.mitchell", "password456"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate_agent("nobody", "password123"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_inactive_agent_rejected() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        let auth = AuthService::new(&store, &config.admin);
        let _: Agent = AgentRepository::new(&store)
            .update_with(AgentId::new(2), |a| {
                a.status = AccountStatus::Inactive;
                Ok::<(), RepositoryError>(())
            })
            .unwrap();

        assert!(matches!(
            auth.authenticate_agent("james.carter", "password456"),
            Err(AuthError::AccountInactive)
        ));
        assert!(matches!(
            auth.authenticate_agent("james.carter", "wrong-password"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_agent_writes_session() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        let auth = AuthService::new(&store, &config.admin);
        auth.login_agent("james.carter", "password456").unwrap();

        let session = SessionStore::new(&store);
        let current = session.current_agent().unwrap().unwrap();
        assert_eq!(current.username, "james.carter");
        assert!(!session.is_admin().unwrap());

        auth.logout().unwrap();
        assert!(!store.contains(session::keys::CURRENT_AGENT).unwrap());
    }

    #[test]
    fn test_admin_login() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        let auth = AuthService::new(&store, &config.admin);

        assert!(matches!(
            auth.login_admin("admin@quickbuy.com", "admin124"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_admin("someone@quickbuy.com", "admin123"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_admin("admin", "admin123"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(!SessionStore::new(&store).is_admin().unwrap());

        auth.login_admin("Admin@QuickBuy.com", "admin123").unwrap();
        assert!(SessionStore::new(&store).is_admin().unwrap());
    }

    #[test]
    fn test_register_agent() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        let auth = AuthService::new(&store, &config.admin);

        let agent = auth
            .register_agent(new_agent("priya.shah", "s3cure-passw0rd"))
            .unwrap();
        assert_eq!(agent.id, AgentId::new(3));
        assert_eq!(agent.assigned_devices, 0);
        assert!(agent.password_hash.starts_with("$argon2"));

        let again = auth.authenticate_agent("priya.shah", "s3cure-passw0rd").unwrap();
        assert_eq!(again.id, agent.id);
    }

    #[test]
    fn test_register_rejects_weak_password_and_duplicates() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        let auth = AuthService::new(&store, &config.admin);

        assert!(matches!(
            auth.register_agent(new_agent("priya.shah", "short")),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            auth.register_agent(new_agent("sarah.mitchell", "long-enough-1")),
            Err(AuthError::UserAlreadyExists)
        ));
        assert_eq!(AgentRepository::new(&store).count().unwrap(), 2);
    }

    #[test]
    fn test_change_agent_password() {
        let store = RecordStore::in_memory();
        let config = StoreConfig::for_memory().unwrap();
        let auth = AuthService::new(&store, &config.admin);

        auth.change_agent_password(AgentId::new(1), "brand-new-pass").unwrap();
        assert!(auth.authenticate_agent("sarah.mitchell", "password123").is_err());
        assert!(auth.authenticate_agent("sarah.mitchell", "brand-new-pass").is_ok());
    }
}
