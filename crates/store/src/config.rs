//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `QUICKBUY_STORAGE` - Backend: `file` (default) or `memory`
//! - `QUICKBUY_DATA_DIR` - Directory for the file backend (default: ./quickbuy-data)
//! - `QUICKBUY_QUOTA_BYTES` - Byte quota for stored values (default: unlimited)
//! - `QUICKBUY_ADMIN_EMAIL` - Admin login email
//! - `QUICKBUY_ADMIN_PASSWORD` - Admin login password
//!
//! The two admin variables go together. With neither set the demo admin
//! (`admin@quickbuy.com` / `admin123`) is used and a warning is logged.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use quickbuy_core::Email;

use crate::services::auth::hash_password;

const DEFAULT_DATA_DIR: &str = "./quickbuy-data";
const DEMO_ADMIN_EMAIL: &str = "admin@quickbuy.com";
const DEMO_ADMIN_PASSWORD: &str = "admin123";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which key-value backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// One JSON file per key in the data directory.
    #[default]
    File,
    /// Process-local map; nothing survives exit.
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "fs" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            _ => Err(format!("expected 'file' or 'memory', got '{s}'")),
        }
    }
}

/// Admin login credentials.
///
/// The password is hashed as soon as it is read. Implements `Debug` manually
/// to redact the hash.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Admin login email
    pub email: Email,
    /// Argon2 PHC string of the admin password
    pub password_hash: SecretString,
    /// Whether these are the built-in demo credentials
    pub is_demo: bool,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("is_demo", &self.is_demo)
            .finish()
    }
}

impl AdminCredentials {
    /// Hash `password` and pair it with `email`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the password cannot be hashed.
    pub fn new(email: Email, password: &SecretString) -> Result<Self, ConfigError> {
        let hash = hash_password(password.expose_secret()).map_err(|e| {
            ConfigError::InvalidEnvVar("QUICKBUY_ADMIN_PASSWORD".to_string(), e.to_string())
        })?;
        Ok(Self {
            email,
            password_hash: SecretString::from(hash),
            is_demo: false,
        })
    }

    /// The built-in demo admin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the demo password cannot be hashed.
    pub fn demo() -> Result<Self, ConfigError> {
        let email = Email::parse(DEMO_ADMIN_EMAIL).map_err(|e| {
            ConfigError::InvalidEnvVar("QUICKBUY_ADMIN_EMAIL".to_string(), e.to_string())
        })?;
        let mut credentials = Self::new(email, &SecretString::from(DEMO_ADMIN_PASSWORD))?;
        credentials.is_demo = true;
        Ok(credentials)
    }
}

/// Quickbuy store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend to open
    pub storage: StorageKind,
    /// Data directory for the file backend
    pub data_dir: PathBuf,
    /// Optional byte quota over all stored values
    pub quota_bytes: Option<usize>,
    /// Admin login
    pub admin: AdminCredentials,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or only one of the admin
    /// variables is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let storage = vars
            .get_or_default("QUICKBUY_STORAGE", "file")
            .parse::<StorageKind>()
            .map_err(|e| ConfigError::InvalidEnvVar("QUICKBUY_STORAGE".to_string(), e))?;
        let data_dir = PathBuf::from(vars.get_or_default("QUICKBUY_DATA_DIR", DEFAULT_DATA_DIR));
        let quota_bytes = vars
            .get_optional("QUICKBUY_QUOTA_BYTES")
            .map(|raw| {
                raw.trim().parse::<usize>().map_err(|e| {
                    ConfigError::InvalidEnvVar("QUICKBUY_QUOTA_BYTES".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let admin = admin_from_vars(&vars)?;

        Ok(Self {
            storage,
            data_dir,
            quota_bytes,
            admin,
        })
    }

    /// In-memory configuration with the demo admin, for tests and scratch runs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the demo password cannot be hashed.
    pub fn for_memory() -> Result<Self, ConfigError> {
        Ok(Self {
            storage: StorageKind::Memory,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            quota_bytes: None,
            admin: AdminCredentials::demo()?,
        })
    }
}

fn admin_from_vars<F>(vars: &Vars<F>) -> Result<AdminCredentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let email = vars.get_optional("QUICKBUY_ADMIN_EMAIL");
    let password = vars.get_optional("QUICKBUY_ADMIN_PASSWORD").map(SecretString::from);

    match (email, password) {
        (None, None) => {
            tracing::warn!(
                email = DEMO_ADMIN_EMAIL,
                "QUICKBUY_ADMIN_EMAIL/QUICKBUY_ADMIN_PASSWORD not set, using demo admin credentials"
            );
            AdminCredentials::demo()
        }
        (Some(email), Some(password)) => {
            let email = Email::parse(&email).map_err(|e| {
                ConfigError::InvalidEnvVar("QUICKBUY_ADMIN_EMAIL".to_string(), e.to_string())
            })?;
            AdminCredentials::new(email, &password)
        }
        (Some(_), None) => Err(ConfigError::MissingEnvVar(
            "QUICKBUY_ADMIN_PASSWORD".to_string(),
        )),
        (None, Some(_)) => Err(ConfigError::MissingEnvVar(
            "QUICKBUY_ADMIN_EMAIL".to_string(),
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get an optional variable. Empty values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }
}
