//! Credential loading for Blockflow
//!
//! Service-principal credentials come from exactly one of two sources:
//!
//! 1. A JSON key file mapping `CLIENT_ID`, `CLIENT_SECRET`, `TENANT_ID`
//!    and `SUBSCRIPTION_ID`
//! 2. Environment variables of the same names
//!
//! Supplying both sources (or neither) is a configuration error rather
//! than a silent precedence choice.

pub mod error;

pub use error::*;

use std::collections::HashMap;
use std::path::Path;

const CLIENT_ID: &str = "CLIENT_ID";
const CLIENT_SECRET: &str = "CLIENT_SECRET";
const TENANT_ID: &str = "TENANT_ID";
const SUBSCRIPTION_ID: &str = "SUBSCRIPTION_ID";

const FIELDS: [&str; 4] = [CLIENT_ID, CLIENT_SECRET, TENANT_ID, SUBSCRIPTION_ID];

/// Service-principal credentials for a cloud backend
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

// Keep the secret out of logs and error messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

impl Credentials {
    /// Load credentials from the key file if one is given, or from the
    /// environment otherwise.
    ///
    /// Exactly one source must be present: a key file alongside any of the
    /// credential environment variables is rejected as ambiguous, and no
    /// key file with a clean environment is rejected as missing.
    pub fn load(key_file: Option<&Path>) -> Result<Self> {
        let env_present = FIELDS.iter().any(|key| std::env::var(key).is_ok());

        match (key_file, env_present) {
            (Some(_), true) => Err(ConfigError::AmbiguousCredentials),
            (Some(path), false) => Self::from_key_file(path),
            (None, true) => Self::from_env(),
            (None, false) => Err(ConfigError::MissingCredentials),
        }
    }

    /// Read credentials from a JSON key file
    pub fn from_key_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let keys: HashMap<String, String> = serde_json::from_str(&content)?;
        Self::from_lookup(|key| keys.get(key).cloned())
    }

    /// Read credentials from the environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let field = |key: &str| match get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::MissingField(key.to_string())),
        };

        Ok(Self {
            client_id: field(CLIENT_ID)?,
            client_secret: field(CLIENT_SECRET)?,
            tenant_id: field(TENANT_ID)?,
            subscription_id: field(SUBSCRIPTION_ID)?,
        })
    }
}
