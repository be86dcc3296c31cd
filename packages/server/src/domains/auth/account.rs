use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single admin account for a deployment, seeded out-of-band by the
/// `create_admin` binary. Only the bcrypt hash is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

impl AdminAccount {
    /// Create a new account, hashing the password.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        let password_hash =
            bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
        })
    }

    /// Check a candidate password against the stored hash. A malformed hash
    /// counts as a failed check, not an error.
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
