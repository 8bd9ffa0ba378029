//! Credential boundary over the key-value storage collaborator.
//!
//! Deliberately thin: credentials are stored as-is under `user_<name>` keys
//! and login is a plain string comparison, matching the system this engine
//! backs. Hardening the credential store is a separate concern.

use crate::error::{Result, TaskflowError};
use crate::storage::{self, BoardStore, Storage};
use chrono::{DateTime, Utc};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub last_login: DateTime<Utc>,
}

pub struct AuthService<S: Storage> {
    storage: S,
}

impl<S: Storage> AuthService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Registers a new account. Usernames need at least three characters,
    /// passwords at least six.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        let password = password.trim();
        if username.len() < MIN_USERNAME_LEN {
            return Err(TaskflowError::InvalidUsername(format!(
                "must be at least {} characters",
                MIN_USERNAME_LEN
            )));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(TaskflowError::InvalidPassword(format!(
                "must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let key = storage::user_key(username);
        if self.storage.get(&key).await?.is_some() {
            return Err(TaskflowError::UsernameTaken(username.to_string()));
        }
        self.storage.set(&key, password).await
    }

    /// Authenticates against the stored credential.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(TaskflowError::InvalidCredentials);
        }
        match self.storage.get(&storage::user_key(username)).await? {
            Some(stored) if stored == password => Ok(User {
                username: username.to_string(),
                last_login: Utc::now(),
            }),
            _ => Err(TaskflowError::InvalidCredentials),
        }
    }
}

/// Logs a user out, dropping their persisted board.
///
/// The wipe is intentional: the current product treats logout as "clear my
/// board", and callers are expected to confirm before invoking this.
pub async fn logout<S: Storage>(store: &BoardStore<S>, username: &str) -> Result<()> {
    store.clear(username).await
}
