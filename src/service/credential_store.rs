use crate::db::{BookStorage, DbUser};
use crate::error::BookwormError;
use crate::service::password::{hash_password, verify_password};
use tracing::{info, warn};

/// Registration and password checks over the `users` table.
/// Key derivation runs on the blocking pool, never on a runtime worker.
#[derive(Clone)]
pub struct CredentialStore {
    storage: BookStorage,
    iterations: u32,
}

impl CredentialStore {
    pub fn new(storage: BookStorage, iterations: u32) -> Self {
        Self {
            storage,
            iterations: iterations.max(1),
        }
    }

    /// Create a credential. Fails with `UserExists` if `username` is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<DbUser, BookwormError> {
        if username.trim().is_empty() {
            return Err(BookwormError::InvalidField {
                field: "username",
                reason: "must not be empty".to_string(),
            });
        }
        if password.is_empty() {
            return Err(BookwormError::InvalidField {
                field: "password",
                reason: "must not be empty".to_string(),
            });
        }
        let iterations = self.iterations;
        let password = password.to_string();
        let secret = tokio::task::spawn_blocking(move || hash_password(&password, iterations)).await?;
        let user = DbUser {
            username: username.to_string(),
            secret,
        };
        self.storage.insert_user(&user).await?;
        info!(username, "registered user");
        Ok(user)
    }

    /// `UserNotFound` when absent, `PasswordMismatch` when the hash differs.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<DbUser, BookwormError> {
        let Some(user) = self.storage.get_user(username).await? else {
            warn!(username, "login for unknown user");
            return Err(BookwormError::UserNotFound(username.to_string()));
        };
        let password = password.to_string();
        let secret = user.secret.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &secret)).await?;
        if !matches {
            warn!(username, "login with wrong password");
            return Err(BookwormError::PasswordMismatch(username.to_string()));
        }
        Ok(user)
    }

    /// Whether a session's username still resolves to a stored credential.
    pub async fn exists(&self, username: &str) -> Result<bool, BookwormError> {
        Ok(self.storage.get_user(username).await?.is_some())
    }
}
