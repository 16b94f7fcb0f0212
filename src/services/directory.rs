use regex::Regex;
use thiserror::Error;

use crate::config::DirectoryConfig;
use crate::db::{InsertOutcome, Store, UserRow};
use crate::services::audit::{AuditLog, AuditStatus};

/// Business errors of the user directory. Everything here is an expected,
/// per-request outcome; only `Store` indicates operational trouble.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("User '{username}' already exists")]
    AlreadyExists { username: String },

    #[error("User '{username}' not found")]
    NotFound { username: String },

    #[error("Deletion requires explicit confirmation")]
    ConfirmationRequired,

    #[error("Credential store unavailable: {0}")]
    Store(#[from] sea_orm::DbErr),
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub groupname: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub username: String,
    pub groupname: String,
}

#[derive(Debug)]
pub struct UserListing {
    pub users: Vec<UserRow>,
    pub total_pages: u64,
}

/// Create / delete / list use cases over the credential store, with input
/// validation up front and an audit entry per decided request.
#[derive(Clone)]
pub struct UserDirectoryService {
    store: Store,
    rules: DirectoryConfig,
    email_pattern: Regex,
    audit: AuditLog,
}

impl UserDirectoryService {
    pub fn new(store: Store, rules: DirectoryConfig, audit: AuditLog) -> anyhow::Result<Self> {
        let email_pattern = Regex::new(&rules.email_pattern)?;
        Ok(Self {
            store,
            rules,
            email_pattern,
            audit,
        })
    }

    pub async fn create_user(&self, req: NewUser) -> Result<CreatedUser, DirectoryError> {
        let username = req.username.trim().to_string();
        let password = req.password.trim().to_string();
        let password_confirm = req.password_confirm.trim();
        let groupname = req
            .groupname
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(&self.rules.default_group)
            .to_string();

        if let Err(e) = self.validate_new_user(&username, &password, password_confirm) {
            self.audit.record(
                "user_create",
                &username,
                AuditStatus::Failure,
                Some(&e.to_string()),
            );
            return Err(e);
        }

        if self.store.user_exists(&username).await? {
            self.audit.record(
                "user_create",
                &username,
                AuditStatus::Failure,
                Some("already exists"),
            );
            return Err(DirectoryError::AlreadyExists { username });
        }

        // The existence check above races with concurrent creates; the
        // unique index on radcheck is the arbiter and the loser surfaces
        // here as a duplicate.
        match self
            .store
            .insert_user(&username, &password, &groupname)
            .await?
        {
            InsertOutcome::Created => {}
            InsertOutcome::DuplicateUsername => {
                self.audit.record(
                    "user_create",
                    &username,
                    AuditStatus::Failure,
                    Some("already exists"),
                );
                return Err(DirectoryError::AlreadyExists { username });
            }
        }

        self.audit.record(
            "user_create",
            &username,
            AuditStatus::Success,
            Some(&format!("group: {groupname}")),
        );

        Ok(CreatedUser {
            username,
            groupname,
        })
    }

    pub async fn delete_user(&self, username: &str, confirmed: bool) -> Result<u64, DirectoryError> {
        let username = username.trim();

        if username.is_empty() {
            return Err(DirectoryError::Validation {
                field: "username",
                message: "Username is required".to_string(),
            });
        }

        if !confirmed {
            self.audit.record(
                "user_delete",
                username,
                AuditStatus::Failure,
                Some("confirmation missing"),
            );
            return Err(DirectoryError::ConfirmationRequired);
        }

        if !self.store.user_exists(username).await? {
            self.audit
                .record("user_delete", username, AuditStatus::Failure, Some("not found"));
            return Err(DirectoryError::NotFound {
                username: username.to_string(),
            });
        }

        let removed = self.store.delete_user(username).await?;

        self.audit.record(
            "user_delete",
            username,
            AuditStatus::Success,
            Some(&format!("credentials removed: {removed}")),
        );

        Ok(removed)
    }

    /// Read-only listing; `page` is 1-based, `None` returns everything.
    pub async fn list_users(&self, page: Option<u64>) -> Result<UserListing, DirectoryError> {
        match page {
            Some(page) => {
                let (users, total_pages) = self
                    .store
                    .list_users_page(page.max(1), self.rules.page_size)
                    .await?;
                Ok(UserListing { users, total_pages })
            }
            None => {
                let users = self.store.list_users().await?;
                Ok(UserListing {
                    users,
                    total_pages: 1,
                })
            }
        }
    }

    fn validate_new_user(
        &self,
        username: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), DirectoryError> {
        if username.is_empty() {
            return Err(DirectoryError::Validation {
                field: "username",
                message: "Username is required".to_string(),
            });
        }

        if !self.email_pattern.is_match(username) {
            return Err(DirectoryError::Validation {
                field: "username",
                message: format!(
                    "Username must match the required pattern: {}",
                    self.rules.email_pattern
                ),
            });
        }

        if password.is_empty() {
            return Err(DirectoryError::Validation {
                field: "password",
                message: "Password is required".to_string(),
            });
        }

        if password.len() < self.rules.min_password_length {
            return Err(DirectoryError::Validation {
                field: "password",
                message: format!(
                    "Password must contain at least {} characters",
                    self.rules.min_password_length
                ),
            });
        }

        if password != password_confirm {
            return Err(DirectoryError::Validation {
                field: "password_confirm",
                message: "Passwords do not match".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_rules() -> DirectoryConfig {
        DirectoryConfig::default()
    }

    fn validator() -> UserDirectoryService {
        // Validation is pure; the store behind it is never touched here.
        let rules = service_rules();
        let pattern = Regex::new(&rules.email_pattern).unwrap();
        UserDirectoryService {
            store: Store {
                conn: sea_orm::DatabaseConnection::Disconnected,
            },
            rules,
            email_pattern: pattern,
            audit: AuditLog::new("/nonexistent", false),
        }
    }

    #[test]
    fn test_validation_order_username_first() {
        let svc = validator();

        let err = svc.validate_new_user("", "Secret123", "Secret123").unwrap_err();
        assert!(matches!(err, DirectoryError::Validation { field: "username", .. }));

        let err = svc
            .validate_new_user("alice@elsewhere.org", "Secret123", "Secret123")
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Validation { field: "username", .. }));
    }

    #[test]
    fn test_password_rules() {
        let svc = validator();

        let err = svc.validate_new_user("alice@gym.fr", "", "").unwrap_err();
        assert!(matches!(err, DirectoryError::Validation { field: "password", .. }));

        let err = svc
            .validate_new_user("alice@gym.fr", "short", "short")
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Validation { field: "password", .. }));

        let err = svc
            .validate_new_user("alice@gym.fr", "Secret123", "Secret124")
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Validation {
                field: "password_confirm",
                ..
            }
        ));
    }

    #[test]
    fn test_valid_input_passes() {
        let svc = validator();
        assert!(svc
            .validate_new_user("alice@gym.fr", "Secret123", "Secret123")
            .is_ok());
    }
}
