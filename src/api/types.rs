use serde::{Deserialize, Serialize};

use crate::db::UserRow;
use crate::services::{AlertSummary, LogSummary};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub username: String,
    pub groupname: Option<String>,
    pub priority: Option<i32>,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            groupname: row.groupname,
            priority: row.priority,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
    pub total_pages: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub groupname: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserDto {
    pub username: String,
    pub groupname: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedUserDto {
    pub username: String,
    pub removed_entries: u64,
}

/// A log view either carries lines or explains why it could not. A missing
/// source file is not an API failure; the console stays up and says so.
#[derive(Debug, Serialize)]
pub struct LogViewResponse {
    pub available: bool,
    pub lines: Vec<LogLineDto>,
    pub summary: LogSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogLineDto {
    pub text: String,
    pub class: crate::services::LogClass,
}

#[derive(Debug, Serialize)]
pub struct AlertFeedResponse {
    pub available: bool,
    pub alerts: Vec<crate::services::Alert>,
    pub summary: AlertSummary,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}
