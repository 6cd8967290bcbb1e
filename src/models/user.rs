//! Public user representation and role/status names.
//!
//! Roles and statuses are stored as text and compared case-insensitively;
//! these constants are the canonical spellings.

use serde::Serialize;

use crate::db::UserRecord;

pub const ROLE_MEMBER: &str = "Member";
pub const ROLE_MODERATOR: &str = "Moderator";
pub const ROLE_ADMIN: &str = "Admin";

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_DISABLED: &str = "Disabled";

/// User as exposed over the API. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub status: String,
    pub role: String,
    pub created_at: String,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id.to_string(),
            username: r.username,
            status: r.status,
            role: r.role_name,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}
