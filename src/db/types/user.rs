use serde::Serialize;
use tokio_postgres::Row;

/// A row of the `users` table
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// bcrypt digest, never serialized
    pub password: String,
    pub role: String,
}

impl User {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            username: row.get("username"),
            password: row.get("password"),
            role: row.get("role"),
        }
    }

    /// Public view of the user without the password digest
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

/// User fields safe to return to clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub role: String,
}
