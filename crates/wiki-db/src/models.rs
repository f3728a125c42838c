//! Database row types — these map directly to SQLite rows.
//! Distinct from wiki-types models to keep the password hash inside the DB layer.

use chrono::{DateTime, Utc};
use wiki_types::models::User;

pub struct UserRow {
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            username: row.username,
            created_at: row.created_at,
        }
    }
}
