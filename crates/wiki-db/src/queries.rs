use crate::Database;
use crate::migrations::NOW;
use crate::models::UserRow;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use tracing::{debug, info};
use wiki_crypto::hash_password;
use wiki_types::models::{Page, PageSummary, Profile, User};
use wiki_types::{RegisterOutcome, WriteOutcome};

impl Database {
    // -- Users --

    /// Store a new account. A taken username is an outcome, not an error.
    pub fn register(&self, username: &str, password: &str) -> Result<RegisterOutcome> {
        let password_hash = hash_password(password);
        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, &password_hash),
            ) {
                Ok(_) => {
                    info!("Registered user {}", username);
                    Ok(RegisterOutcome::Created)
                }
                Err(e) if is_constraint_violation(&e) => {
                    debug!("Registration rejected, username {} is taken", username);
                    Ok(RegisterOutcome::AlreadyExists)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Exact match on (username, hash). Unknown user and wrong password look the same.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let password_hash = hash_password(password);
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT username, password, created_at FROM users
                     WHERE username = ?1 AND password = ?2",
                    (username, &password_hash),
                    map_user_row,
                )
                .optional()?;
            Ok(row.map(User::from))
        })
    }

    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| Ok(query_user(conn, username)?.map(User::from)))
    }

    pub fn user_count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    // -- Profiles --

    /// Replace the profile row for `username`. Callers decide who may write it.
    pub fn upsert_profile(&self, username: &str, description: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "REPLACE INTO profiles (username, description) VALUES (?1, ?2)",
                (username, description),
            )?;
            Ok(())
        })?;
        info!("Profile updated for {}", username);
        Ok(())
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT username, description FROM profiles ORDER BY rowid")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(Profile {
                        username: row.get(0)?,
                        description: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_profile(&self, username: &str) -> Result<Option<Profile>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT username, description FROM profiles WHERE username = ?1",
                    [username],
                    |row| {
                        Ok(Profile {
                            username: row.get(0)?,
                            description: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Pages --

    /// Insert a page. An existing title is left untouched.
    pub fn create_page(&self, title: &str, content: &str, author: &str) -> Result<WriteOutcome> {
        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO pages (title, content, author) VALUES (?1, ?2, ?3)",
                (title, content, author),
            ) {
                Ok(_) => {
                    info!("Page '{}' created by {}", title, author);
                    Ok(WriteOutcome::Applied)
                }
                Err(e) if is_constraint_violation(&e) => {
                    debug!("Page '{}' already exists", title);
                    Ok(WriteOutcome::AlreadyExists)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Overwrite content and author and bump `updated_at`, which never moves backwards.
    pub fn update_page(&self, title: &str, content: &str, author: &str) -> Result<WriteOutcome> {
        let sql = format!(
            "UPDATE pages
             SET content = ?1, author = ?2, updated_at = MAX(updated_at, {NOW})
             WHERE title = ?3"
        );
        let changed = self.with_conn_mut(|conn| Ok(conn.execute(&sql, (content, author, title))?))?;

        if changed == 0 {
            debug!("Update of missing page '{}' ignored", title);
            return Ok(WriteOutcome::NotFound);
        }
        info!("Page '{}' updated by {}", title, author);
        Ok(WriteOutcome::Applied)
    }

    /// Most recently touched first.
    pub fn list_pages(&self) -> Result<Vec<PageSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT title, author, updated_at FROM pages ORDER BY updated_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(PageSummary {
                        title: row.get(0)?,
                        author: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_page(&self, title: &str) -> Result<Option<Page>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, title, content, author, created_at, updated_at
                     FROM pages WHERE title = ?1",
                    [title],
                    |row| {
                        Ok(Page {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            content: row.get(2)?,
                            author: row.get(3)?,
                            created_at: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_page(&self, title: &str) -> Result<WriteOutcome> {
        let changed = self.with_conn_mut(|conn| {
            Ok(conn.execute("DELETE FROM pages WHERE title = ?1", params![title])?)
        })?;

        if changed == 0 {
            debug!("Delete of missing page '{}' ignored", title);
            return Ok(WriteOutcome::NotFound);
        }
        info!("Page '{}' deleted", title);
        Ok(WriteOutcome::Applied)
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt.query_row([username], map_user_row).optional()?;

    Ok(row)
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        username: row.get(0)?,
        password: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation))
}
