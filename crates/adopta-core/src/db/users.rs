//! User operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewUser, User};

impl Database {
    /// Insert a user, returning its id
    pub fn create_user(&self, user: &NewUser) -> Result<i64> {
        let conn = self.conn()?;
        let created_at = format_datetime(&user.created_at.unwrap_or_else(Utc::now));

        conn.execute(
            "INSERT INTO users (name, email, google_id, created_at) VALUES (?, ?, ?, ?)",
            params![user.name, user.email, user.google_id, created_at],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Look up a user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;

        let user = conn
            .query_row(
                "SELECT id, name, email, google_id, created_at FROM users WHERE email = ?",
                params![email],
                |row| {
                    let created_at: String = row.get(4)?;
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        google_id: row.get(3)?,
                        created_at: parse_datetime(&created_at),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}
