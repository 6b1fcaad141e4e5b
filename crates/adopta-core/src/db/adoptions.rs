//! Adoption request operations

use chrono::Utc;
use rusqlite::{params, Row};

use super::pets::invalid_column;
use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Adoption, AdoptionStatus, NewAdoption};

pub(crate) const ADOPTION_COLUMNS: &str =
    "id, user_id, pet_id, status, message, admin_notes, approved_at, completed_at, created_at";

pub(crate) fn row_to_adoption(row: &Row<'_>) -> rusqlite::Result<Adoption> {
    let status: String = row.get(3)?;
    let approved_at: Option<String> = row.get(6)?;
    let completed_at: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Adoption {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pet_id: row.get(2)?,
        status: status.parse().map_err(|e: String| invalid_column(3, e))?,
        message: row.get(4)?,
        admin_notes: row.get(5)?,
        approved_at: approved_at.as_deref().map(parse_datetime),
        completed_at: completed_at.as_deref().map(parse_datetime),
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Insert an adoption request, returning its id
    pub fn create_adoption(&self, adoption: &NewAdoption) -> Result<i64> {
        let conn = self.conn()?;
        let created_at = format_datetime(&adoption.created_at.unwrap_or_else(Utc::now));
        let completed_at = adoption.completed_at.as_ref().map(format_datetime);

        conn.execute(
            r#"
            INSERT INTO adoptions (user_id, pet_id, status, message, completed_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                adoption.user_id,
                adoption.pet_id,
                adoption.status.as_str(),
                adoption.message,
                completed_at,
                created_at,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Move an adoption request to a new status, stamping approval/completion times
    pub fn update_adoption_status(
        &self,
        adoption_id: i64,
        status: AdoptionStatus,
        admin_notes: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn()?;
        let now = format_datetime(&Utc::now());

        let updated = conn.execute(
            r#"
            UPDATE adoptions SET
                status = ?1,
                admin_notes = COALESCE(?2, admin_notes),
                approved_at = CASE WHEN ?1 = 'aprobada' THEN ?3 ELSE approved_at END,
                completed_at = CASE WHEN ?1 = 'completada' THEN ?3 ELSE completed_at END
            WHERE id = ?4
            "#,
            params![status.as_str(), admin_notes, now, adoption_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Adoption {} not found", adoption_id)));
        }
        Ok(())
    }

    /// Most recent adoption requests
    pub fn list_recent_adoptions(&self, limit: i64) -> Result<Vec<Adoption>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM adoptions ORDER BY created_at DESC, id DESC LIMIT ?",
            ADOPTION_COLUMNS
        ))?;

        let adoptions = stmt
            .query_map(params![limit], row_to_adoption)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(adoptions)
    }
}
