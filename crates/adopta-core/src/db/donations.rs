//! Donation operations

use chrono::Utc;
use rusqlite::{params, Row};

use super::pets::invalid_column;
use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Donation, DonationStatus, NewDonation};

const DONATION_COLUMNS: &str = "id, user_id, amount, donor_name, donor_email, message, \
     status, payment_method, transaction_id, created_at";

fn row_to_donation(row: &Row<'_>) -> rusqlite::Result<Donation> {
    let status: String = row.get(6)?;
    let created_at: String = row.get(9)?;

    Ok(Donation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        donor_name: row.get(3)?,
        donor_email: row.get(4)?,
        message: row.get(5)?,
        status: status.parse().map_err(|e: String| invalid_column(6, e))?,
        payment_method: row.get(7)?,
        transaction_id: row.get(8)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Insert a donation, returning its id
    pub fn create_donation(&self, donation: &NewDonation) -> Result<i64> {
        if !donation.amount.is_finite() || donation.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Invalid donation amount: {}",
                donation.amount
            )));
        }

        let conn = self.conn()?;
        let created_at = format_datetime(&donation.created_at.unwrap_or_else(Utc::now));

        conn.execute(
            r#"
            INSERT INTO donations (user_id, amount, donor_name, donor_email, message,
                                   status, payment_method, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                donation.user_id,
                donation.amount,
                donation.donor_name,
                donation.donor_email,
                donation.message,
                donation.status.as_str(),
                donation.payment_method,
                created_at,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Most recent donations, optionally only those with `status`
    pub fn list_recent_donations(
        &self,
        status: Option<DonationStatus>,
        limit: i64,
    ) -> Result<Vec<Donation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM donations WHERE (?1 IS NULL OR status = ?1) \
             ORDER BY created_at DESC, id DESC LIMIT ?2",
            DONATION_COLUMNS
        ))?;

        let donations = stmt
            .query_map(params![status.map(|s| s.as_str()), limit], row_to_donation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(donations)
    }
}
