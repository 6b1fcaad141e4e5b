//! Read-only statistics for the stats endpoints

use chrono::{Datelike, Utc};
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{
    AdoptionStats, DonationStats, DonationStatus, MonthlyTotal, PetStats, SpeciesCount,
};

/// Number of recent rows included in each stats payload
pub const RECENT_LIMIT: i64 = 5;

impl Database {
    pub fn pet_stats(&self) -> Result<PetStats> {
        let conn = self.conn()?;

        let (total_pets, available_pets, adopted_pets) = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(status = 'disponible'), 0),
                   COALESCE(SUM(status = 'adoptado'), 0)
            FROM pets
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT species, COUNT(*) AS count FROM pets GROUP BY species ORDER BY count DESC, species",
        )?;
        let pets_by_species = stmt
            .query_map([], |row| {
                Ok(SpeciesCount {
                    species: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(PetStats {
            total_pets,
            available_pets,
            adopted_pets,
            pets_by_species,
        })
    }

    pub fn adoption_stats(&self) -> Result<AdoptionStats> {
        let (total_adoptions, pending_adoptions, approved_adoptions, completed_adoptions) = {
            let conn = self.conn()?;
            conn.query_row(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(status = 'pendiente'), 0),
                       COALESCE(SUM(status = 'aprobada'), 0),
                       COALESCE(SUM(status = 'completada'), 0)
                FROM adoptions
                "#,
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?
        };

        let recent_adoptions = self.list_recent_adoptions(RECENT_LIMIT)?;

        Ok(AdoptionStats {
            total_adoptions,
            pending_adoptions,
            approved_adoptions,
            completed_adoptions,
            recent_adoptions,
        })
    }

    pub fn donation_stats(&self) -> Result<DonationStats> {
        let (total_donations, total_amount, pending_donations) = {
            let conn = self.conn()?;
            conn.query_row(
                r#"
                SELECT COALESCE(SUM(status = 'completada'), 0),
                       COALESCE(SUM(CASE WHEN status = 'completada' THEN amount END), 0.0),
                       COALESCE(SUM(status = 'pendiente'), 0)
                FROM donations
                "#,
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?
        };

        let recent_donations =
            self.list_recent_donations(Some(DonationStatus::Completed), RECENT_LIMIT)?;

        let conn = self.conn()?;
        let year = Utc::now().year().to_string();
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(strftime('%m', created_at) AS INTEGER) AS month, SUM(amount)
            FROM donations
            WHERE status = 'completada' AND strftime('%Y', created_at) = ?
            GROUP BY month
            ORDER BY month
            "#,
        )?;
        let monthly_donations = stmt
            .query_map(params![year], |row| {
                Ok(MonthlyTotal {
                    month: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(DonationStats {
            total_donations,
            total_amount,
            pending_donations,
            recent_donations,
            monthly_donations,
        })
    }
}
