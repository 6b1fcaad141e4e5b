//! Aggregation queries feeding the insight engine

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rusqlite::params;
use tracing::debug;

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::insights::snapshot::{
    AdoptionCounts, DonationCounts, PetCounts, SystemMetrics, SystemSnapshot, UserCounts,
};
use crate::models::{
    AdoptionMetrics, AnomalyScan, DailyCount, DonationOutlier, HeavyUser, PopularCharacteristic,
};

/// Days counted as "recent" in the snapshot
pub const RECENT_WINDOW_DAYS: i64 = 7;
/// Days scanned for anomalous rows
pub const SCAN_WINDOW_DAYS: i64 = 30;
/// A day is unusual when its adoptions exceed this multiple of the daily mean
pub const DAILY_SPIKE_MULTIPLIER: f64 = 2.0;
/// A donation is an outlier when it exceeds this multiple of the mean donation
pub const DONATION_OUTLIER_MULTIPLIER: f64 = 5.0;
/// Users with more adoption requests than this are flagged
pub const HEAVY_ADOPTER_THRESHOLD: i64 = 5;
/// Users with more donations than this are flagged
pub const HEAVY_DONOR_THRESHOLD: i64 = 10;
/// Number of pet profiles listed as popular
pub const POPULAR_LIMIT: i64 = 10;

fn days_ago(days: i64) -> String {
    format_datetime(&(Utc::now() - Duration::days(days)))
}

impl Database {
    /// Compute the aggregate snapshot from the current rows
    pub fn collect_snapshot(&self) -> Result<SystemSnapshot> {
        let conn = self.conn()?;
        let since = days_ago(RECENT_WINDOW_DAYS);

        let mut pets = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(status = 'disponible'), 0),
                   COALESCE(SUM(status = 'adoptado'), 0),
                   COALESCE(SUM(status = 'en_proceso'), 0)
            FROM pets
            "#,
            [],
            |row| {
                Ok(PetCounts {
                    total: row.get(0)?,
                    available: row.get(1)?,
                    adopted: row.get(2)?,
                    in_process: row.get(3)?,
                    by_species: Default::default(),
                })
            },
        )?;

        let mut stmt = conn.prepare("SELECT species, COUNT(*) FROM pets GROUP BY species")?;
        let species = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        for entry in species {
            let (name, count) = entry?;
            pets.by_species.insert(name, count);
        }

        let adoptions = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(status = 'pendiente'), 0),
                   COALESCE(SUM(status = 'aprobada'), 0),
                   COALESCE(SUM(status = 'completada'), 0),
                   COALESCE(SUM(status = 'rechazada'), 0),
                   COALESCE(SUM(created_at >= ?1), 0)
            FROM adoptions
            "#,
            params![since],
            |row| {
                Ok(AdoptionCounts {
                    total: row.get(0)?,
                    pending: row.get(1)?,
                    approved: row.get(2)?,
                    completed: row.get(3)?,
                    rejected: row.get(4)?,
                    recent_trend: row.get(5)?,
                })
            },
        )?;

        let donations = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN status = 'completada' THEN amount END), 0.0),
                   COALESCE(SUM(created_at >= ?1), 0),
                   COALESCE(AVG(CASE WHEN status = 'completada' THEN amount END), 0.0)
            FROM donations
            "#,
            params![since],
            |row| {
                Ok(DonationCounts {
                    total: row.get(0)?,
                    total_amount: row.get(1)?,
                    recent_donations: row.get(2)?,
                    average_donation: row.get(3)?,
                })
            },
        )?;

        let (users, last_activity) = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(created_at >= ?1), 0),
                   COALESCE(SUM(google_id IS NOT NULL), 0),
                   MAX(created_at)
            FROM users
            "#,
            params![since],
            |row| {
                let last: Option<String> = row.get(3)?;
                Ok((
                    UserCounts {
                        total: row.get(0)?,
                        recent_registrations: row.get(1)?,
                        google_users: row.get(2)?,
                    },
                    last,
                ))
            },
        )?;
        drop(stmt);
        drop(conn);

        let snapshot = SystemSnapshot {
            pets,
            adoptions,
            donations,
            users,
            system_metrics: SystemMetrics {
                database_size_bytes: self.size_bytes()?,
                last_activity: last_activity.as_deref().map(parse_datetime),
            },
        };

        debug!(
            pets = snapshot.pets.total,
            adoptions = snapshot.adoptions.total,
            donations = snapshot.donations.total,
            users = snapshot.users.total,
            "Snapshot collected"
        );
        Ok(snapshot)
    }

    /// Success rate, adoption time, popular profiles and monthly trend
    pub fn adoption_metrics(&self) -> Result<AdoptionMetrics> {
        let conn = self.conn()?;

        let (total, completed): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(status = 'completada'), 0) FROM adoptions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let adoption_success_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        // Whole calendar days between request and completion
        let average_adoption_time: Option<f64> = conn.query_row(
            r#"
            SELECT AVG(julianday(date(completed_at)) - julianday(date(created_at)))
            FROM adoptions
            WHERE completed_at IS NOT NULL
            "#,
            [],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(
            r#"
            SELECT species, breed, size, COUNT(*) AS adopted_count
            FROM pets
            WHERE status = 'adoptado'
            GROUP BY species, breed, size
            ORDER BY adopted_count DESC, species, breed, size
            LIMIT ?
            "#,
        )?;
        let popular_pet_characteristics = stmt
            .query_map(params![POPULAR_LIMIT], |row| {
                Ok(PopularCharacteristic {
                    species: row.get(0)?,
                    breed: row.get(1)?,
                    size: row.get(2)?,
                    adopted_count: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let year = Utc::now().year().to_string();
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(strftime('%m', created_at) AS INTEGER) AS month, COUNT(*)
            FROM adoptions
            WHERE strftime('%Y', created_at) = ?
            GROUP BY month
            ORDER BY month
            "#,
        )?;
        let seasonal_trends = stmt
            .query_map(params![year], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(AdoptionMetrics {
            adoption_success_rate,
            average_adoption_time: average_adoption_time.unwrap_or(0.0),
            popular_pet_characteristics,
            seasonal_trends,
        })
    }

    /// Row-level evidence: busy days, outsized donations, heavy users
    pub fn anomaly_scan(&self) -> Result<AnomalyScan> {
        let conn = self.conn()?;
        let since = days_ago(SCAN_WINDOW_DAYS);

        let mut stmt = conn.prepare(
            r#"
            SELECT date(created_at) AS day, COUNT(*)
            FROM adoptions
            WHERE created_at >= ?
            GROUP BY day
            ORDER BY day
            "#,
        )?;
        let daily = stmt
            .query_map(params![since], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let unusual_adoption_patterns = if daily.is_empty() {
            Vec::new()
        } else {
            let mean = daily.iter().map(|(_, c)| *c as f64).sum::<f64>() / daily.len() as f64;
            let threshold = mean * DAILY_SPIKE_MULTIPLIER;
            daily
                .into_iter()
                .filter(|(_, count)| *count as f64 > threshold)
                .filter_map(|(day, count)| {
                    NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                        .ok()
                        .map(|date| DailyCount { date, count })
                })
                .collect()
        };

        let mean_donation: Option<f64> =
            conn.query_row("SELECT AVG(amount) FROM donations", [], |row| row.get(0))?;
        let donation_anomalies = match mean_donation {
            Some(mean) => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, amount, created_at
                    FROM donations
                    WHERE amount > ? AND created_at >= ?
                    ORDER BY created_at DESC, id DESC
                    "#,
                )?;
                let rows = stmt
                    .query_map(params![mean * DONATION_OUTLIER_MULTIPLIER, since], |row| {
                        let created_at: String = row.get(2)?;
                        Ok(DonationOutlier {
                            id: row.get(0)?,
                            amount: row.get(1)?,
                            created_at: parse_datetime(&created_at),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => Vec::new(),
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, adoptions_count, donations_count FROM (
                SELECT u.id, u.name,
                       (SELECT COUNT(*) FROM adoptions a WHERE a.user_id = u.id) AS adoptions_count,
                       (SELECT COUNT(*) FROM donations d WHERE d.user_id = u.id) AS donations_count
                FROM users u
            )
            WHERE adoptions_count > ?1 OR donations_count > ?2
            ORDER BY id
            "#,
        )?;
        let user_behavior_anomalies = stmt
            .query_map(
                params![HEAVY_ADOPTER_THRESHOLD, HEAVY_DONOR_THRESHOLD],
                |row| {
                    Ok(HeavyUser {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        adoptions_count: row.get(2)?,
                        donations_count: row.get(3)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(AnomalyScan {
            unusual_adoption_patterns,
            donation_anomalies,
            user_behavior_anomalies,
        })
    }
}
