//! The aggregate snapshot every generator reads from
//!
//! Every counter defaults to zero so partially-populated JSON (or a
//! brand-new database) still yields a usable snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::round1;

/// Aggregate counts over pets, adoptions, donations and users
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSnapshot {
    pub pets: PetCounts,
    pub adoptions: AdoptionCounts,
    pub donations: DonationCounts,
    pub users: UserCounts,
    pub system_metrics: SystemMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetCounts {
    pub total: i64,
    pub available: i64,
    pub adopted: i64,
    pub in_process: i64,
    pub by_species: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdoptionCounts {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub completed: i64,
    pub rejected: i64,
    /// Requests created in the last 7 days
    pub recent_trend: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationCounts {
    /// Number of donations, any status
    pub total: i64,
    /// Sum of completed donations
    pub total_amount: f64,
    /// Donations created in the last 7 days
    pub recent_donations: i64,
    /// Mean of completed donations, 0 when there are none
    pub average_donation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCounts {
    pub total: i64,
    /// Users registered in the last 7 days
    pub recent_registrations: i64,
    pub google_users: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMetrics {
    pub database_size_bytes: i64,
    /// Most recent user registration
    pub last_activity: Option<DateTime<Utc>>,
}

impl SystemSnapshot {
    /// `adopted / total * 100`, rounded to one decimal; None without pets
    pub fn adoption_rate(&self) -> Option<f64> {
        self.pet_share(self.pets.adopted)
    }

    /// `available / total * 100`, rounded to one decimal; None without pets
    pub fn availability_rate(&self) -> Option<f64> {
        self.pet_share(self.pets.available)
    }

    fn pet_share(&self, count: i64) -> Option<f64> {
        if self.pets.total > 0 {
            Some(round1(count as f64 / self.pets.total as f64 * 100.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_defaults_to_zero() {
        let snapshot: SystemSnapshot =
            serde_json::from_str(r#"{"pets":{"total":4,"adopted":1},"donations":{}}"#).unwrap();
        assert_eq!(snapshot.pets.total, 4);
        assert_eq!(snapshot.pets.available, 0);
        assert_eq!(snapshot.adoptions, AdoptionCounts::default());
        assert_eq!(snapshot.donations.total_amount, 0.0);
        assert!(snapshot.system_metrics.last_activity.is_none());
    }

    #[test]
    fn test_rates_without_pets() {
        let snapshot = SystemSnapshot::default();
        assert_eq!(snapshot.adoption_rate(), None);
        assert_eq!(snapshot.availability_rate(), None);
    }

    #[test]
    fn test_rates_round_to_one_decimal() {
        let mut snapshot = SystemSnapshot::default();
        snapshot.pets.total = 3;
        snapshot.pets.adopted = 2;
        snapshot.pets.available = 1;
        assert_eq!(snapshot.adoption_rate(), Some(66.7));
        assert_eq!(snapshot.availability_rate(), Some(33.3));
    }
}
