//! Domain models for the adoption platform
//!
//! Status enums persist as the lowercase Spanish strings used by the
//! platform's API and database (`disponible`, `pendiente`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pet availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetStatus {
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "adoptado")]
    Adopted,
    #[serde(rename = "en_proceso")]
    InProcess,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "disponible",
            PetStatus::Adopted => "adoptado",
            PetStatus::InProcess => "en_proceso",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disponible" => Ok(PetStatus::Available),
            "adoptado" => Ok(PetStatus::Adopted),
            "en_proceso" => Ok(PetStatus::InProcess),
            _ => Err(format!("Unknown pet status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "macho")]
    Male,
    #[serde(rename = "hembra")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "macho",
            Gender::Female => "hembra",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "macho" => Ok(Gender::Male),
            "hembra" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetSize {
    #[serde(rename = "pequeño")]
    Small,
    #[serde(rename = "mediano")]
    Medium,
    #[serde(rename = "grande")]
    Large,
}

impl PetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSize::Small => "pequeño",
            PetSize::Medium => "mediano",
            PetSize::Large => "grande",
        }
    }
}

impl FromStr for PetSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pequeño" => Ok(PetSize::Small),
            "mediano" => Ok(PetSize::Medium),
            "grande" => Ok(PetSize::Large),
            _ => Err(format!("Unknown pet size: {}", s)),
        }
    }
}

/// Adoption request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdoptionStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "aprobada")]
    Approved,
    #[serde(rename = "rechazada")]
    Rejected,
    #[serde(rename = "completada")]
    Completed,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "pendiente",
            AdoptionStatus::Approved => "aprobada",
            AdoptionStatus::Rejected => "rechazada",
            AdoptionStatus::Completed => "completada",
        }
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdoptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(AdoptionStatus::Pending),
            "aprobada" => Ok(AdoptionStatus::Approved),
            "rechazada" => Ok(AdoptionStatus::Rejected),
            "completada" => Ok(AdoptionStatus::Completed),
            _ => Err(format!("Unknown adoption status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "fallida")]
    Failed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pendiente",
            DonationStatus::Completed => "completada",
            DonationStatus::Failed => "fallida",
        }
    }
}

impl FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(DonationStatus::Pending),
            "completada" => Ok(DonationStatus::Completed),
            "fallida" => Ok(DonationStatus::Failed),
            _ => Err(format!("Unknown donation status: {}", s)),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub google_id: Option<String>,
    /// Registration time; `None` means now
    pub created_at: Option<DateTime<Utc>>,
}

/// A pet listed for adoption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: i32,
    pub gender: Gender,
    pub description: String,
    pub image_url: Option<String>,
    pub size: PetSize,
    pub status: PetStatus,
    pub location: String,
    pub vaccinated: bool,
    pub sterilized: bool,
    pub characteristics: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: i32,
    pub gender: Gender,
    pub description: String,
    pub image_url: Option<String>,
    pub size: PetSize,
    pub status: PetStatus,
    pub location: String,
    pub vaccinated: bool,
    pub sterilized: bool,
    pub characteristics: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// An adoption request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adoption {
    pub id: i64,
    pub user_id: i64,
    pub pet_id: i64,
    pub status: AdoptionStatus,
    pub message: Option<String>,
    pub admin_notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdoption {
    pub user_id: i64,
    pub pet_id: i64,
    pub status: AdoptionStatus,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A donation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub user_id: Option<i64>,
    pub amount: f64,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub message: Option<String>,
    pub status: DonationStatus,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub user_id: Option<i64>,
    pub amount: f64,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub message: Option<String>,
    pub status: DonationStatus,
    pub payment_method: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesCount {
    pub species: String,
    pub count: i64,
}

/// GET /api/pets-stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetStats {
    pub total_pets: i64,
    pub available_pets: i64,
    pub adopted_pets: i64,
    pub pets_by_species: Vec<SpeciesCount>,
}

/// GET /api/adoptions-stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdoptionStats {
    pub total_adoptions: i64,
    pub pending_adoptions: i64,
    pub approved_adoptions: i64,
    pub completed_adoptions: i64,
    pub recent_adoptions: Vec<Adoption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub total: f64,
}

/// GET /api/donations-stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationStats {
    /// Count of completed donations
    pub total_donations: i64,
    pub total_amount: f64,
    pub pending_donations: i64,
    pub recent_donations: Vec<Donation>,
    pub monthly_donations: Vec<MonthlyTotal>,
}

// ============================================================================
// Supplementary analytics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularCharacteristic {
    pub species: String,
    pub breed: Option<String>,
    pub size: String,
    pub adopted_count: i64,
}

/// Data behind the adoption recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdoptionMetrics {
    /// Percentage of adoption requests that completed
    pub adoption_success_rate: f64,
    /// Mean days from request to completion
    pub average_adoption_time: f64,
    pub popular_pet_characteristics: Vec<PopularCharacteristic>,
    /// Adoption requests per month (1-12) of the current year
    pub seasonal_trends: Vec<(u32, i64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationOutlier {
    pub id: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeavyUser {
    pub id: i64,
    pub name: String,
    pub adoptions_count: i64,
    pub donations_count: i64,
}

/// Row-level evidence checked alongside the anomaly heuristics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyScan {
    pub unusual_adoption_patterns: Vec<DailyCount>,
    pub donation_anomalies: Vec<DonationOutlier>,
    pub user_behavior_anomalies: Vec<HeavyUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_strings() {
        for status in [PetStatus::Available, PetStatus::Adopted, PetStatus::InProcess] {
            assert_eq!(status.as_str().parse::<PetStatus>().unwrap(), status);
        }
        assert_eq!(
            "completada".parse::<AdoptionStatus>().unwrap(),
            AdoptionStatus::Completed
        );
        assert!("adopted".parse::<PetStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_value(PetSize::Small).unwrap();
        assert_eq!(json, "pequeño");
        let status: DonationStatus = serde_json::from_str("\"fallida\"").unwrap();
        assert_eq!(status, DonationStatus::Failed);
    }
}
