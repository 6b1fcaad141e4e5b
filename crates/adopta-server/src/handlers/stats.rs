//! Read-only statistics handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use adopta_core::models::{AdoptionStats, DonationStats, PetStats};

/// GET /api/pets-stats - Pet counts by status and species
pub async fn pet_stats(State(state): State<Arc<AppState>>) -> Result<Json<PetStats>, AppError> {
    Ok(Json(state.db.pet_stats()?))
}

/// GET /api/adoptions-stats - Adoption counts and the latest requests
pub async fn adoption_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdoptionStats>, AppError> {
    Ok(Json(state.db.adoption_stats()?))
}

/// GET /api/donations-stats - Completed donation totals, latest donations and monthly totals
pub async fn donation_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DonationStats>, AppError> {
    Ok(Json(state.db.donation_stats()?))
}
