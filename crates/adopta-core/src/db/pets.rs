//! Pet listing operations

use chrono::Utc;
use rusqlite::{params, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewPet, Pet, PetStatus};

const PET_COLUMNS: &str = "id, name, species, breed, age, gender, description, image_url, \
     size, status, location, vaccinated, sterilized, characteristics, created_at";

fn row_to_pet(row: &Row<'_>) -> rusqlite::Result<Pet> {
    let gender: String = row.get(5)?;
    let size: String = row.get(8)?;
    let status: String = row.get(9)?;
    let characteristics: Option<String> = row.get(13)?;
    let created_at: String = row.get(14)?;

    Ok(Pet {
        id: row.get(0)?,
        name: row.get(1)?,
        species: row.get(2)?,
        breed: row.get(3)?,
        age: row.get(4)?,
        gender: gender.parse().map_err(|e: String| invalid_column(5, e))?,
        description: row.get(6)?,
        image_url: row.get(7)?,
        size: size.parse().map_err(|e: String| invalid_column(8, e))?,
        status: status.parse().map_err(|e: String| invalid_column(9, e))?,
        location: row.get(10)?,
        vaccinated: row.get(11)?,
        sterilized: row.get(12)?,
        characteristics: characteristics
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default(),
        created_at: parse_datetime(&created_at),
    })
}

pub(crate) fn invalid_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, message.into())
}

impl Database {
    /// Insert a pet, returning its id
    pub fn create_pet(&self, pet: &NewPet) -> Result<i64> {
        if pet.name.trim().is_empty() {
            return Err(Error::InvalidData("Pet name is required".to_string()));
        }

        let conn = self.conn()?;
        let characteristics = serde_json::to_string(&pet.characteristics)?;
        let created_at = format_datetime(&pet.created_at.unwrap_or_else(Utc::now));

        conn.execute(
            r#"
            INSERT INTO pets (name, species, breed, age, gender, description, image_url,
                              size, status, location, vaccinated, sterilized,
                              characteristics, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                pet.name,
                pet.species,
                pet.breed,
                pet.age,
                pet.gender.as_str(),
                pet.description,
                pet.image_url,
                pet.size.as_str(),
                pet.status.as_str(),
                pet.location,
                pet.vaccinated,
                pet.sterilized,
                characteristics,
                created_at,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List pets, newest first, optionally filtered by status
    pub fn list_pets(&self, status: Option<PetStatus>) -> Result<Vec<Pet>> {
        let conn = self.conn()?;

        let pets = match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM pets WHERE status = ? ORDER BY created_at DESC, id DESC",
                    PET_COLUMNS
                ))?;
                let rows = stmt.query_map(params![status.as_str()], row_to_pet)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM pets ORDER BY created_at DESC, id DESC",
                    PET_COLUMNS
                ))?;
                let rows = stmt.query_map([], row_to_pet)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(pets)
    }

    /// Change a pet's status
    pub fn set_pet_status(&self, pet_id: i64, status: PetStatus) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE pets SET status = ? WHERE id = ?",
            params![status.as_str(), pet_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Pet {} not found", pet_id)));
        }
        Ok(())
    }
}
