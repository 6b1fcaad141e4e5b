//! Sample data
//!
//! The five sample pets are inserted only into an empty pets table; demo
//! activity only when there are no users yet. Running `seed` twice is a no-op.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use adopta_core::models::{
    AdoptionStatus, DonationStatus, Gender, NewAdoption, NewDonation, NewPet, NewUser, PetSize,
    PetStatus,
};
use adopta_core::Database;

/// What a seed run inserted
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub pets: usize,
    pub users: usize,
    pub adoptions: usize,
    pub donations: usize,
}

struct SamplePet {
    name: &'static str,
    species: &'static str,
    breed: &'static str,
    age: i32,
    gender: Gender,
    description: &'static str,
    image_url: &'static str,
    size: PetSize,
    location: &'static str,
    sterilized: bool,
    characteristics: [&'static str; 3],
}

const SAMPLE_PETS: [SamplePet; 5] = [
    SamplePet {
        name: "Max",
        species: "perro",
        breed: "Golden Retriever",
        age: 3,
        gender: Gender::Male,
        description: "Max es un perro muy cariñoso y juguetón. Le encanta correr en el parque y jugar con niños.",
        image_url: "https://images.unsplash.com/photo-1552053831-71594a27632d?w=400",
        size: PetSize::Large,
        location: "Bogotá",
        sterilized: true,
        characteristics: ["amigable", "activo", "obediente"],
    },
    SamplePet {
        name: "Luna",
        species: "gato",
        breed: "Siamés",
        age: 2,
        gender: Gender::Female,
        description: "Luna es una gata muy elegante y cariñosa. Le gusta dormir al sol y recibir mimos.",
        image_url: "https://images.unsplash.com/photo-1574158622682-e40e69881006?w=400",
        size: PetSize::Small,
        location: "Medellín",
        sterilized: true,
        characteristics: ["tranquila", "cariñosa", "independiente"],
    },
    SamplePet {
        name: "Rocky",
        species: "perro",
        breed: "Bulldog Francés",
        age: 1,
        gender: Gender::Male,
        description: "Rocky es un cachorro muy enérgico y divertido. Le encanta jugar y hacer travesuras.",
        image_url: "https://images.unsplash.com/photo-1583337130417-3346a1be7dee?w=400",
        size: PetSize::Medium,
        location: "Cali",
        sterilized: false,
        characteristics: ["juguetón", "enérgico", "sociable"],
    },
    SamplePet {
        name: "Mia",
        species: "gato",
        breed: "Persa",
        age: 4,
        gender: Gender::Female,
        description: "Mia es una gata muy tranquila y elegante. Perfecta para un hogar silencioso.",
        image_url: "https://images.unsplash.com/photo-1596854407944-bf87f6fdd49e?w=400",
        size: PetSize::Small,
        location: "Barranquilla",
        sterilized: true,
        characteristics: ["tranquila", "elegante", "silenciosa"],
    },
    SamplePet {
        name: "Buddy",
        species: "perro",
        breed: "Labrador",
        age: 5,
        gender: Gender::Male,
        description: "Buddy es un perro muy leal y protector. Ideal para familias con niños.",
        image_url: "https://images.unsplash.com/photo-1551717743-49959800b1f6?w=400",
        size: PetSize::Large,
        location: "Cartagena",
        sterilized: true,
        characteristics: ["leal", "protector", "familiar"],
    },
];

/// (name, email, google_id, days since registration)
const DEMO_USERS: [(&str, &str, Option<&str>, i64); 3] = [
    ("María González", "maria@example.com", None, 45),
    ("Carlos Pérez", "carlos@example.com", Some("google-carlos-01"), 12),
    ("Laura Gómez", "laura@example.com", None, 2),
];

pub fn cmd_seed(db: &Database, demo: bool) -> Result<SeedSummary> {
    println!("🌱 Seeding database...");

    let mut summary = SeedSummary::default();

    let existing = db.list_pets(None).context("Failed to list pets")?;
    if existing.is_empty() {
        for pet in &SAMPLE_PETS {
            db.create_pet(&NewPet {
                name: pet.name.to_string(),
                species: pet.species.to_string(),
                breed: Some(pet.breed.to_string()),
                age: pet.age,
                gender: pet.gender,
                description: pet.description.to_string(),
                image_url: Some(pet.image_url.to_string()),
                size: pet.size,
                status: PetStatus::Available,
                location: pet.location.to_string(),
                vaccinated: true,
                sterilized: pet.sterilized,
                characteristics: pet.characteristics.iter().map(|c| c.to_string()).collect(),
                created_at: None,
            })
            .with_context(|| format!("Failed to create pet {}", pet.name))?;
            summary.pets += 1;
        }
        println!("   Added {} sample pets", summary.pets);
    } else {
        println!("   Pets already present ({}), skipping", existing.len());
    }

    if demo {
        if db.count_users()? == 0 {
            seed_demo_activity(db, &mut summary)?;
            println!(
                "   Added {} users, {} adoptions, {} donations",
                summary.users, summary.adoptions, summary.donations
            );
        } else {
            println!("   Users already present, skipping demo activity");
        }
    }

    println!("✅ Seed complete");
    Ok(summary)
}

fn seed_demo_activity(db: &Database, summary: &mut SeedSummary) -> Result<()> {
    let now = Utc::now();

    let mut user_ids = Vec::new();
    for (name, email, google_id, days) in DEMO_USERS {
        let id = db
            .create_user(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                google_id: google_id.map(String::from),
                created_at: Some(now - Duration::days(days)),
            })
            .with_context(|| format!("Failed to create user {}", email))?;
        user_ids.push(id);
        summary.users += 1;
    }

    let pet_id = |name: &str| -> Result<i64> {
        db.list_pets(None)?
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .with_context(|| format!("Sample pet {} not found", name))
    };
    let max = pet_id("Max")?;
    let luna = pet_id("Luna")?;
    let rocky = pet_id("Rocky")?;

    // Max went home after a two-week process
    db.create_adoption(&NewAdoption {
        user_id: user_ids[0],
        pet_id: max,
        status: AdoptionStatus::Completed,
        message: Some("Tengo un jardín grande y mucho tiempo para Max.".to_string()),
        created_at: Some(now - Duration::days(30)),
        completed_at: Some(now - Duration::days(16)),
    })?;
    db.set_pet_status(max, PetStatus::Adopted)?;

    let luna_request = db.create_adoption(&NewAdoption {
        user_id: user_ids[1],
        pet_id: luna,
        status: AdoptionStatus::Pending,
        message: Some("Vivo en apartamento, ideal para una gata tranquila.".to_string()),
        created_at: Some(now - Duration::days(5)),
        completed_at: None,
    })?;
    db.update_adoption_status(luna_request, AdoptionStatus::Approved, Some("Visita programada"))?;
    db.set_pet_status(luna, PetStatus::InProcess)?;

    db.create_adoption(&NewAdoption {
        user_id: user_ids[2],
        pet_id: rocky,
        status: AdoptionStatus::Pending,
        message: Some("Mis hijos quieren un compañero de juegos.".to_string()),
        created_at: Some(now - Duration::days(1)),
        completed_at: None,
    })?;
    summary.adoptions += 3;

    let donations = [
        (Some(user_ids[0]), 150.0, DonationStatus::Completed, 20),
        (Some(user_ids[1]), 75.5, DonationStatus::Completed, 6),
        (None, 300.0, DonationStatus::Completed, 3),
        (Some(user_ids[2]), 50.0, DonationStatus::Pending, 0),
    ];
    for (user_id, amount, status, days) in donations {
        db.create_donation(&NewDonation {
            user_id,
            amount,
            donor_name: None,
            donor_email: None,
            message: None,
            status,
            payment_method: Some("tarjeta".to_string()),
            created_at: Some(now - Duration::days(days)),
        })?;
        summary.donations += 1;
    }

    Ok(())
}
