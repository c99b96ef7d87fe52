//! Pet repository

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewPet, Pet, PetChanges};

const PET_COLUMNS: &str = "id, name, species, breed, size, age, gender, color, about, vaccinated, \
     neutered, medical_conditions, adoption_fee, picture, created_at, updated_at";

fn pet_from_row(row: &PgRow) -> DatabaseResult<Pet> {
    Ok(Pet {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        species: row.try_get("species")?,
        breed: row.try_get("breed")?,
        size: row.try_get("size")?,
        age: row.try_get("age")?,
        gender: row.try_get("gender")?,
        color: row.try_get("color")?,
        about: row.try_get("about")?,
        vaccinated: row.try_get("vaccinated")?,
        neutered: row.try_get("neutered")?,
        medical_conditions: row.try_get("medical_conditions")?,
        adoption_fee: row.try_get("adoption_fee")?,
        picture: row.try_get("picture")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Pet repository
#[derive(Clone)]
pub struct PetRepository {
    pool: PgPool,
}

impl PetRepository {
    /// Create a new pet repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new pet
    pub async fn create(&self, pet: &NewPet) -> DatabaseResult<Pet> {
        info!("Creating pet: {} ({})", pet.name, pet.species);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO pets (id, name, species, breed, size, age, gender, color, about,
                              vaccinated, neutered, medical_conditions, adoption_fee, picture)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(&pet.breed)
        .bind(&pet.size)
        .bind(pet.age)
        .bind(&pet.gender)
        .bind(&pet.color)
        .bind(&pet.about)
        .bind(pet.vaccinated)
        .bind(pet.neutered)
        .bind(&pet.medical_conditions)
        .bind(pet.adoption_fee)
        .bind(&pet.picture)
        .fetch_one(&self.pool)
        .await?;

        pet_from_row(&row)
    }

    /// Get all pets, newest first
    pub async fn get_all(&self) -> DatabaseResult<Vec<Pet>> {
        let rows = sqlx::query(&format!(
            "SELECT {PET_COLUMNS} FROM pets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(pet_from_row).collect()
    }

    /// Find a pet by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Pet>> {
        let row = sqlx::query(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(pet_from_row).transpose()
    }

    /// Whether a pet with this ID exists
    pub async fn exists(&self, id: Uuid) -> DatabaseResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pets WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Apply a partial update; returns `None` when the pet does not exist
    pub async fn update(&self, id: Uuid, changes: &PetChanges) -> DatabaseResult<Option<Pet>> {
        info!("Updating pet: {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE pets SET
                name = COALESCE($2, name),
                species = COALESCE($3, species),
                breed = COALESCE($4, breed),
                size = COALESCE($5, size),
                age = COALESCE($6, age),
                gender = COALESCE($7, gender),
                color = COALESCE($8, color),
                about = COALESCE($9, about),
                vaccinated = COALESCE($10, vaccinated),
                neutered = COALESCE($11, neutered),
                medical_conditions = COALESCE($12, medical_conditions),
                adoption_fee = COALESCE($13, adoption_fee),
                picture = COALESCE($14, picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.species)
        .bind(&changes.breed)
        .bind(&changes.size)
        .bind(changes.age)
        .bind(&changes.gender)
        .bind(&changes.color)
        .bind(&changes.about)
        .bind(changes.vaccinated)
        .bind(changes.neutered)
        .bind(&changes.medical_conditions)
        .bind(changes.adoption_fee)
        .bind(&changes.picture)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(pet_from_row).transpose()
    }

    /// Delete a pet; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting pet: {}", id);

        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
