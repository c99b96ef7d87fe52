//! Adoption form repository
//!
//! Reads join the pet so listings can show what was applied for. Forms keep
//! their `pet_id` after the pet is deleted; the joined pet is then `None`.

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::parse_column;
use crate::models::{
    AdoptionForm, AdoptionFormChanges, AdoptionFormDetails, AdoptionStatus, NewAdoptionForm,
    PetSummary,
};

const FORM_COLUMNS: &str = "id, user_id, pet_id, name, phone_number, email, address_line, city, \
     zip_code, status, created_at, updated_at";

const DETAILS_SELECT: &str = r#"
    SELECT f.id, f.user_id, f.name, f.phone_number, f.email, f.address_line, f.city,
           f.zip_code, f.status, f.created_at, f.updated_at,
           p.id AS pet_id, p.name AS pet_name, p.species AS pet_species,
           p.breed AS pet_breed, p.picture AS pet_picture
    FROM adoption_forms f
    LEFT JOIN pets p ON p.id = f.pet_id
"#;

fn form_from_row(row: &PgRow) -> DatabaseResult<AdoptionForm> {
    let status: String = row.try_get("status")?;
    Ok(AdoptionForm {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        pet_id: row.try_get("pet_id")?,
        name: row.try_get("name")?,
        phone_number: row.try_get("phone_number")?,
        email: row.try_get("email")?,
        address_line: row.try_get("address_line")?,
        city: row.try_get("city")?,
        zip_code: row.try_get("zip_code")?,
        status: parse_column::<AdoptionStatus>(&status, "adoption_forms.status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn details_from_row(row: &PgRow) -> DatabaseResult<AdoptionFormDetails> {
    let status: String = row.try_get("status")?;
    let pet_id: Option<Uuid> = row.try_get("pet_id")?;
    let pet = match pet_id {
        Some(id) => Some(PetSummary {
            id,
            name: row.try_get("pet_name")?,
            species: row.try_get("pet_species")?,
            breed: row.try_get("pet_breed")?,
            picture: row.try_get("pet_picture")?,
        }),
        None => None,
    };

    Ok(AdoptionFormDetails {
        id: row.try_get("id")?,
        user: row.try_get("user_id")?,
        pet,
        name: row.try_get("name")?,
        phone_number: row.try_get("phone_number")?,
        email: row.try_get("email")?,
        address_line: row.try_get("address_line")?,
        city: row.try_get("city")?,
        zip_code: row.try_get("zip_code")?,
        status: parse_column::<AdoptionStatus>(&status, "adoption_forms.status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Adoption form repository
#[derive(Clone)]
pub struct AdoptionFormRepository {
    pool: PgPool,
}

impl AdoptionFormRepository {
    /// Create a new adoption form repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a submission for `user_id`; status always starts as `Pending`
    pub async fn create(
        &self,
        user_id: Uuid,
        pet_id: Uuid,
        form: &NewAdoptionForm,
    ) -> DatabaseResult<AdoptionForm> {
        info!("Creating adoption form: user {} for pet {}", user_id, pet_id);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO adoption_forms (id, user_id, pet_id, name, phone_number, email,
                                        address_line, city, zip_code, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {FORM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(pet_id)
        .bind(form.name.trim())
        .bind(form.phone_number.trim())
        .bind(form.email.trim())
        .bind(form.address_line.trim())
        .bind(form.city.trim())
        .bind(form.zip_code.trim())
        .bind(AdoptionStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        form_from_row(&row)
    }

    /// All forms with their pet, newest first
    pub async fn list_details(&self) -> DatabaseResult<Vec<AdoptionFormDetails>> {
        let rows = sqlx::query(&format!("{DETAILS_SELECT} ORDER BY f.created_at DESC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(details_from_row).collect()
    }

    /// Forms submitted by one user, newest first
    pub async fn list_details_for_user(
        &self,
        user_id: Uuid,
    ) -> DatabaseResult<Vec<AdoptionFormDetails>> {
        let rows = sqlx::query(&format!(
            "{DETAILS_SELECT} WHERE f.user_id = $1 ORDER BY f.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(details_from_row).collect()
    }

    /// Find one form with its pet
    pub async fn find_details(&self, id: Uuid) -> DatabaseResult<Option<AdoptionFormDetails>> {
        let row = sqlx::query(&format!("{DETAILS_SELECT} WHERE f.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(details_from_row).transpose()
    }

    /// Apply a partial update; returns `None` when the form does not exist
    pub async fn update(
        &self,
        id: Uuid,
        changes: &AdoptionFormChanges,
        status: Option<AdoptionStatus>,
    ) -> DatabaseResult<Option<AdoptionForm>> {
        info!("Updating adoption form: {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE adoption_forms SET
                name = COALESCE($2, name),
                phone_number = COALESCE($3, phone_number),
                email = COALESCE($4, email),
                address_line = COALESCE($5, address_line),
                city = COALESCE($6, city),
                zip_code = COALESCE($7, zip_code),
                status = COALESCE($8, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FORM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(changes.phone_number.as_deref().map(str::trim))
        .bind(changes.email.as_deref().map(str::trim))
        .bind(changes.address_line.as_deref().map(str::trim))
        .bind(changes.city.as_deref().map(str::trim))
        .bind(changes.zip_code.as_deref().map(str::trim))
        .bind(status.map(|status| status.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(form_from_row).transpose()
    }

    /// Delete a form; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting adoption form: {}", id);

        let result = sqlx::query("DELETE FROM adoption_forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
