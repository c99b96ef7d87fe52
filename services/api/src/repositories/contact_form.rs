//! Contact form repository

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    ContactForm, ContactFormChanges, FlagChanges, NewContactForm, contact_form::SubjectFlags,
};

const CONTACT_COLUMNS: &str =
    "id, first_name, last_name, email, subject, message, created_at, updated_at";

fn contact_from_row(row: &PgRow) -> DatabaseResult<ContactForm> {
    Ok(ContactForm {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Contact form repository
#[derive(Clone)]
pub struct ContactFormRepository {
    pool: PgPool,
}

impl ContactFormRepository {
    /// Create a new contact form repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new enquiry
    pub async fn create(&self, form: &NewContactForm) -> DatabaseResult<ContactForm> {
        info!("Creating contact form from {}", form.email.trim());

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO contact_forms (id, first_name, last_name, email, subject, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(form.first_name.trim())
        .bind(form.last_name.trim())
        .bind(form.email.trim())
        .bind(form.subject.trim())
        .bind(form.message.trim())
        .fetch_one(&self.pool)
        .await?;

        contact_from_row(&row)
    }

    /// Get all enquiries, newest first
    pub async fn get_all(&self) -> DatabaseResult<Vec<ContactForm>> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_forms ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(contact_from_row).collect()
    }

    /// Find an enquiry by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<ContactForm>> {
        let row = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_forms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    /// Apply a partial update; returns `None` when the enquiry does not exist
    pub async fn update(
        &self,
        id: Uuid,
        changes: &ContactFormChanges,
    ) -> DatabaseResult<Option<ContactForm>> {
        info!("Updating contact form: {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE contact_forms SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                subject = COALESCE($5, subject),
                message = COALESCE($6, message),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.first_name.as_deref().map(str::trim))
        .bind(changes.last_name.as_deref().map(str::trim))
        .bind(changes.email.as_deref().map(str::trim))
        .bind(changes.subject.as_deref().map(str::trim))
        .bind(changes.message.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    /// Merge flag changes into the stored subject.
    ///
    /// The row is locked between reading and rewriting the subject so
    /// concurrent flag updates on one enquiry cannot drop each other.
    pub async fn update_flags(
        &self,
        id: Uuid,
        changes: FlagChanges,
    ) -> DatabaseResult<Option<ContactForm>> {
        let mut tx = self.pool.begin().await?;

        let subject: Option<String> =
            sqlx::query_scalar("SELECT subject FROM contact_forms WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(subject) = subject else {
            return Ok(None);
        };

        let flags = SubjectFlags::parse(&subject).merge(changes);
        info!(
            "Updating flags of contact form {}: read={} contacted={}",
            id, flags.read, flags.contacted
        );

        let row = sqlx::query(&format!(
            r#"
            UPDATE contact_forms SET subject = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(flags.apply(&subject))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        contact_from_row(&row).map(Some)
    }

    /// Delete an enquiry; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting contact form: {}", id);

        let result = sqlx::query("DELETE FROM contact_forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
