//! Repositories for database operations
//!
//! Each repository wraps a cloned `PgPool`. Writes touch a single row and use
//! `COALESCE` for partial updates so they stay atomic without a transaction.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;

pub mod adoption_form;
pub mod contact_form;
pub mod pet;
pub mod user;

pub use adoption_form::AdoptionFormRepository;
pub use contact_form::ContactFormRepository;
pub use pet::PetRepository;
pub use user::UserRepository;

/// Apply embedded migrations from `services/api/migrations`
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))
}

/// Parse a text column into a domain enum
pub(crate) fn parse_column<T>(value: &str, column: &str) -> DatabaseResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| DatabaseError::DataCorruption(format!("{column}: {e}")))
}
