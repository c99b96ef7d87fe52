//! Application state shared across handlers

use anyhow::Result;
use sqlx::PgPool;

use crate::{
    config::ServerConfig,
    jwt::JwtService,
    repositories::{
        AdoptionFormRepository, ContactFormRepository, PetRepository, UserRepository,
    },
    upload::UploadStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub pet_repository: PetRepository,
    pub adoption_form_repository: AdoptionFormRepository,
    pub contact_form_repository: ContactFormRepository,
    pub uploads: UploadStore,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire repositories and services around a pool
    pub fn new(pool: PgPool, config: &ServerConfig) -> Result<Self> {
        let jwt_service = JwtService::new(config.jwt_config())?;

        Ok(AppState {
            user_repository: UserRepository::new(pool.clone()),
            pet_repository: PetRepository::new(pool.clone()),
            adoption_form_repository: AdoptionFormRepository::new(pool.clone()),
            contact_form_repository: ContactFormRepository::new(pool.clone()),
            db_pool: pool,
            jwt_service,
            uploads: UploadStore::new(&config.uploads_dir),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}
