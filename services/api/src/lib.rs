//! Hope Sanctuary pet-adoption API
//!
//! REST backend for the adoption site: user accounts, the pet catalogue,
//! adoption applications and contact enquiries, backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod state;
pub mod upload;
pub mod validation;

pub use state::AppState;
