//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; no game rules live here. Row structs (`models.rs`) and the schema
//! (`schema.rs`) stay private to this module.

mod diesel_listing_repository;
mod diesel_player_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_player_repository::DieselPlayerRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
