//! Camp API: REST backend for code camps, their talks and speakers.

pub mod config;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod links;
pub mod mapping;
pub mod migration;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;

pub use config::{AppConfig, StoreKind};
pub use error::{AppError, ConfigError, RepositoryError};
pub use links::LinkGenerator;
pub use migration::{ensure_tables, seed_sample_data};
pub use repository::{CampRepository, MemoryStore, PgRepositoryProvider, RepositoryProvider};
pub use routes::{app, camp_routes, common_routes_with_ready};
pub use state::AppState;
pub use store::ensure_database_exists;
