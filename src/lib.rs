//! Users API
//!
//! A REST service for managing user records:
//! - Create users with Argon2id-hashed passwords
//! - List users with case-insensitive search and sorting
//! - Fetch, update and delete users by id
//! - PostgreSQL or in-memory storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use crate::api::state::AppState;
use crate::config::StorageBackend;
use crate::infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService, UserServiceTrait,
};
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::from_config(&config.password)?);

    info!("Storage backend: {:?}", config.storage.backend);

    let user_service: Arc<dyn UserServiceTrait> = match config.storage.backend {
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let repository = PostgresUserRepository::connect(&config.database).await?;
            repository.ensure_schema().await?;
            info!("PostgreSQL connection established");

            Arc::new(UserService::new(Arc::new(repository), hasher))
        }
        StorageBackend::Memory => {
            info!("Using in-memory user storage");
            Arc::new(UserService::new(
                Arc::new(InMemoryUserRepository::new()),
                hasher,
            ))
        }
    };

    Ok(AppState::new(user_service))
}
