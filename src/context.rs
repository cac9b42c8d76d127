//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::di::{Context as ContextDerive, FromRef};
use crate::error::AppError;
use crate::models::Entity;
use crate::repositories::{DocumentRepository, RepositoryFactory};
use crate::store::backends::mongo;
use crate::store::Database;

/// Root application context for dependency injection.
///
/// The Context holds all shared dependencies and uses `#[derive(Context)]`
/// to generate `FromRef` implementations for each field, enabling
/// compile-time dependency resolution.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Shared database handle, bound to the service's database.
    pub database: Database,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(database: impl Into<Database>, config: Config) -> Self {
        Self {
            database: database.into(),
            config: Arc::new(config),
        }
    }

    /// Builds the MongoDB client from configuration and selects the database
    /// named after the service.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        let db = mongo::connect(&config.mongo, &config.service.name).await?;
        Ok(Self::new(db, config))
    }

    /// Returns a repository for `T` stored in `collection`.
    pub fn repository<T: Entity>(&self, collection: &str) -> DocumentRepository<T> {
        RepositoryFactory::from_ref(self).repository(collection)
    }
}
