//! Builds repositories from the application context.

use std::sync::Arc;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromContext;
use crate::models::Entity;
use crate::repositories::DocumentRepository;
use crate::store::Database;

/// Hands out repositories bound to the shared database handle.
#[derive(FromContext, Clone)]
pub struct RepositoryFactory {
    database: Database,
    config: Arc<Config>,
}

impl RepositoryFactory {
    /// Returns a repository for `T` stored in `collection`.
    pub fn repository<T: Entity>(&self, collection: &str) -> DocumentRepository<T> {
        tracing::debug!(
            "Binding repository to {}.{}",
            self.database.name(),
            collection
        );

        DocumentRepository::new(self.database.collection::<T>(collection))
            .with_concurrency(self.config.batch.concurrency)
    }
}
