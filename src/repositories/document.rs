//! Generic repository over one document-store collection.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Entity;
use crate::repositories::Repository;
use crate::response::Response;
use crate::store::{DocumentStore, Filter};

/// Default number of replacements `update_many` keeps in flight.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

const RECORDS_FOUND: &str = "Records found successfully";
const RECORD_FOUND: &str = "Record found successfully";
const RECORD_NOT_FOUND: &str = "Record not found";
const RECORD_CREATED: &str = "Record created successfully";
const RECORD_UPDATED: &str = "Record updated successfully";
const RECORD_DELETED: &str = "Record deleted successfully";
const RECORDS_CREATED: &str = "Records created successfully";

/// [`Repository`] implementation bound to a single collection.
///
/// The binding is fixed at construction; the repository holds no other
/// state, so clones are interchangeable and may be used concurrently.
pub struct DocumentRepository<T: Entity> {
    store: Arc<dyn DocumentStore<T>>,
    concurrency: usize,
}

impl<T: Entity> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            concurrency: self.concurrency,
        }
    }
}

impl<T: Entity> DocumentRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore<T>>) -> Self {
        Self {
            store,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Sets how many replacements `update_many` dispatches at once (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn collection_name(&self) -> &str {
        self.store.collection_name()
    }

    /// Fetches at most two matches so a second one exposes a non-unique lookup.
    async fn find_unique(&self, filter: &Filter) -> Result<Option<T>, AppError> {
        let mut found = self.store.find(filter, Some(2)).await?;
        match found.len() {
            0 | 1 => Ok(found.pop()),
            _ => Err(AppError::AmbiguousMatch),
        }
    }

    fn found(item: Option<T>) -> Response<T> {
        match item {
            Some(item) => Response::ok(RECORD_FOUND, item),
            None => Response::fail(RECORD_NOT_FOUND, Vec::new()),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for DocumentRepository<T> {
    async fn get_all(&self) -> Result<Response<Vec<T>>, AppError> {
        self.get_all_where(Filter::All).await
    }

    async fn get_all_where(&self, filter: Filter) -> Result<Response<Vec<T>>, AppError> {
        let items = self.store.find(&filter, None).await?;
        tracing::debug!(
            "Fetched {} records from {}",
            items.len(),
            self.collection_name()
        );

        Ok(Response::ok(RECORDS_FOUND, items))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Response<T>, AppError> {
        let item = self.find_unique(&Filter::id(id)).await.map_err(|err| match err {
            AppError::AmbiguousMatch => {
                tracing::warn!(
                    "Identifier {} is not unique in {}",
                    id,
                    self.collection_name()
                );
                AppError::DuplicateId { id }
            }
            other => other,
        })?;

        Ok(Self::found(item))
    }

    async fn get_one_where(&self, filter: Filter) -> Result<Response<T>, AppError> {
        let item = self.find_unique(&filter).await?;
        Ok(Self::found(item))
    }

    async fn create(&self, item: T) -> Result<Response<T>, AppError> {
        if item.id().is_nil() {
            return Err(AppError::InvalidArgument("item"));
        }

        self.store.insert_one(&item).await?;
        tracing::debug!("Created {} in {}", item.id(), self.collection_name());

        Ok(Response::ok(RECORD_CREATED, item))
    }

    async fn update(&self, item: T) -> Result<Response<T>, AppError> {
        if item.id().is_nil() {
            return Err(AppError::InvalidArgument("item"));
        }

        let outcome = self
            .store
            .replace_one(&Filter::id(item.id()), &item, false)
            .await?;
        if outcome.modified_nothing() {
            tracing::debug!(
                "Update of {} in {} modified nothing",
                item.id(),
                self.collection_name()
            );
            return Ok(Response::fail(RECORD_NOT_FOUND, Vec::new()));
        }

        Ok(Response::ok(RECORD_UPDATED, item))
    }

    async fn delete(&self, id: Uuid) -> Result<Response<T>, AppError> {
        if id.is_nil() {
            return Err(AppError::InvalidArgument("id"));
        }

        let outcome = self.store.delete_one(&Filter::id(id)).await?;
        if outcome.deleted_nothing() {
            return Ok(Response::fail(RECORD_NOT_FOUND, Vec::new()));
        }

        tracing::debug!("Deleted {} from {}", id, self.collection_name());
        Ok(Response::done(RECORD_DELETED))
    }

    async fn create_many(&self, items: Vec<T>) -> Response<T> {
        match self.store.insert_many(&items).await {
            Ok(()) => {
                tracing::debug!(
                    "Created {} records in {}",
                    items.len(),
                    self.collection_name()
                );
                Response::done(RECORDS_CREATED)
            }
            Err(err) => {
                tracing::warn!("Batch insert into {} failed: {}", self.collection_name(), err);
                Response::from_error("Failed to create records", &err)
            }
        }
    }

    async fn update_many(&self, items: Vec<T>) -> Response<T> {
        let writes = items.into_iter().map(|item| {
            let store = Arc::clone(&self.store);
            async move {
                store
                    .replace_one(&Filter::id(item.id()), &item, false)
                    .await
            }
        });

        // Stops dispatching at the first store fault
        let tally = stream::iter(writes)
            .buffer_unordered(self.concurrency)
            .try_fold((0usize, 0usize), |(updated, failed), outcome| async move {
                let tally = if outcome.modified_nothing() {
                    (updated, failed + 1)
                } else {
                    (updated + 1, failed)
                };
                Ok::<_, AppError>(tally)
            })
            .await;

        match tally {
            Ok((updated, failed)) => {
                tracing::debug!(
                    "Batch update of {}: {} updated, {} not found",
                    self.collection_name(),
                    updated,
                    failed
                );
                Response::done(format!(
                    "{} records updated successfully and {} records failed to update",
                    updated, failed
                ))
            }
            Err(err) => {
                tracing::warn!("Batch update of {} failed: {}", self.collection_name(), err);
                Response::from_error("Failed to update records", &err)
            }
        }
    }

    async fn delete_many(&self, ids: Vec<Uuid>) -> Response<T> {
        match self.store.delete_many(&Filter::id_in(&ids)).await {
            Ok(outcome) => {
                let requested = ids.len() as u64;
                let missing = requested.saturating_sub(outcome.deleted_count);
                tracing::debug!(
                    "Batch delete from {}: {} deleted, {} not found",
                    self.collection_name(),
                    outcome.deleted_count,
                    missing
                );
                Response::done(format!(
                    "{} records deleted successfully and {} records failed to delete",
                    outcome.deleted_count, missing
                ))
            }
            Err(err) => {
                tracing::warn!("Batch delete from {} failed: {}", self.collection_name(), err);
                Response::from_error("Failed to delete records", &err)
            }
        }
    }
}
