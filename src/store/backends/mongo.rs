//! MongoDB backend.
//!
//! ```ignore
//! use spalce_common::store::backends::mongo;
//!
//! let db = mongo::connect(&config.mongo, &config.service.name).await?;
//! let products = MongoCollection::<Product>::new(&db, "products");
//! ```

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};

use crate::config::MongoConfig;
use crate::error::AppError;
use crate::models::Entity;
use crate::store::{DocumentStore, Filter, WriteOutcome};

/// Creates a client for the configured server and selects `database`.
///
/// The driver connects lazily; use [`ping`] to verify the server answers.
pub async fn connect(config: &MongoConfig, database: &str) -> Result<Database, AppError> {
    let uri = config.connection_string();
    tracing::info!("Creating MongoDB client for {}", uri);

    let client = Client::with_uri_str(&uri).await?;
    Ok(client.database(database))
}

/// Runs the `ping` command against `db`.
pub async fn ping(db: &Database) -> Result<(), AppError> {
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// A typed MongoDB collection.
///
/// This type is cheap to clone - the driver's collection handle is `Arc`-based.
pub struct MongoCollection<T: Send + Sync> {
    inner: Collection<T>,
}

impl<T: Send + Sync> Clone for MongoCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Entity> MongoCollection<T> {
    pub fn new(db: &Database, name: &str) -> Self {
        Self {
            inner: db.collection::<T>(name),
        }
    }
}

#[async_trait]
impl<T: Entity> DocumentStore<T> for MongoCollection<T> {
    fn collection_name(&self) -> &str {
        self.inner.name()
    }

    async fn find(&self, filter: &Filter, limit: Option<i64>) -> Result<Vec<T>, AppError> {
        let mut find = self.inner.find(filter.to_document());
        if let Some(limit) = limit {
            find = find.limit(limit);
        }

        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_one(&self, item: &T) -> Result<(), AppError> {
        self.inner.insert_one(item).await?;
        Ok(())
    }

    async fn insert_many(&self, items: &[T]) -> Result<(), AppError> {
        self.inner.insert_many(items).await?;
        Ok(())
    }

    async fn replace_one(
        &self,
        filter: &Filter,
        item: &T,
        upsert: bool,
    ) -> Result<WriteOutcome, AppError> {
        let result = self
            .inner
            .replace_one(filter.to_document(), item)
            .upsert(upsert)
            .await?;

        Ok(WriteOutcome::replaced(
            result.matched_count,
            result.modified_count,
        ))
    }

    async fn delete_one(&self, filter: &Filter) -> Result<WriteOutcome, AppError> {
        let result = self.inner.delete_one(filter.to_document()).await?;
        Ok(WriteOutcome::deleted(result.deleted_count))
    }

    async fn delete_many(&self, filter: &Filter) -> Result<WriteOutcome, AppError> {
        let result = self.inner.delete_many(filter.to_document()).await?;
        Ok(WriteOutcome::deleted(result.deleted_count))
    }
}
