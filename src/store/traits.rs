//! Capability set the repository consumes from a document store.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::Entity;
use crate::store::filter::Filter;

/// Acknowledgement and affected-record counts reported by a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The store confirmed it accepted the write.
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub deleted_count: u64,
}

impl WriteOutcome {
    /// Acknowledged replacement.
    pub fn replaced(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            deleted_count: 0,
        }
    }

    /// Acknowledged deletion.
    pub fn deleted(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
            ..Self::default()
        }
    }

    /// Acknowledged, yet no record was modified.
    pub fn modified_nothing(&self) -> bool {
        self.acknowledged && self.modified_count == 0
    }

    /// Acknowledged, yet no record was removed.
    pub fn deleted_nothing(&self) -> bool {
        self.acknowledged && self.deleted_count == 0
    }
}

/// One named collection of `T` records.
///
/// Implementations must be safe for concurrent use: the repository issues
/// independent calls from many tasks against a shared instance.
#[async_trait]
pub trait DocumentStore<T: Entity>: Send + Sync {
    /// Name of the underlying collection.
    fn collection_name(&self) -> &str;

    /// Returns records matching `filter` in store order, at most `limit` of them.
    async fn find(&self, filter: &Filter, limit: Option<i64>) -> Result<Vec<T>, AppError>;

    /// Inserts one record. A duplicate identifier is an error.
    async fn insert_one(&self, item: &T) -> Result<(), AppError>;

    /// Inserts a batch of records.
    async fn insert_many(&self, items: &[T]) -> Result<(), AppError>;

    /// Replaces the first record matching `filter` with `item`.
    ///
    /// With `upsert` set, inserts `item` when nothing matches.
    async fn replace_one(
        &self,
        filter: &Filter,
        item: &T,
        upsert: bool,
    ) -> Result<WriteOutcome, AppError>;

    /// Removes the first record matching `filter`.
    async fn delete_one(&self, filter: &Filter) -> Result<WriteOutcome, AppError>;

    /// Removes every record matching `filter`.
    async fn delete_many(&self, filter: &Filter) -> Result<WriteOutcome, AppError>;
}
