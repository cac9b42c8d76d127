//! Data access layer.
//!
//! [`Repository`] is the whole public contract: ten CRUD operations over one
//! collection, each answering with a [`Response`] envelope.
//!
//! Two channels carry outcomes:
//!
//! - `Err(AppError)` for faults the caller must handle: invalid arguments,
//!   integrity violations, and store failures on single-record operations.
//! - `Ok(Response)` for everything else, including "not found".
//!
//! Batch operations never fail outright: a store fault is captured as a
//! failed `Response` with one error entry.

mod document;
mod factory;

pub use document::{DocumentRepository, DEFAULT_BATCH_CONCURRENCY};
pub use factory::RepositoryFactory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Entity;
use crate::response::Response;
use crate::store::Filter;

/// CRUD contract over one collection of `T`.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Every record in the collection. An empty collection is still a success.
    async fn get_all(&self) -> Result<Response<Vec<T>>, AppError>;

    /// Every record matching `filter`.
    async fn get_all_where(&self, filter: Filter) -> Result<Response<Vec<T>>, AppError>;

    /// The record with identifier `id`.
    ///
    /// Fails with "Record not found" when absent. More than one match is an
    /// integrity violation reported as [`AppError::DuplicateId`].
    async fn get_by_id(&self, id: Uuid) -> Result<Response<T>, AppError>;

    /// The single record matching `filter`; more than one match is
    /// [`AppError::AmbiguousMatch`].
    async fn get_one_where(&self, filter: Filter) -> Result<Response<T>, AppError>;

    /// Inserts `item` and echoes it back. A nil identifier is rejected up front.
    async fn create(&self, item: T) -> Result<Response<T>, AppError>;

    /// Replaces the stored record sharing `item`'s identifier, without upsert.
    ///
    /// An acknowledged write that modified nothing is reported as "Record not found".
    async fn update(&self, item: T) -> Result<Response<T>, AppError>;

    /// Removes the record with identifier `id`. The nil identifier is rejected.
    async fn delete(&self, id: Uuid) -> Result<Response<T>, AppError>;

    /// Inserts all `items` in one store call.
    async fn create_many(&self, items: Vec<T>) -> Response<T>;

    /// Replaces each item by identifier and reports updated/failed counts.
    async fn update_many(&self, items: Vec<T>) -> Response<T>;

    /// Removes every record whose identifier is in `ids` and reports how many
    /// of the requested ids were not matched.
    async fn delete_many(&self, ids: Vec<Uuid>) -> Response<T>;
}
