//! Application error types.
//!
//! `AppError` is the propagated fault channel. Outcomes that belong in a
//! [`Response`](crate::response::Response) envelope never travel through it.

use mongodb::bson;
use thiserror::Error;
use uuid::Uuid;

/// Application-level errors for the repository layer.
#[derive(Error, Debug)]
pub enum AppError {
    // Store errors
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("BSON serialization error: {0}")]
    Serialize(#[from] bson::ser::Error),

    #[error("BSON deserialization error: {0}")]
    Deserialize(#[from] bson::de::Error),

    #[error("Duplicate key in collection '{collection}': {key}")]
    DuplicateKey { collection: String, key: String },

    #[error("Store error: {0}")]
    Store(String),

    // Contract errors
    #[error("Value cannot be null or empty. (Parameter '{0}')")]
    InvalidArgument(&'static str),

    #[error("Integrity violation: more than one record has identifier {id}")]
    DuplicateId { id: Uuid },

    #[error("Integrity violation: filter matched more than one record")]
    AmbiguousMatch,

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Returns true for precondition violations raised before touching the store.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AppError::InvalidArgument(_))
    }

    /// Returns true when the store reported more matches than a unique lookup allows.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, AppError::DuplicateId { .. } | AppError::AmbiguousMatch)
    }
}
