//! Document-store abstraction.
//!
//! The repository layer only talks to [`DocumentStore`], a small async trait
//! covering the operations it needs from a collection. Two backends implement
//! it:
//!
//! - [`backends::mongo`] - MongoDB through the official async driver
//! - [`backends::memory`] - an in-process store with the same semantics
//!
//! [`Database`] is the long-lived handle shared by every repository; it hands
//! out collections bound to a record type.
//!
//! ```ignore
//! let database = Database::Memory(MemoryDatabase::new("catalog"));
//! let products: Arc<dyn DocumentStore<Product>> = database.collection("products");
//! let cheap = products.find(&Filter::lt("price", 10), None).await?;
//! ```

mod filter;
mod traits;

pub mod backends;

pub use filter::Filter;
pub use traits::{DocumentStore, WriteOutcome};

use std::sync::Arc;

use crate::error::AppError;
use crate::models::Entity;
use backends::memory::MemoryDatabase;
use backends::mongo::MongoCollection;

/// Handle to one database, cheap to clone and safe to share.
#[derive(Clone)]
pub enum Database {
    Mongo(mongodb::Database),
    Memory(MemoryDatabase),
}

impl Database {
    /// Returns the database name.
    pub fn name(&self) -> &str {
        match self {
            Database::Mongo(db) => db.name(),
            Database::Memory(db) => db.name(),
        }
    }

    /// Returns the named collection typed as `T`.
    pub fn collection<T: Entity>(&self, name: &str) -> Arc<dyn DocumentStore<T>> {
        match self {
            Database::Mongo(db) => Arc::new(MongoCollection::new(db, name)),
            Database::Memory(db) => Arc::new(db.collection::<T>(name)),
        }
    }

    /// Checks that the database answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        match self {
            Database::Mongo(db) => backends::mongo::ping(db).await,
            Database::Memory(_) => Ok(()),
        }
    }
}

impl From<mongodb::Database> for Database {
    fn from(db: mongodb::Database) -> Self {
        Database::Mongo(db)
    }
}

impl From<MemoryDatabase> for Database {
    fn from(db: MemoryDatabase) -> Self {
        Database::Memory(db)
    }
}
