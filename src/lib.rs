//! Spalce Common - typed repositories over a document store
//!
//! A generic CRUD repository bound to one collection, answering every call
//! with a uniform [`Response`] envelope.
//!
//! ```ignore
//! use spalce_common::{Config, Context, Filter, Repository};
//!
//! let ctx = Context::connect(Config::load()?).await?;
//! let products = ctx.repository::<Product>("products");
//!
//! products.create(product).await?;
//! let cheap = products.get_all_where(Filter::lt("price", 10)).await?;
//! ```

pub mod codec;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod models;
pub mod repositories;
pub mod response;
pub mod store;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;

pub use config::Config;
pub use context::Context;
pub use error::AppError;
pub use models::Entity;
pub use repositories::{DocumentRepository, Repository, RepositoryFactory};
pub use response::Response;
pub use store::{Database, DocumentStore, Filter};
