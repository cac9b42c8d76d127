//! The `Entity` trait binding a record type to its unique identifier.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Document key holding the entity identifier.
pub const ID_FIELD: &str = "_id";

/// A record type stored in one collection and addressed by a unique identifier.
///
/// The repository interprets nothing but the identifier. Implementors must
/// serialize it under [`ID_FIELD`] as a string, which is what
/// [`codec::uuid_string`](crate::codec::uuid_string) does:
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// pub struct Product {
///     #[serde(rename = "_id", with = "spalce_common::codec::uuid_string")]
///     pub id: Uuid,
///     pub name: String,
/// }
///
/// impl Entity for Product {
///     fn id(&self) -> Uuid {
///         self.id
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Returns the unique identifier.
    fn id(&self) -> Uuid;
}
