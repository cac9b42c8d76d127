//! Entity capability shared by every stored record type.

mod entity;

pub use entity::{Entity, ID_FIELD};
