//! Backend implementations of [`DocumentStore`](crate::store::DocumentStore).
//!
//! | Backend | Module | Use |
//! |---------|--------|-----|
//! | MongoDB | [`mongo`] | Production |
//! | In-process | [`memory`] | Tests, offline tooling |
//!
//! Both serialize records with the same serde path, so the string codecs in
//! [`crate::codec`] produce identical documents on either backend.

pub mod memory;
pub mod mongo;
