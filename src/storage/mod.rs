//! Storage collaborator.
//!
//! The host owns persistence. This module defines the narrow interface the
//! widget needs from it and a typed layer on top.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`StorageBackend`] | Trait the host implements: raw get/set per scoped key |
//! | [`StorageKey`] / [`Scope`] | User, instance-summary and settings scopes |
//! | [`MemoryStorage`] | In-process backend for tests and demos |
//! | [`NullStorage`] | Backend that keeps nothing |
//! | [`StateStore`] | JSON (de)serialization of widget records, with stats |
//!
//! ## Consistency
//!
//! Reads and writes are independent; there is no transaction around a
//! vote's read-modify-write of the tally. Two concurrent votes may lose an
//! update, and the last write wins. The tally is advisory, so that is
//! accepted.

mod backend;
mod key;
mod store;

pub use backend::{MemoryStorage, NullStorage, StorageBackend, StorageError};
pub use key::{Scope, StorageKey};
pub use store::{StateStore, StoreStats, AGGREGATE_FIELD, SETTINGS_FIELD, USER_STATE_FIELD};
