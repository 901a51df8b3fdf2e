//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable slot contract and its SQLite implementation.
//! - Map the task collection to and from its serialized snapshot.
//!
//! # Invariants
//! - Storage transport failures surface as `RepoError`, never panics.
//! - Corrupt snapshots are recovered here and never reach the store.

pub mod slot_repo;
pub mod snapshot_store;
