//! Read-only projections of the task collection for presentation.
//!
//! # Invariants
//! - Projections never mutate or cache the collection.

pub mod projection;
