//! Core use-case services.
//!
//! # Responsibility
//! - Expose the mutation surface the presentation layer calls into.
//! - Keep presentation code decoupled from storage details.

pub mod task_store;
