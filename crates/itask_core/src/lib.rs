//! Core task-state logic for iTask.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{ConfigError, CoreConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::task::{
    normalize_task_text, Task, TaskCollection, TaskId, TaskValidationError, MIN_TASK_TEXT_CHARS,
};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use repo::snapshot_store::{SnapshotStore, TaskPersistence};
pub use service::task_store::{TaskStore, TaskStoreError, TaskStoreResult};
pub use view::projection::{can_submit, draft_hint, TaskCounts, DRAFT_TOO_SHORT_HINT};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
