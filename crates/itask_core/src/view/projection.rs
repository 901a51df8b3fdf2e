//! Visible-task filtering, aggregate counts and input hints.
//!
//! # Responsibility
//! - Derive what the presentation layer renders from `(tasks, show_completed)`.
//! - Mirror the add-form validation so callers can gate the submit action.
//!
//! # Invariants
//! - `visible` preserves insertion order and is recomputed on every call.
//! - Nothing here touches persistence.

use crate::model::task::{normalize_task_text, Task, TaskCollection};

/// Hint shown next to a draft that is too short to submit.
pub const DRAFT_TOO_SHORT_HINT: &str = "Todo must be at least 4 characters.";

/// Aggregate counters shown in the list header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// Number of tasks in the collection.
    pub total: usize,
    /// Number of tasks not yet completed.
    pub remaining: usize,
}

impl TaskCounts {
    pub fn completed(&self) -> usize {
        self.total - self.remaining
    }
}

/// Returns the tasks to display, in insertion order.
///
/// Completed tasks are skipped unless `show_completed` is set. The iterator
/// borrows `tasks` and can be cloned to restart from the beginning.
pub fn visible(
    tasks: &TaskCollection,
    show_completed: bool,
) -> impl Iterator<Item = &Task> + Clone + '_ {
    tasks
        .iter()
        .filter(move |task| show_completed || !task.is_completed())
}

pub fn counts(tasks: &TaskCollection) -> TaskCounts {
    TaskCounts {
        total: tasks.len(),
        remaining: tasks.iter().filter(|task| !task.is_completed()).count(),
    }
}

/// Whether `raw` would pass `add` validation.
pub fn can_submit(raw: &str) -> bool {
    normalize_task_text(raw).is_ok()
}

/// Returns the too-short hint for a non-empty draft that cannot be submitted.
pub fn draft_hint(raw: &str) -> Option<&'static str> {
    if raw.is_empty() || can_submit(raw) {
        None
    } else {
        Some(DRAFT_TOO_SHORT_HINT)
    }
}
