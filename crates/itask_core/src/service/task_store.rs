//! Task store: the single mutation surface over the task collection.
//!
//! # Responsibility
//! - Own the authoritative in-memory collection and the view flag.
//! - Persist the full collection after every successful mutation.
//!
//! # Invariants
//! - Mutations are staged on a copy and committed in memory only after
//!   `save` succeeds, so memory and the durable slot never diverge.
//! - `begin_edit` removes the task for good; resubmitting goes through `add`
//!   and produces a new id.
//! - The view flag is never persisted.

use crate::model::task::{Task, TaskCollection, TaskId, TaskValidationError};
use crate::repo::slot_repo::{RepoError, RepoResult};
use crate::repo::snapshot_store::TaskPersistence;
use crate::view::projection::{self, TaskCounts};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Errors returned by task store operations.
#[derive(Debug)]
pub enum TaskStoreError {
    /// Input text failed validation; nothing changed.
    Validation(TaskValidationError),
    /// No task with this id; nothing changed.
    NotFound(TaskId),
    /// The durable write failed; the mutation was not applied.
    Persistence(RepoError),
}

impl TaskStoreError {
    /// Whether the caller can treat this as a local, non-fatal condition.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Persistence(err) => write!(f, "failed to persist tasks: {err}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskStoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Owner of the task collection and its persistence.
pub struct TaskStore<P: TaskPersistence> {
    persistence: P,
    tasks: TaskCollection,
    show_completed: bool,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Restores the collection through `persistence` and builds the store.
    ///
    /// Finished tasks are shown until `set_show_completed(false)`.
    pub fn open(persistence: P) -> RepoResult<Self> {
        let tasks = persistence.load()?;
        info!(
            "event=store_open module=store status=ok task_count={}",
            tasks.len()
        );
        Ok(Self {
            persistence,
            tasks,
            show_completed: true,
        })
    }

    /// Appends a new task built from trimmed `text`.
    ///
    /// # Errors
    /// - `Validation` when trimmed `text` is 3 chars or shorter.
    /// - `Persistence` when the snapshot write fails.
    pub fn add(&mut self, text: &str) -> TaskStoreResult<TaskId> {
        let task = Task::new(text).inspect_err(|_| {
            debug!("event=task_add module=store status=rejected reason=validation");
        })?;
        let id = task.id();

        let mut next = self.tasks.clone();
        next.push(task)?;
        self.commit("task_add", next)?;

        info!("event=task_add module=store status=ok task_id={id}");
        Ok(id)
    }

    /// Removes the task and hands back its text for re-entry.
    ///
    /// The task is gone once this returns, whether or not the caller ever
    /// resubmits the text through `add`.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`.
    /// - `Persistence` when the snapshot write fails; the task is kept.
    pub fn begin_edit(&mut self, id: TaskId) -> TaskStoreResult<String> {
        let mut next = self.tasks.clone();
        let removed = next.remove(id).ok_or_else(|| not_found("task_edit", id))?;
        self.commit("task_edit", next)?;

        info!("event=task_edit module=store status=ok task_id={id}");
        Ok(removed.text().to_string())
    }

    /// Flips the completion flag and returns its new value.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`.
    /// - `Persistence` when the snapshot write fails.
    pub fn toggle_completed(&mut self, id: TaskId) -> TaskStoreResult<bool> {
        let mut next = self.tasks.clone();
        let completed = next
            .get_mut(id)
            .ok_or_else(|| not_found("task_toggle", id))?
            .toggle_completed();
        self.commit("task_toggle", next)?;

        info!("event=task_toggle module=store status=ok task_id={id} completed={completed}");
        Ok(completed)
    }

    /// Removes the task if present. Returns whether anything was removed.
    ///
    /// Missing ids are a no-op and do not write the snapshot.
    pub fn delete(&mut self, id: TaskId) -> TaskStoreResult<bool> {
        if !self.tasks.contains(id) {
            debug!("event=task_delete module=store status=noop task_id={id}");
            return Ok(false);
        }

        let mut next = self.tasks.clone();
        next.remove(id);
        self.commit("task_delete", next)?;

        info!("event=task_delete module=store status=ok task_id={id}");
        Ok(true)
    }

    pub fn set_show_completed(&mut self, show_completed: bool) {
        self.show_completed = show_completed;
    }

    /// Flips the view flag and returns its new value.
    pub fn toggle_show_completed(&mut self) -> bool {
        self.show_completed = !self.show_completed;
        self.show_completed
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Tasks to render under the current view flag, in insertion order.
    pub fn visible(&self) -> impl Iterator<Item = &Task> + Clone + '_ {
        projection::visible(&self.tasks, self.show_completed)
    }

    pub fn counts(&self) -> TaskCounts {
        projection::counts(&self.tasks)
    }

    pub fn tasks(&self) -> &TaskCollection {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    fn commit(&mut self, event: &'static str, next: TaskCollection) -> TaskStoreResult<()> {
        if let Err(err) = self.persistence.save(&next) {
            warn!("event={event} module=store status=error error_code=persist_failed error={err}");
            return Err(err.into());
        }
        self.tasks = next;
        Ok(())
    }
}

fn not_found(event: &'static str, id: TaskId) -> TaskStoreError {
    debug!("event={event} module=store status=rejected reason=not_found task_id={id}");
    TaskStoreError::NotFound(id)
}
