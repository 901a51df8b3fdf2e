//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and the ordered collection that owns it.
//! - Normalize and validate task text before any record exists.
//!
//! # Invariants
//! - `id` is a non-nil v4 UUID, immutable and never reused.
//! - `text` is trimmed and at least `MIN_TASK_TEXT_CHARS` chars long.
//! - A `TaskCollection` never holds two tasks with the same `id`.
//! - Collection order is insertion order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one task.
pub type TaskId = Uuid;

/// Minimum number of chars a trimmed task text must have.
pub const MIN_TASK_TEXT_CHARS: usize = 4;

/// Validation failures for task records and collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Nil UUID is reserved and cannot identify a task.
    NilId,
    /// Trimmed text is shorter than `MIN_TASK_TEXT_CHARS`.
    TextTooShort {
        min_chars: usize,
        actual_chars: usize,
    },
    /// Two tasks share one id.
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be the nil uuid"),
            Self::TextTooShort {
                min_chars,
                actual_chars,
            } => write!(
                f,
                "task text must have at least {min_chars} characters, got {actual_chars}"
            ),
            Self::DuplicateId(id) => write!(f, "duplicate task id: {id}"),
        }
    }
}

impl Error for TaskValidationError {}

/// Trims `raw` and checks the minimum length.
///
/// Returns the trimmed text that would be stored.
pub fn normalize_task_text(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    let actual_chars = trimmed.chars().count();
    if actual_chars < MIN_TASK_TEXT_CHARS {
        return Err(TaskValidationError::TextTooShort {
            min_chars: MIN_TASK_TEXT_CHARS,
            actual_chars,
        });
    }
    Ok(trimmed.to_string())
}

/// One to-do item.
///
/// Fields are private so that a `Task` can only exist in a valid state.
/// Snapshots written by older clients used `todo` and `isCompleted`; both
/// names are still accepted when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: TaskId,
    text: String,
    completed: bool,
}

impl Task {
    /// Creates a not-yet-completed task with a freshly generated id.
    ///
    /// # Errors
    /// - `TextTooShort` when trimmed `text` is under the minimum length.
    pub fn new(text: &str) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates a not-yet-completed task with a caller-provided id.
    ///
    /// Used by restore paths and tests where identity already exists.
    pub fn with_id(id: TaskId, text: &str) -> Result<Self, TaskValidationError> {
        if id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        Ok(Self {
            id,
            text: normalize_task_text(text)?,
            completed: false,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Builder-style setter for restore paths and fixtures.
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub(crate) fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    #[serde(alias = "todo")]
    text: String,
    #[serde(alias = "isCompleted", default)]
    completed: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Ok(Task::with_id(record.id, &record.text)?.completed(record.completed))
    }
}

/// Insertion-ordered, id-unique sequence of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Task>", into = "Vec<Task>")]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection, rejecting duplicate ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, TaskValidationError> {
        let mut collection = Self::new();
        for task in tasks {
            collection.push(task)?;
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Appends `task` at the end.
    ///
    /// # Errors
    /// - `DuplicateId` when a task with the same id is already present.
    pub fn push(&mut self, task: Task) -> Result<(), TaskValidationError> {
        if self.contains(task.id) {
            return Err(TaskValidationError::DuplicateId(task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Removes the task with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

impl TryFrom<Vec<Task>> for TaskCollection {
    type Error = TaskValidationError;

    fn try_from(tasks: Vec<Task>) -> Result<Self, Self::Error> {
        Self::from_tasks(tasks)
    }
}

impl From<TaskCollection> for Vec<Task> {
    fn from(collection: TaskCollection) -> Self {
        collection.tasks
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_task_text, Task, TaskCollection, TaskValidationError};
    use uuid::Uuid;

    #[test]
    fn normalize_trims_and_counts_chars_not_bytes() {
        assert_eq!(normalize_task_text("  Buy milk \n").unwrap(), "Buy milk");
        assert_eq!(normalize_task_text("éèêë").unwrap(), "éèêë");
        assert_eq!(
            normalize_task_text(" abc ").unwrap_err(),
            TaskValidationError::TextTooShort {
                min_chars: 4,
                actual_chars: 3
            }
        );
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let first = Task::new("first task").unwrap();
        let second = Task::new("second task").unwrap();
        let third = Task::new("third task").unwrap();
        let mut collection =
            TaskCollection::from_tasks(vec![first.clone(), second.clone(), third.clone()])
                .unwrap();

        let removed = collection.remove(second.id()).unwrap();
        assert_eq!(removed, second);

        let ids: Vec<Uuid> = collection.iter().map(Task::id).collect();
        assert_eq!(ids, vec![first.id(), third.id()]);
        assert!(collection.remove(second.id()).is_none());
    }
}
