//! Snapshot persistence of the whole task collection.
//!
//! # Responsibility
//! - Serialize the collection to JSON and keep it in one named slot.
//! - Recover from absent or corrupt snapshots without failing startup.
//!
//! # Invariants
//! - `save` always writes the full collection; there are no partial writes.
//! - `load` never returns a collection that breaks model invariants.
//! - A corrupt snapshot is removed so the next start does not trip on it.
//! - Snapshot content is never logged, only sizes and error categories.

use crate::model::task::TaskCollection;
use crate::repo::slot_repo::{RepoError, RepoResult, SlotRepository};
use log::{debug, error, info, warn};

/// Persistence contract used by the task store.
pub trait TaskPersistence {
    /// Restores the last saved collection.
    ///
    /// Absent and corrupt snapshots both yield an empty collection. `Err` is
    /// reserved for storage transport failures.
    fn load(&self) -> RepoResult<TaskCollection>;

    /// Overwrites the durable snapshot with `tasks`.
    fn save(&self, tasks: &TaskCollection) -> RepoResult<()>;
}

/// JSON snapshot adapter over a `SlotRepository`.
pub struct SnapshotStore<R: SlotRepository> {
    repo: R,
    slot_key: String,
}

impl<R: SlotRepository> SnapshotStore<R> {
    pub fn new(repo: R, slot_key: impl Into<String>) -> Self {
        Self {
            repo,
            slot_key: slot_key.into(),
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    fn discard_corrupt_slot(&self) {
        match self.repo.remove_slot(&self.slot_key) {
            Ok(_) => info!(
                "event=snapshot_discard module=repo status=ok slot={}",
                self.slot_key
            ),
            Err(err) => error!(
                "event=snapshot_discard module=repo status=error slot={} error={err}",
                self.slot_key
            ),
        }
    }
}

impl<R: SlotRepository> TaskPersistence for SnapshotStore<R> {
    fn load(&self) -> RepoResult<TaskCollection> {
        let raw = match self.repo.read_slot(&self.slot_key) {
            Ok(raw) => raw,
            Err(RepoError::CorruptValue { column_type, .. }) => {
                warn!(
                    "event=snapshot_load module=repo status=recovered slot={} reason=corrupt category=storage column_type={column_type}",
                    self.slot_key
                );
                self.discard_corrupt_slot();
                return Ok(TaskCollection::new());
            }
            Err(err) => return Err(err),
        };
        let Some(raw) = raw else {
            info!(
                "event=snapshot_load module=repo status=ok slot={} source=absent task_count=0",
                self.slot_key
            );
            return Ok(TaskCollection::new());
        };

        match serde_json::from_str::<TaskCollection>(&raw) {
            Ok(tasks) => {
                info!(
                    "event=snapshot_load module=repo status=ok slot={} source=slot task_count={}",
                    self.slot_key,
                    tasks.len()
                );
                Ok(tasks)
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=repo status=recovered slot={} reason=corrupt category={:?} line={} column={} bytes={}",
                    self.slot_key,
                    err.classify(),
                    err.line(),
                    err.column(),
                    raw.len()
                );
                self.discard_corrupt_slot();
                Ok(TaskCollection::new())
            }
        }
    }

    fn save(&self, tasks: &TaskCollection) -> RepoResult<()> {
        let raw = serde_json::to_string(tasks).map_err(RepoError::Encode)?;
        if let Err(err) = self.repo.write_slot(&self.slot_key, &raw) {
            error!(
                "event=snapshot_save module=repo status=error slot={} task_count={} error={err}",
                self.slot_key,
                tasks.len()
            );
            return Err(err);
        }
        debug!(
            "event=snapshot_save module=repo status=ok slot={} task_count={} bytes={}",
            self.slot_key,
            tasks.len(),
            raw.len()
        );
        Ok(())
    }
}
