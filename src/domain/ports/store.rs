use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::outcome::CheckOutcome;
use crate::domain::entities::target::Target;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("state read failed: {0}")]
    ReadFailed(String),
    #[error("state write failed: {0}")]
    WriteFailed(String),
}

/// Owns the list of monitored targets and mirrors every mutation to durable
/// storage.
///
/// The in-memory list is the source of truth during a run; `append` and
/// `update_status` are serialized against each other, and `snapshot` observes
/// either the pre- or post-write state, never a torn one.
pub trait TargetStore: Send + Sync {
    /// Read-only copy of the current target list, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the in-memory state is unreadable.
    fn snapshot(&self) -> Result<Vec<Target>, StoreError>;

    /// Add a target and synchronously persist the full list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails; the target stays in the
    /// in-memory list, which remains authoritative until the next successful
    /// write.
    fn append(&self, target: Target) -> Result<(), StoreError>;

    /// Replace the target's `last_status` with the outcome stamped `now`,
    /// then persist. An unknown id is a silent no-op — the target may have
    /// been removed by an external edit of the backing file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    fn update_status(&self, id: Uuid, outcome: CheckOutcome) -> Result<(), StoreError>;

    /// Re-read the backing storage into memory, discarding the in-memory
    /// list. Supports external edits between check cycles.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the in-memory state cannot be replaced.
    fn reload(&self) -> Result<(), StoreError>;
}
