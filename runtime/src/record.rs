//! Live task records.
//!
//! A [`TaskRecord`] wraps one task's [`TaskData`] with a typed change
//! emitter and a shared storage handle. The store creates records and is
//! their logical owner; sessions and views hold them as non-owning
//! collaborators and must route every mutation through [`toggle`],
//! [`save`], or [`clear`]; they never assign attributes directly.
//!
//! Mutations apply to memory first (memory is the authority), then write
//! through to storage, then notify. A storage failure is returned to the
//! caller but never rolls the mutation back and never suppresses the
//! notification.
//!
//! [`toggle`]: TaskRecord::toggle
//! [`save`]: TaskRecord::save
//! [`clear`]: TaskRecord::clear

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use taskwire_core::emitter::Emitter;
use taskwire_core::storage::{StorageError, TaskStorage};
use taskwire_core::task::{ChangedFields, TaskData, TaskId, TaskPatch};

/// Notifications a record emits about itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordEvent {
    /// One or more fields changed; the diff names which.
    Changed(ChangedFields),
    /// The record was destroyed. Emitted exactly once, ever.
    Destroyed,
}

/// One live task: durable data plus its change notifications.
pub struct TaskRecord {
    data: RefCell<TaskData>,
    destroyed: Cell<bool>,
    events: Emitter<RecordEvent>,
    storage: Rc<dyn TaskStorage>,
}

impl TaskRecord {
    /// Wraps loaded or freshly-created data. Only the store constructs
    /// records; everyone else receives them from store events or lookups.
    pub(crate) fn new(data: TaskData, storage: Rc<dyn TaskStorage>) -> Rc<Self> {
        Rc::new(Self {
            data: RefCell::new(data),
            destroyed: Cell::new(false),
            events: Emitter::new(),
            storage,
        })
    }

    /// This record's notifications.
    #[must_use]
    pub const fn events(&self) -> &Emitter<RecordEvent> {
        &self.events
    }

    /// The record's identifier.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.data.borrow().id
    }

    /// The record's insertion rank.
    #[must_use]
    pub fn order(&self) -> u64 {
        self.data.borrow().order
    }

    /// Current content.
    #[must_use]
    pub fn content(&self) -> String {
        self.data.borrow().content.clone()
    }

    /// Current completion flag.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.data.borrow().done
    }

    /// A copy of the current data, e.g. for rendering or persisting.
    #[must_use]
    pub fn snapshot(&self) -> TaskData {
        self.data.borrow().clone()
    }

    /// Whether [`clear`](Self::clear) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Flip the completion flag, persist, and notify.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::RecordDestroyed`] if the record is gone
    /// (nothing is applied), or the write-behind error if persisting
    /// failed (the in-memory flip and its notification stand).
    pub fn toggle(&self) -> Result<(), StorageError> {
        let done = !self.data.borrow().done;
        self.save(TaskPatch::done(done))
    }

    /// Merge a patch, persist, and notify with the fields that changed.
    ///
    /// The write-through happens even when the patch changes nothing (a
    /// commit is a commit); the notification only fires for real
    /// differences.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::RecordDestroyed`] if the record is gone
    /// (nothing is applied), or the write-behind error if persisting
    /// failed (the in-memory merge and its notification stand).
    pub fn save(&self, patch: TaskPatch) -> Result<(), StorageError> {
        if self.destroyed.get() {
            return Err(StorageError::RecordDestroyed(self.id()));
        }

        let (changed, snapshot) = {
            let mut data = self.data.borrow_mut();
            let changed = data.apply(patch);
            (changed, data.clone())
        };
        tracing::debug!(id = %snapshot.id, ?changed, "saving task");

        let persisted = self.storage.put(&snapshot);
        if changed.any() {
            self.events.emit(&RecordEvent::Changed(changed));
        }
        persisted
    }

    /// Destroy the record: delete from storage and emit [`RecordEvent::Destroyed`].
    ///
    /// Idempotent: the first call tears down, every later call is a
    /// no-op, so listeners see exactly one destruction notification and
    /// views are detached exactly once.
    ///
    /// # Errors
    ///
    /// Returns the write-behind error if the storage delete failed; the
    /// record is still destroyed in memory and the notification stands.
    pub fn clear(&self) -> Result<(), StorageError> {
        if self.destroyed.replace(true) {
            tracing::debug!(id = %self.id(), "ignoring repeated clear");
            return Ok(());
        }

        let id = self.id();
        tracing::debug!(%id, "destroying task");
        let persisted = self.storage.delete(id);
        self.events.emit(&RecordEvent::Destroyed);
        persisted
    }
}

impl std::fmt::Debug for TaskRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRecord")
            .field("data", &*self.data.borrow())
            .field("destroyed", &self.destroyed.get())
            .finish_non_exhaustive()
    }
}
