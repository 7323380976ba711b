//! The task store: ordered membership plus persistence.
//!
//! A [`TaskStore`] owns the set of live [`TaskRecord`]s, keeps it sorted
//! by insertion rank at all times, and emits one typed stream of
//! [`StoreEvent`]s. There is no ambient global collection; a store is
//! explicitly constructed over an injected [`TaskStorage`] and handed to
//! whoever needs it (cloning the handle shares the same store).
//!
//! # The catch-all hook
//!
//! Consumers that want one hook for "anything happened" (the shell's
//! aggregate refresh) simply subscribe: every membership or member change
//! arrives on the same stream. Specific reactions are pattern matches on
//! the variants.

use crate::record::{RecordEvent, TaskRecord};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use taskwire_core::emitter::{Emitter, Subscription};
use taskwire_core::storage::{StorageError, TaskStorage};
use taskwire_core::task::{ChangedFields, Stats, TaskData, TaskId};

/// Notifications a store emits about its membership and members.
#[derive(Clone, Debug)]
pub enum StoreEvent {
    /// A record was created and inserted.
    Added(Rc<TaskRecord>),
    /// A destroyed record left the membership.
    Removed(TaskId),
    /// A member record's fields changed (forwarded from the record).
    Changed {
        /// The record that changed.
        id: TaskId,
        /// Which fields changed.
        fields: ChangedFields,
    },
    /// The whole membership was replaced by a bulk load. Emitted instead
    /// of per-item [`Added`](Self::Added) events so consumers bulk-render.
    Reset,
}

/// Attributes for a new task. The store assigns the id and the order.
#[derive(Clone, Debug, Default)]
pub struct NewTask {
    /// Content; a missing content is coerced to the default (empty).
    pub content: Option<String>,
    /// Initial completion flag. UI creation always passes `false`.
    pub done: bool,
}

impl NewTask {
    /// A draft with the given content and `done = false`.
    #[must_use]
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            done: false,
        }
    }
}

/// The ordered collection of live tasks. Cheap to clone; clones share.
#[derive(Clone)]
pub struct TaskStore {
    inner: Rc<StoreInner>,
}

struct StoreInner {
    weak_self: Weak<StoreInner>,
    records: RefCell<Vec<Rc<TaskRecord>>>,
    record_subs: RefCell<HashMap<TaskId, Subscription>>,
    events: Emitter<StoreEvent>,
    storage: Rc<dyn TaskStorage>,
}

impl TaskStore {
    /// Creates an empty store over the given storage collaborator.
    ///
    /// Call [`fetch`](Self::fetch) to bulk-load persisted tasks.
    #[must_use]
    pub fn new(storage: Rc<dyn TaskStorage>) -> Self {
        let inner = Rc::new_cyclic(|weak_self| StoreInner {
            weak_self: weak_self.clone(),
            records: RefCell::new(Vec::new()),
            record_subs: RefCell::new(HashMap::new()),
            events: Emitter::new(),
            storage,
        });
        Self { inner }
    }

    /// This store's notifications. Subscribing to it IS the catch-all
    /// "anything happened" hook.
    #[must_use]
    pub fn events(&self) -> &Emitter<StoreEvent> {
        &self.inner.events
    }

    /// Create a task with a fresh id and the next insertion rank, insert
    /// it, persist it, and emit [`StoreEvent::Added`].
    ///
    /// # Errors
    ///
    /// On a storage failure the record is still in the store and the
    /// `Added` notification has already fired (memory is the authority);
    /// the error reports the failed write-behind. The record handle also
    /// travels in the `Added` event and via [`get`](Self::get).
    pub fn create(&self, draft: NewTask) -> Result<Rc<TaskRecord>, StorageError> {
        let data = TaskData::new(TaskId::new(), draft.content, draft.done, self.next_order());
        tracing::debug!(id = %data.id, order = data.order, "creating task");

        let record = TaskRecord::new(data, Rc::clone(&self.inner.storage));
        self.inner.attach(&record);
        self.inner.insert_sorted(Rc::clone(&record));

        let persisted = self.inner.storage.put(&record.snapshot());
        self.inner.events.emit(&StoreEvent::Added(Rc::clone(&record)));
        persisted.map(|()| record)
    }

    /// The next insertion rank: `1` for an empty store, else the last
    /// element's rank plus one.
    ///
    /// Reading the last element instead of scanning for the max is valid
    /// only because ranks are assigned once at creation and never
    /// renumbered, so the ascending sort keeps the max at the end.
    #[must_use]
    pub fn next_order(&self) -> u64 {
        self.inner
            .records
            .borrow()
            .last()
            .map_or(1, |record| record.order() + 1)
    }

    /// Bulk-load persisted tasks, replacing the membership, and emit a
    /// single [`StoreEvent::Reset`].
    ///
    /// # Errors
    ///
    /// Returns the load error; the membership is untouched in that case.
    #[tracing::instrument(skip(self), name = "store_fetch")]
    pub fn fetch(&self) -> Result<(), StorageError> {
        let mut loaded = self.inner.storage.load_all()?;
        loaded.sort_by_key(|task| task.order);
        tracing::debug!(count = loaded.len(), "fetched persisted tasks");

        self.inner.record_subs.borrow_mut().clear();
        let records: Vec<Rc<TaskRecord>> = loaded
            .into_iter()
            .map(|data| {
                let record = TaskRecord::new(data, Rc::clone(&self.inner.storage));
                self.inner.attach(&record);
                record
            })
            .collect();
        *self.inner.records.borrow_mut() = records;

        self.inner.events.emit(&StoreEvent::Reset);
        Ok(())
    }

    /// Finished tasks, in store order. Pure filter, no side effects.
    #[must_use]
    pub fn done(&self) -> Vec<Rc<TaskRecord>> {
        self.inner
            .records
            .borrow()
            .iter()
            .filter(|record| record.is_done())
            .map(Rc::clone)
            .collect()
    }

    /// Unfinished tasks, in store order. Complement of [`done`](Self::done).
    #[must_use]
    pub fn remaining(&self) -> Vec<Rc<TaskRecord>> {
        self.inner
            .records
            .borrow()
            .iter()
            .filter(|record| !record.is_done())
            .map(Rc::clone)
            .collect()
    }

    /// The full membership, sorted by insertion rank.
    #[must_use]
    pub fn records(&self) -> Vec<Rc<TaskRecord>> {
        self.inner.records.borrow().iter().map(Rc::clone).collect()
    }

    /// Look up one member.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Rc<TaskRecord>> {
        self.inner
            .records
            .borrow()
            .iter()
            .find(|record| record.id() == id)
            .map(Rc::clone)
    }

    /// Number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.records.borrow().len()
    }

    /// Whether the store has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.records.borrow().is_empty()
    }

    /// Aggregate counts over the membership.
    #[must_use]
    pub fn stats(&self) -> Stats {
        let records = self.inner.records.borrow();
        let done = records.iter().filter(|record| record.is_done()).count();
        Stats {
            total: records.len(),
            done,
            remaining: records.len() - done,
        }
    }
}

impl StoreInner {
    /// Subscribe to a member record, forwarding changes and reacting to
    /// destruction by dropping it from the membership.
    fn attach(&self, record: &Rc<TaskRecord>) {
        let id = record.id();
        let weak = self.weak_self.clone();
        let sub = record.events().subscribe(move |event| {
            let Some(store) = weak.upgrade() else { return };
            match event {
                RecordEvent::Changed(fields) => {
                    store.events.emit(&StoreEvent::Changed { id, fields: *fields });
                }
                RecordEvent::Destroyed => store.on_record_destroyed(id),
            }
        });
        self.record_subs.borrow_mut().insert(id, sub);
    }

    /// Insert keeping the ascending-rank order, whatever the mutation
    /// history looks like.
    fn insert_sorted(&self, record: Rc<TaskRecord>) {
        let mut records = self.records.borrow_mut();
        let at = records.partition_point(|existing| existing.order() <= record.order());
        records.insert(at, record);
    }

    fn on_record_destroyed(&self, id: TaskId) {
        tracing::debug!(%id, "removing destroyed task from store");
        self.records.borrow_mut().retain(|record| record.id() != id);
        self.record_subs.borrow_mut().remove(&id);
        self.events.emit(&StoreEvent::Removed(id));
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
