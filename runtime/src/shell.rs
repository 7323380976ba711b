//! The application shell: top-level wiring and aggregate display.
//!
//! The shell owns the store, reacts to every store event by refreshing
//! the aggregate view (stats summary, main/footer visibility, the
//! "all complete" checkbox), and maintains one editing session per live
//! record: created on `Added`, rebuilt wholesale on `Reset`, dropped
//! when a session announces its own destruction.
//!
//! The chrome, the pre-existing page skeleton the shell binds to, is a
//! set of DOM handles supplied by the host: the row list container, the
//! new-task input, the toggle-all checkbox, the main and footer sections,
//! and the stats container.

use crate::record::TaskRecord;
use crate::session::{EditingSession, SessionEvent};
use crate::store::{NewTask, StoreEvent, TaskStore};
use crate::view::TaskRow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use taskwire_core::emitter::Subscription;
use taskwire_core::storage::StorageError;
use taskwire_core::task::{Stats, TaskId, TaskPatch};
use taskwire_core::ui::{Key, NodeId, UiContext};

/// Handles to the pre-existing page skeleton the shell drives.
#[derive(Clone, Copy, Debug)]
pub struct ShellChrome {
    /// Container the task rows mount into.
    pub list: NodeId,
    /// The new-task input field.
    pub new_input: NodeId,
    /// The "mark all as done" checkbox.
    pub toggle_all: NodeId,
    /// The main section (hidden when the store is empty).
    pub main: NodeId,
    /// The footer section (hidden when the store is empty).
    pub footer: NodeId,
    /// Container the stats summary renders into.
    pub stats: NodeId,
}

/// Raw top-level user input, as observed by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppInput {
    /// A key was pressed in the new-task input.
    NewTaskKey(Key),
    /// The clear-completed button was clicked.
    ClearCompletedClick,
    /// The toggle-all checkbox was clicked (its new state is read back
    /// from the DOM).
    ToggleAllClick,
}

/// Top-level coordinator binding the store to the aggregate UI.
pub struct ApplicationShell {
    inner: Rc<ShellInner>,
}

struct ShellInner {
    weak_self: Weak<ShellInner>,
    store: TaskStore,
    ui: UiContext,
    chrome: ShellChrome,
    sessions: RefCell<HashMap<TaskId, (EditingSession, Subscription)>>,
    subs: RefCell<Vec<Subscription>>,
}

impl ApplicationShell {
    /// Wires the shell to the store and renders the initial (empty)
    /// aggregate state. Call [`load`](Self::load) to pull persisted tasks.
    #[must_use]
    pub fn new(store: TaskStore, ui: UiContext, chrome: ShellChrome) -> Self {
        let inner = Rc::new_cyclic(|weak_self| ShellInner {
            weak_self: weak_self.clone(),
            store,
            ui,
            chrome,
            sessions: RefCell::new(HashMap::new()),
            subs: RefCell::new(Vec::new()),
        });

        // One subscription is both the row-list maintenance hook and the
        // catch-all aggregate refresh: every store event re-renders the
        // stats cheaply after any specific reaction.
        let sub = inner.store.events().subscribe({
            let weak = Rc::downgrade(&inner);
            move |event| {
                let Some(shell) = weak.upgrade() else { return };
                match event {
                    StoreEvent::Added(record) => shell.add_one(record),
                    StoreEvent::Reset => shell.add_all(),
                    StoreEvent::Removed(_) | StoreEvent::Changed { .. } => {}
                }
                shell.render();
            }
        });
        inner.subs.borrow_mut().push(sub);

        inner.render();
        Self { inner }
    }

    /// Bulk-load persisted tasks; the store's `Reset` then rebuilds the
    /// row list through the regular event path.
    ///
    /// # Errors
    ///
    /// Returns the storage load error; the shell stays usable with its
    /// current (typically empty) membership.
    pub fn load(&self) -> Result<(), StorageError> {
        self.inner.store.fetch()
    }

    /// Route raw top-level input to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns the first write-behind [`StorageError`] the operation hit;
    /// all in-memory effects have been applied regardless.
    pub fn handle_input(&self, input: AppInput) -> Result<(), StorageError> {
        match input {
            AppInput::NewTaskKey(key) => self.inner.create_on_enter(key),
            AppInput::ClearCompletedClick => self.inner.clear_completed(),
            AppInput::ToggleAllClick => self.inner.toggle_all_complete(),
        }
    }

    /// Current aggregate counts.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.inner.store.stats()
    }

    /// The store this shell drives.
    #[must_use]
    pub fn store(&self) -> &TaskStore {
        &self.inner.store
    }

    /// The row view for a live task, if the task exists.
    ///
    /// Returned by value (rows are cheap shared handles) so hosts can
    /// deliver input without the shell holding any internal borrow while
    /// the resulting handlers run; an input that destroys the task removes
    /// its session from the shell's own bookkeeping mid-delivery.
    #[must_use]
    pub fn view_of(&self, id: TaskId) -> Option<TaskRow> {
        self.inner
            .sessions
            .borrow()
            .get(&id)
            .map(|(session, _)| session.view().clone())
    }

    /// Whether a task is currently being edited. `None` if the task does
    /// not exist.
    #[must_use]
    pub fn editing_of(&self, id: TaskId) -> Option<bool> {
        self.inner
            .sessions
            .borrow()
            .get(&id)
            .map(|(session, _)| session.editing())
    }

    /// Number of live editing sessions (one per live record).
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.inner.sessions.borrow().len()
    }
}

impl ShellInner {
    /// Wrap one record in an editing session and mount its row at the end
    /// of the list. The session's destruction signal drops the bookkeeping.
    fn add_one(&self, record: &Rc<TaskRecord>) {
        let id = record.id();
        tracing::debug!(%id, "adding row for task");
        let session = EditingSession::new(Rc::clone(record), &self.ui, self.chrome.list);

        let sub = session.events().subscribe({
            let weak = self.weak_self.clone();
            move |event| {
                if matches!(event, SessionEvent::Destroyed) {
                    if let Some(shell) = weak.upgrade() {
                        shell.sessions.borrow_mut().remove(&id);
                    }
                }
            }
        });
        self.sessions.borrow_mut().insert(id, (session, sub));
    }

    /// Rebuild the whole row list from the store, in store order. Used
    /// after a bulk load; dropping the old sessions detaches their rows.
    fn add_all(&self) {
        self.sessions.borrow_mut().clear();
        for record in self.store.records() {
            self.add_one(&record);
        }
    }

    /// Refresh the aggregate view. Hidden chrome when the store is empty,
    /// otherwise a fresh stats fragment; the toggle-all checkbox mirrors
    /// "nothing remaining".
    fn render(&self) {
        let stats = self.store.stats();
        let dom = &self.ui.dom;

        if stats.total == 0 {
            dom.set_visible(self.chrome.main, false);
            dom.set_visible(self.chrome.footer, false);
        } else {
            dom.set_visible(self.chrome.main, true);
            dom.set_visible(self.chrome.footer, true);
            dom.update(self.chrome.stats, &self.ui.templates.render_stats(&stats));
        }

        dom.set_checked(self.chrome.toggle_all, stats.remaining == 0);
    }

    /// Create a task from the new-task input on Enter; other keys are
    /// ignored without error. The input is blanked after creation.
    fn create_on_enter(&self, key: Key) -> Result<(), StorageError> {
        if !key.is_enter() {
            return Ok(());
        }

        let content = self.ui.dom.input_text(self.chrome.new_input);
        let created = self.store.create(NewTask {
            content: Some(content),
            done: false,
        });
        self.ui.dom.set_input_text(self.chrome.new_input, "");
        created.map(|_| ())
    }

    /// Destroy every currently-done task.
    #[tracing::instrument(skip(self), name = "clear_completed")]
    fn clear_completed(&self) -> Result<(), StorageError> {
        let done = self.store.done();
        tracing::debug!(count = done.len(), "clearing completed tasks");

        let mut first_error = None;
        for record in done {
            if let Err(error) = record.clear() {
                tracing::warn!(id = %record.id(), %error, "clear not persisted");
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Set every task's completion flag to match the toggle-all checkbox.
    #[tracing::instrument(skip(self), name = "toggle_all_complete")]
    fn toggle_all_complete(&self) -> Result<(), StorageError> {
        let done = self.ui.dom.checked(self.chrome.toggle_all);
        tracing::debug!(done, "toggling all tasks");

        let mut first_error = None;
        for record in self.store.records() {
            if let Err(error) = record.save(TaskPatch::done(done)) {
                tracing::warn!(id = %record.id(), %error, "toggle-all not persisted");
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for ApplicationShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationShell")
            .field("sessions", &self.session_count())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
