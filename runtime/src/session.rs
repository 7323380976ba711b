//! Editing sessions: the per-task mediator between a record and its view.
//!
//! An [`EditingSession`] is the only component permitted to mutate a
//! record on behalf of UI actions. It owns exactly one [`TaskRow`]
//! (created with the session, detached when the session dies), holds the
//! record as a non-owning collaborator, and carries the one piece of
//! state that is ephemeral rather than durable: whether the task is
//! currently being edited.
//!
//! # State machine
//!
//! Two states on `editing`, initial `false`:
//!
//! - `StartEditing` intent, only from `editing == false` → `true`; the
//!   view reacts by entering edit-display mode.
//! - `Close` intent → `editing = false` AND, from a separate handler on
//!   the same intent, an unconditional commit of the view's current text
//!   to the record. Both effects fire on every close, whether or not the
//!   text changed; the text is read while the field is still populated.
//! - `ToggleDone` and `Clear` intents route straight to the record and
//!   never touch `editing`.
//!
//! When the record emits `Destroyed` the session tears down exactly once:
//! detach the owned view, emit the session's own [`SessionEvent::Destroyed`],
//! and dispose every subscription so nothing stays bound to a dead record.

use crate::record::{RecordEvent, TaskRecord};
use crate::view::{Intent, TaskRow};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use taskwire_core::emitter::{Emitter, Subscription};
use taskwire_core::task::TaskPatch;
use taskwire_core::ui::{NodeId, UiContext};

/// Notifications a session emits about itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The editing flag actually changed state.
    EditingChanged(bool),
    /// The session tore down (its record was destroyed). Emitted exactly
    /// once; the owning container drops its bookkeeping on this signal.
    Destroyed,
}

/// Per-task mediator owning the task's view and its editing state.
pub struct EditingSession {
    inner: Rc<SessionInner>,
}

struct SessionInner {
    record: Rc<TaskRecord>,
    view: TaskRow,
    editing: Cell<bool>,
    destroyed: Cell<bool>,
    events: Emitter<SessionEvent>,
    subs: RefCell<Vec<Subscription>>,
}

impl EditingSession {
    /// Creates the session and its view, mounting the row under `list`,
    /// and wires all intent and lifecycle listeners.
    #[must_use]
    pub fn new(record: Rc<TaskRecord>, ui: &UiContext, list: NodeId) -> Self {
        let view = TaskRow::new(Rc::clone(&record), ui.clone(), list);
        let inner = Rc::new(SessionInner {
            record,
            view,
            editing: Cell::new(false),
            destroyed: Cell::new(false),
            events: Emitter::new(),
            subs: RefCell::new(Vec::new()),
        });

        let mut subs = Vec::new();

        // The view follows the session's editing state.
        subs.push(inner.events.subscribe({
            let view = inner.view.clone();
            move |event| {
                if let SessionEvent::EditingChanged(editing) = event {
                    view.set_editing(*editing);
                }
            }
        }));

        // Intent routing. Close is handled by two separate listeners, in
        // this registration order: leave editing mode, then commit the
        // field's text. Both always fire on the same intent.
        subs.push(inner.view.intents().subscribe({
            let weak = Rc::downgrade(&inner);
            move |intent| {
                if let Some(session) = weak.upgrade() {
                    session.on_intent(*intent);
                }
            }
        }));
        subs.push(inner.view.intents().subscribe({
            let weak = Rc::downgrade(&inner);
            move |intent| {
                if *intent == Intent::Close {
                    if let Some(session) = weak.upgrade() {
                        session.commit_text();
                    }
                }
            }
        }));

        // Tear down when (and only when) the record is destroyed.
        subs.push(inner.record.events().subscribe({
            let weak = Rc::downgrade(&inner);
            move |event| {
                if matches!(event, RecordEvent::Destroyed) {
                    if let Some(session) = weak.upgrade() {
                        session.teardown();
                    }
                }
            }
        }));

        *inner.subs.borrow_mut() = subs;
        Self { inner }
    }

    /// The mediated record.
    #[must_use]
    pub fn record(&self) -> &Rc<TaskRecord> {
        &self.inner.record
    }

    /// The owned view.
    #[must_use]
    pub fn view(&self) -> &TaskRow {
        &self.inner.view
    }

    /// Whether the task is currently being edited.
    #[must_use]
    pub fn editing(&self) -> bool {
        self.inner.editing.get()
    }

    /// This session's notifications.
    #[must_use]
    pub fn events(&self) -> &Emitter<SessionEvent> {
        &self.inner.events
    }

    /// Whether the session has torn down.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }
}

impl SessionInner {
    fn on_intent(&self, intent: Intent) {
        match intent {
            Intent::ToggleDone => {
                if let Err(error) = self.record.toggle() {
                    tracing::warn!(id = %self.record.id(), %error, "toggle not persisted");
                }
            }
            Intent::StartEditing => {
                if !self.editing.replace(true) {
                    self.events.emit(&SessionEvent::EditingChanged(true));
                }
            }
            Intent::Close => {
                if self.editing.replace(false) {
                    self.events.emit(&SessionEvent::EditingChanged(false));
                }
            }
            Intent::Clear => {
                if let Err(error) = self.record.clear() {
                    tracing::warn!(id = %self.record.id(), %error, "destroy not persisted");
                }
            }
        }
    }

    /// The second half of close handling: commit whatever the field
    /// holds, changed or not.
    fn commit_text(&self) {
        let text = self.view.text();
        if let Err(error) = self.record.save(TaskPatch::content(text)) {
            tracing::warn!(id = %self.record.id(), %error, "edit not persisted");
        }
    }

    fn teardown(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        tracing::debug!(id = %self.record.id(), "tearing down editing session");
        self.view.detach();
        self.events.emit(&SessionEvent::Destroyed);
        self.subs.borrow_mut().clear();
    }
}

impl Drop for EditingSession {
    fn drop(&mut self) {
        // A session dropped while its record lives (a bulk re-render
        // replacing the row list) still detaches its view; subscriptions
        // dispose with the inner state.
        if !self.inner.destroyed.get() {
            self.inner.view.detach();
        }
    }
}

impl std::fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingSession")
            .field("id", &self.inner.record.id())
            .field("editing", &self.inner.editing.get())
            .field("destroyed", &self.inner.destroyed.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::view::RowInput;
    use taskwire_core::storage::TaskStorage;
    use taskwire_core::task::{TaskData, TaskId};
    use taskwire_core::ui::Key;
    use taskwire_testing::mocks::{FakeDom, MemoryStorage, PlainTemplates};

    fn fixture(content: &str) -> (EditingSession, Rc<TaskRecord>, Rc<FakeDom>) {
        let dom = Rc::new(FakeDom::new());
        let ui = UiContext::new(
            Rc::clone(&dom) as Rc<dyn taskwire_core::ui::Dom>,
            Rc::new(PlainTemplates),
        );
        let storage = Rc::new(MemoryStorage::new()) as Rc<dyn TaskStorage>;
        let record = TaskRecord::new(
            TaskData::new(TaskId::new(), Some(content.into()), false, 1),
            storage,
        );
        let session = EditingSession::new(Rc::clone(&record), &ui, dom.root());
        (session, record, dom)
    }

    #[test]
    fn toggle_intent_flips_the_record_without_touching_editing() {
        let (session, record, _dom) = fixture("buy milk");
        session.view().handle_input(RowInput::CheckClick);
        assert!(record.is_done());
        assert!(!session.editing());
    }

    #[test]
    fn start_editing_enters_edit_mode_once() {
        let (session, _record, dom) = fixture("buy milk");
        let node = session.view().node();

        session.view().handle_input(RowInput::LabelDoubleClick);
        assert!(session.editing());
        assert!(dom.editing_of(node));

        // Already editing: the guard keeps the state machine in place.
        session.view().handle_input(RowInput::LabelDoubleClick);
        assert!(session.editing());
    }

    #[test]
    fn close_leaves_edit_mode_and_commits_the_field_text() {
        let (session, record, dom) = fixture("buy milk");
        let node = session.view().node();

        session.view().handle_input(RowInput::LabelDoubleClick);
        dom.type_into(node, "buy oat milk");
        session.view().handle_input(RowInput::EditKey(Key::Enter));

        assert!(!session.editing());
        assert!(!dom.editing_of(node));
        assert_eq!(record.content(), "buy oat milk");
    }

    #[test]
    fn close_commits_even_unchanged_text() {
        let (session, record, dom) = fixture("buy milk");
        dom.type_into(session.view().node(), "buy milk");

        session.view().handle_input(RowInput::LabelDoubleClick);
        session.view().handle_input(RowInput::EditBlur);

        assert_eq!(record.content(), "buy milk");
        assert!(!session.editing());
    }

    #[test]
    fn non_enter_keys_are_ignored_while_editing() {
        let (session, record, dom) = fixture("buy milk");
        session.view().handle_input(RowInput::LabelDoubleClick);
        dom.type_into(session.view().node(), "half-typed");

        session.view().handle_input(RowInput::EditKey(Key::Other(65)));
        assert!(session.editing(), "still editing");
        assert_eq!(record.content(), "buy milk", "nothing committed");
    }

    #[test]
    fn clear_intent_destroys_exactly_once_and_detaches_the_view() {
        let (session, record, dom) = fixture("buy milk");
        let node = session.view().node();

        let destroyed = Rc::new(Cell::new(0));
        let _sub = session.events().subscribe({
            let destroyed = Rc::clone(&destroyed);
            move |event| {
                if matches!(event, SessionEvent::Destroyed) {
                    destroyed.set(destroyed.get() + 1);
                }
            }
        });

        session.view().handle_input(RowInput::DestroyClick);
        assert!(session.is_destroyed());
        assert!(record.is_destroyed());
        assert_eq!(destroyed.get(), 1);
        assert_eq!(dom.detach_count(node), 1);

        // A second destroy attempt changes nothing.
        record.clear().unwrap();
        assert_eq!(destroyed.get(), 1);
        assert_eq!(dom.detach_count(node), 1);
    }

    #[test]
    fn destroying_the_record_externally_also_tears_down() {
        let (session, record, dom) = fixture("buy milk");
        record.clear().unwrap();
        assert!(session.is_destroyed());
        assert_eq!(dom.detach_count(session.view().node()), 1);
    }

    #[test]
    fn dropping_a_live_session_detaches_its_view() {
        let (session, record, dom) = fixture("buy milk");
        let node = session.view().node();
        drop(session);

        assert!(!record.is_destroyed(), "the record outlives the session");
        assert_eq!(dom.detach_count(node), 1);
    }
}
