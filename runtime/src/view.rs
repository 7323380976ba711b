//! Task row views: presentation plus intent capture for one record.
//!
//! A [`TaskRow`] renders its record through the injected template engine
//! into a DOM fragment, re-rendering on every record change, and turns
//! raw user input into typed [`Intent`]s on its emitter. It never mutates
//! the record itself (that is the editing session's contract) and it
//! never calls back into session internals: closing an edit is an emitted
//! intent like everything else.
//!
//! The host delivers raw events by calling [`TaskRow::handle_input`] with
//! a [`RowInput`] value; the mapping to intents lives here so the session
//! only ever sees intents.

use crate::record::{RecordEvent, TaskRecord};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use taskwire_core::emitter::{Emitter, Subscription};
use taskwire_core::ui::{Key, NodeId, UiContext};

/// A requested action emitted by a view, not yet applied to any data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Flip the record's completion flag.
    ToggleDone,
    /// Enter editing mode.
    StartEditing,
    /// Leave editing mode and commit the field's current text.
    Close,
    /// Destroy the record.
    Clear,
}

/// Raw user input on one row, as observed by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowInput {
    /// The completion checkbox was clicked.
    CheckClick,
    /// The content label was double-clicked.
    LabelDoubleClick,
    /// The destroy button was clicked.
    DestroyClick,
    /// A key was pressed in the edit field.
    EditKey(Key),
    /// The edit field lost focus.
    EditBlur,
}

/// The rendered row for one task. Cheap to clone; clones share.
#[derive(Clone)]
pub struct TaskRow {
    inner: Rc<RowInner>,
}

struct RowInner {
    record: Rc<TaskRecord>,
    ui: UiContext,
    node: NodeId,
    detached: Cell<bool>,
    intents: Emitter<Intent>,
    subs: RefCell<Vec<Subscription>>,
}

impl TaskRow {
    /// Renders the record and mounts the fragment under `parent`,
    /// subscribing to the record's changes for re-renders.
    pub(crate) fn new(record: Rc<TaskRecord>, ui: UiContext, parent: NodeId) -> Self {
        let markup = ui.templates.render_row(&record.snapshot());
        let node = ui.dom.mount(parent, &markup);
        tracing::debug!(id = %record.id(), %node, "mounted task row");

        let inner = Rc::new(RowInner {
            record,
            ui,
            node,
            detached: Cell::new(false),
            intents: Emitter::new(),
            subs: RefCell::new(Vec::new()),
        });

        let sub = inner.record.events().subscribe({
            let weak = Rc::downgrade(&inner);
            move |event| {
                if matches!(event, RecordEvent::Changed(_)) {
                    if let Some(row) = weak.upgrade() {
                        row.render();
                    }
                }
            }
        });
        inner.subs.borrow_mut().push(sub);

        Self { inner }
    }

    /// Map raw input to an intent and emit it. Keys other than Enter in
    /// the edit field are ignored without error.
    pub fn handle_input(&self, input: RowInput) {
        let intent = match input {
            RowInput::CheckClick => Some(Intent::ToggleDone),
            RowInput::LabelDoubleClick => Some(Intent::StartEditing),
            RowInput::DestroyClick => Some(Intent::Clear),
            RowInput::EditKey(key) => key.is_enter().then_some(Intent::Close),
            RowInput::EditBlur => Some(Intent::Close),
        };
        if let Some(intent) = intent {
            self.inner.intents.emit(&intent);
        }
    }

    /// The intents this row emits.
    #[must_use]
    pub fn intents(&self) -> &Emitter<Intent> {
        &self.inner.intents
    }

    /// Current raw text of the row's edit field.
    ///
    /// Read by the session while handling a close intent; the field is
    /// still populated at that point, before any re-render the commit
    /// triggers.
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.ui.dom.input_text(self.inner.node)
    }

    /// The mounted fragment's handle.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    /// Whether the row has been unmounted.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.inner.detached.get()
    }

    /// Enter or leave edit-display mode.
    pub(crate) fn set_editing(&self, editing: bool) {
        if !self.inner.detached.get() {
            self.inner.ui.dom.set_editing(self.inner.node, editing);
        }
    }

    /// Unmount the fragment and drop the record subscription. Guarded so
    /// a row detaches exactly once.
    pub(crate) fn detach(&self) {
        if self.inner.detached.replace(true) {
            return;
        }
        tracing::debug!(id = %self.inner.record.id(), node = %self.inner.node, "detaching task row");
        self.inner.ui.dom.detach(self.inner.node);
        self.inner.subs.borrow_mut().clear();
    }
}

impl RowInner {
    fn render(&self) {
        if self.detached.get() {
            return;
        }
        let markup = self.ui.templates.render_row(&self.record.snapshot());
        self.ui.dom.update(self.node, &markup);
    }
}

impl std::fmt::Debug for TaskRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRow")
            .field("node", &self.inner.node)
            .field("detached", &self.inner.detached.get())
            .finish_non_exhaustive()
    }
}
