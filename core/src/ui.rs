//! DOM and template collaborators.
//!
//! The engine never builds markup or touches a real document. It requires
//! two injected capabilities:
//!
//! - [`TemplateEngine`]: opaque pure functions producing a [`Markup`]
//!   fragment for one task row and for the aggregate stats summary.
//! - [`Dom`]: mount/update/detach rendered fragments and read/write the
//!   interactive state the engine cares about: an input field's text, a
//!   checkbox's boolean, visibility, and a row's edit-display mode.
//!
//! Fragments are addressed by opaque [`NodeId`] handles issued by the
//! `Dom` implementation. A row fragment contains exactly one edit field
//! and one completion checkbox, so field-level reads and writes are
//! addressed through the fragment's own handle (the way a scoped selector
//! would resolve inside the row element).
//!
//! Raw user events do not cross this seam as callbacks; the host observes
//! them however it likes and hands the engine typed input values
//! (`RowInput` / `AppInput` in the runtime crate). Only [`Key`] lives
//! here, since both the row and the shell filter keypresses.
//!
//! Malformed templates and dangling node handles are programmer errors
//! owned by the collaborator, not runtime error paths of the engine.

use crate::task::{Stats, TaskData};
use std::rc::Rc;

/// Opaque handle to a mounted fragment, issued by the [`Dom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a raw handle value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// An opaque rendered fragment, produced by a [`TemplateEngine`] and
/// consumed by a [`Dom`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wraps a rendered fragment.
    #[must_use]
    pub const fn new(fragment: String) -> Self {
        Self(fragment)
    }

    /// The fragment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Markup {
    fn from(fragment: String) -> Self {
        Self(fragment)
    }
}

impl From<&str> for Markup {
    fn from(fragment: &str) -> Self {
        Self(fragment.to_owned())
    }
}

/// A raw keypress, reduced to what the engine distinguishes.
///
/// Only Enter carries meaning (commit an edit, create a task); everything
/// else is ignored without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// The Enter/Return key.
    Enter,
    /// Any other key, carrying its raw key code.
    Other(u32),
}

impl Key {
    /// Whether this is the Enter key.
    #[must_use]
    pub const fn is_enter(self) -> bool {
        matches!(self, Self::Enter)
    }
}

/// Template collaborator: opaque pure render functions.
pub trait TemplateEngine {
    /// Render one task row.
    fn render_row(&self, task: &TaskData) -> Markup;

    /// Render the aggregate stats summary.
    fn render_stats(&self, stats: &Stats) -> Markup;
}

/// DOM capability: the minimal document surface the engine drives.
///
/// Implementations issue [`NodeId`] handles from [`mount`](Self::mount)
/// and must tolerate reads against chrome nodes they created themselves
/// (list container, inputs, checkboxes, sections).
pub trait Dom {
    /// Mount a fragment under `parent`, appending it to the parent's
    /// children, and return its handle.
    fn mount(&self, parent: NodeId, markup: &Markup) -> NodeId;

    /// Replace a mounted fragment's content in place.
    fn update(&self, node: NodeId, markup: &Markup);

    /// Remove a mounted fragment from the document.
    fn detach(&self, node: NodeId);

    /// Current text of the input field addressed by `node` (the node
    /// itself for a bare input, or the edit field inside a row fragment).
    fn input_text(&self, node: NodeId) -> String;

    /// Overwrite that input field's text.
    fn set_input_text(&self, node: NodeId, text: &str);

    /// Current boolean state of the checkbox addressed by `node`.
    fn checked(&self, node: NodeId) -> bool;

    /// Overwrite that checkbox's state.
    fn set_checked(&self, node: NodeId, checked: bool);

    /// Show or hide a section.
    fn set_visible(&self, node: NodeId, visible: bool);

    /// Put a row fragment into or out of edit-display mode.
    fn set_editing(&self, node: NodeId, editing: bool);
}

/// The injected UI collaborators, bundled for cheap sharing.
#[derive(Clone)]
pub struct UiContext {
    /// The DOM capability.
    pub dom: Rc<dyn Dom>,
    /// The template functions.
    pub templates: Rc<dyn TemplateEngine>,
}

impl UiContext {
    /// Bundles a DOM capability with a template engine.
    #[must_use]
    pub fn new(dom: Rc<dyn Dom>, templates: Rc<dyn TemplateEngine>) -> Self {
        Self { dom, templates }
    }
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext").finish_non_exhaustive()
    }
}
