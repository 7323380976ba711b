//! Task data model: one todo item's durable attributes.
//!
//! A task is a concrete structured record (content, completion flag,
//! insertion order), not a dynamic attribute bag. Change notifications
//! carry a typed [`ChangedFields`] diff naming exactly the fields that
//! changed, and [`TaskPatch`] expresses partial updates with named fields.
//!
//! `order` is a monotonic insertion rank: unique within a store, strictly
//! increasing in insertion sequence, assigned once at creation and never
//! renumbered.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a task, assigned by the store at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random `TaskId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TaskId` from a UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One task's durable data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    /// Unique identifier.
    pub id: TaskId,
    /// What the task says. Defaults to the empty string; creating a task
    /// with no content silently falls back to the default rather than
    /// rejecting the input.
    pub content: String,
    /// Whether the task is finished.
    pub done: bool,
    /// Monotonic insertion rank, assigned once by the store.
    pub order: u64,
}

impl TaskData {
    /// Creates task data, coercing a missing content to the default
    /// (empty string).
    #[must_use]
    pub fn new(id: TaskId, content: Option<String>, done: bool, order: u64) -> Self {
        Self {
            id,
            content: content.unwrap_or_default(),
            done,
            order,
        }
    }

    /// Applies a patch in place and reports which fields actually changed.
    ///
    /// A patch field whose value equals the current one is merged but not
    /// reported, so change notifications only fire for real differences.
    pub fn apply(&mut self, patch: TaskPatch) -> ChangedFields {
        let mut changed = ChangedFields::none();

        if let Some(content) = patch.content {
            if content != self.content {
                self.content = content;
                changed.content = true;
            }
        }
        if let Some(done) = patch.done {
            if done != self.done {
                self.done = done;
                changed.done = true;
            }
        }

        changed
    }
}

/// A partial update to a task's mutable fields.
///
/// Unset fields are left untouched by [`TaskData::apply`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New content, if the patch carries one.
    pub content: Option<String>,
    /// New completion flag, if the patch carries one.
    pub done: Option<bool>,
}

impl TaskPatch {
    /// A patch that only updates the content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            done: None,
        }
    }

    /// A patch that only updates the completion flag.
    #[must_use]
    pub const fn done(done: bool) -> Self {
        Self {
            content: None,
            done: Some(done),
        }
    }

    /// Adds a completion flag to this patch.
    #[must_use]
    pub const fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }
}

/// Which named fields a change notification covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangedFields {
    /// The content changed.
    pub content: bool,
    /// The completion flag changed.
    pub done: bool,
}

impl ChangedFields {
    /// No fields changed.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            content: false,
            done: false,
        }
    }

    /// Whether any field changed.
    #[must_use]
    pub const fn any(self) -> bool {
        self.content || self.done
    }
}

/// Aggregate counts over a store's membership.
///
/// `total == done + remaining` always; the done and remaining subsets are
/// disjoint and together cover the full membership.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// All live tasks.
    pub total: usize,
    /// Finished tasks.
    pub done: usize,
    /// Unfinished tasks.
    pub remaining: usize,
}
