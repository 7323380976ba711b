//! Mock implementations of the engine's collaborator traits.
//!
//! [`MemoryStorage`] stands in for the persisted-storage medium,
//! [`FakeDom`] for the document, and [`PlainTemplates`] for the injected
//! template functions. All three are deterministic and inspectable, and
//! the storage mock can be switched into failure modes to exercise
//! write-behind error paths.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use taskwire_core::storage::{StorageError, TaskStorage};
use taskwire_core::task::{Stats, TaskData, TaskId};
use taskwire_core::ui::{Dom, Markup, NodeId, TemplateEngine};

/// In-memory [`TaskStorage`] with switchable failure modes.
///
/// Writes and deletes count against [`write_count`](Self::write_count)
/// even when they are made to fail, mirroring a medium that was reached
/// but refused the operation.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tasks: RefCell<HashMap<TaskId, TaskData>>,
    write_count: Cell<usize>,
    fail_writes: Cell<bool>,
    fail_loads: Cell<bool>,
}

impl MemoryStorage {
    /// An empty storage that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage pre-seeded with the given tasks.
    #[must_use]
    pub fn seeded(tasks: impl IntoIterator<Item = TaskData>) -> Self {
        let storage = Self::new();
        storage
            .tasks
            .borrow_mut()
            .extend(tasks.into_iter().map(|task| (task.id, task)));
        storage
    }

    /// Make every subsequent put and delete fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make every subsequent bulk load fail (or succeed again).
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    /// The persisted copy of one task, if any.
    #[must_use]
    pub fn stored(&self, id: TaskId) -> Option<TaskData> {
        self.tasks.borrow().get(&id).cloned()
    }

    /// Number of persisted tasks.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Total puts and deletes attempted so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.write_count.get()
    }
}

impl TaskStorage for MemoryStorage {
    fn load_all(&self) -> Result<Vec<TaskData>, StorageError> {
        if self.fail_loads.get() {
            return Err(StorageError::LoadFailed("simulated load failure".into()));
        }
        Ok(self.tasks.borrow().values().cloned().collect())
    }

    fn put(&self, task: &TaskData) -> Result<(), StorageError> {
        self.write_count.set(self.write_count.get() + 1);
        if self.fail_writes.get() {
            return Err(StorageError::WriteFailed {
                id: task.id,
                reason: "simulated write failure".into(),
            });
        }
        self.tasks.borrow_mut().insert(task.id, task.clone());
        Ok(())
    }

    fn delete(&self, id: TaskId) -> Result<(), StorageError> {
        self.write_count.set(self.write_count.get() + 1);
        if self.fail_writes.get() {
            return Err(StorageError::DeleteFailed {
                id,
                reason: "simulated delete failure".into(),
            });
        }
        self.tasks.borrow_mut().remove(&id);
        Ok(())
    }

    fn save_all(&self, tasks: &[TaskData]) -> Result<(), StorageError> {
        self.write_count.set(self.write_count.get() + 1);
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable("simulated write failure".into()));
        }
        *self.tasks.borrow_mut() = tasks.iter().map(|task| (task.id, task.clone())).collect();
        Ok(())
    }
}

#[derive(Debug)]
struct NodeState {
    markup: String,
    input: String,
    checked: bool,
    visible: bool,
    editing: bool,
    detach_count: usize,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            markup: String::new(),
            input: String::new(),
            checked: false,
            visible: true,
            editing: false,
            detach_count: 0,
        }
    }
}

/// In-memory [`Dom`] tracking mounted fragments and interactive state.
///
/// Handles are issued sequentially from a fixed root, children keep mount
/// order, and per-node state survives detaching so tests can assert the
/// last rendered markup of a removed row. Reads against unknown handles
/// return defaults rather than panicking, matching the contract that
/// dangling handles are the collaborator's problem, not the engine's.
#[derive(Debug)]
pub struct FakeDom {
    root: NodeId,
    next_id: Cell<u64>,
    nodes: RefCell<HashMap<NodeId, NodeState>>,
    children: RefCell<HashMap<NodeId, Vec<NodeId>>>,
}

impl FakeDom {
    /// A document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId::new(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, NodeState::default());
        Self {
            root,
            next_id: Cell::new(1),
            nodes: RefCell::new(nodes),
            children: RefCell::new(HashMap::new()),
        }
    }

    /// The fixed root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create an empty element under `parent`, as a host would when
    /// building the page skeleton the engine binds to.
    pub fn create_element(&self, parent: NodeId) -> NodeId {
        self.mount(parent, &Markup::default())
    }

    /// Attached children of `parent`, in mount order.
    #[must_use]
    pub fn children_of(&self, parent: NodeId) -> Vec<NodeId> {
        self.children
            .borrow()
            .get(&parent)
            .cloned()
            .unwrap_or_default()
    }

    /// Last markup written to `node`. Survives detaching.
    #[must_use]
    pub fn markup_of(&self, node: NodeId) -> String {
        self.nodes
            .borrow()
            .get(&node)
            .map(|state| state.markup.clone())
            .unwrap_or_default()
    }

    /// Whether `node` is in edit-display mode.
    #[must_use]
    pub fn editing_of(&self, node: NodeId) -> bool {
        self.nodes.borrow().get(&node).is_some_and(|state| state.editing)
    }

    /// Whether `node` is shown. Nodes start visible.
    #[must_use]
    pub fn visible_of(&self, node: NodeId) -> bool {
        self.nodes.borrow().get(&node).is_none_or(|state| state.visible)
    }

    /// How many times `node` has been detached.
    #[must_use]
    pub fn detach_count(&self, node: NodeId) -> usize {
        self.nodes
            .borrow()
            .get(&node)
            .map_or(0, |state| state.detach_count)
    }

    /// Simulate the user typing into the input field addressed by `node`.
    pub fn type_into(&self, node: NodeId, text: &str) {
        self.with_state(node, |state| state.input = text.to_owned());
    }

    /// Simulate the user clicking the checkbox addressed by `node`.
    pub fn click_checkbox(&self, node: NodeId) {
        self.with_state(node, |state| state.checked = !state.checked);
    }

    fn with_state(&self, node: NodeId, f: impl FnOnce(&mut NodeState)) {
        f(self.nodes.borrow_mut().entry(node).or_default());
    }
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for FakeDom {
    fn mount(&self, parent: NodeId, markup: &Markup) -> NodeId {
        let node = NodeId::new(self.next_id.get());
        self.next_id.set(node.raw() + 1);

        self.nodes.borrow_mut().insert(
            node,
            NodeState {
                markup: markup.as_str().to_owned(),
                ..NodeState::default()
            },
        );
        self.children.borrow_mut().entry(parent).or_default().push(node);
        node
    }

    fn update(&self, node: NodeId, markup: &Markup) {
        self.with_state(node, |state| state.markup = markup.as_str().to_owned());
    }

    fn detach(&self, node: NodeId) {
        for siblings in self.children.borrow_mut().values_mut() {
            siblings.retain(|child| *child != node);
        }
        self.with_state(node, |state| state.detach_count += 1);
    }

    fn input_text(&self, node: NodeId) -> String {
        self.nodes
            .borrow()
            .get(&node)
            .map(|state| state.input.clone())
            .unwrap_or_default()
    }

    fn set_input_text(&self, node: NodeId, text: &str) {
        self.with_state(node, |state| state.input = text.to_owned());
    }

    fn checked(&self, node: NodeId) -> bool {
        self.nodes.borrow().get(&node).is_some_and(|state| state.checked)
    }

    fn set_checked(&self, node: NodeId, checked: bool) {
        self.with_state(node, |state| state.checked = checked);
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        self.with_state(node, |state| state.visible = visible);
    }

    fn set_editing(&self, node: NodeId, editing: bool) {
        self.with_state(node, |state| state.editing = editing);
    }
}

/// Deterministic plain-text [`TemplateEngine`].
///
/// Rows render as `[ ] content` / `[x] content`; the stats summary as
/// `N done / M remaining`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTemplates;

impl TemplateEngine for PlainTemplates {
    fn render_row(&self, task: &TaskData) -> Markup {
        let mark = if task.done { 'x' } else { ' ' };
        Markup::new(format!("[{mark}] {}", task.content))
    }

    fn render_stats(&self, stats: &Stats) -> Markup {
        Markup::new(format!("{} done / {} remaining", stats.done, stats.remaining))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn storage_round_trips_and_counts_writes() {
        let storage = MemoryStorage::new();
        let task = TaskData::new(TaskId::new(), Some("buy milk".into()), false, 1);

        storage.put(&task).unwrap();
        assert_eq!(storage.stored(task.id).unwrap().content, "buy milk");
        assert_eq!(storage.write_count(), 1);

        storage.delete(task.id).unwrap();
        assert!(storage.stored(task.id).is_none());
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn failing_writes_still_count_and_change_nothing() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);

        let task = TaskData::new(TaskId::new(), Some("buy milk".into()), false, 1);
        assert!(storage.put(&task).is_err());
        assert!(storage.stored(task.id).is_none());
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn failing_loads_report_load_failed() {
        let storage = MemoryStorage::new();
        storage.fail_loads(true);
        assert!(matches!(
            storage.load_all(),
            Err(StorageError::LoadFailed(_))
        ));
    }

    #[test]
    fn dom_keeps_mount_order_and_detach_removes() {
        let dom = FakeDom::new();
        let first = dom.mount(dom.root(), &Markup::from("a"));
        let second = dom.mount(dom.root(), &Markup::from("b"));
        assert_eq!(dom.children_of(dom.root()), [first, second]);

        dom.detach(first);
        assert_eq!(dom.children_of(dom.root()), [second]);
        assert_eq!(dom.detach_count(first), 1);
        assert_eq!(dom.markup_of(first), "a", "markup survives detaching");
    }

    #[test]
    fn dom_interactive_state_is_per_node() {
        let dom = FakeDom::new();
        let node = dom.create_element(dom.root());

        dom.type_into(node, "draft");
        assert_eq!(dom.input_text(node), "draft");

        dom.click_checkbox(node);
        assert!(dom.checked(node));
        dom.click_checkbox(node);
        assert!(!dom.checked(node));

        dom.set_visible(node, false);
        assert!(!dom.visible_of(node));
        assert!(dom.visible_of(dom.root()), "other nodes untouched");
    }

    #[test]
    fn plain_templates_mark_completion() {
        let done = TaskData::new(TaskId::new(), Some("buy milk".into()), true, 1);
        assert_eq!(PlainTemplates.render_row(&done).as_str(), "[x] buy milk");

        let stats = Stats { total: 3, done: 1, remaining: 2 };
        assert_eq!(
            PlainTemplates.render_stats(&stats).as_str(),
            "1 done / 2 remaining"
        );
    }
}
