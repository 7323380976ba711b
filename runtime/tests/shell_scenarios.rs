//! End-to-end scenarios driving the application shell through a fake DOM,
//! the way a host would.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::rc::Rc;
use taskwire_core::storage::TaskStorage;
use taskwire_core::task::{Stats, TaskData, TaskId};
use taskwire_core::ui::{Dom, Key, UiContext};
use taskwire_runtime::view::RowInput;
use taskwire_runtime::{AppInput, ApplicationShell, ShellChrome, TaskStore};
use taskwire_testing::mocks::{FakeDom, MemoryStorage, PlainTemplates};

struct Harness {
    shell: ApplicationShell,
    dom: Rc<FakeDom>,
    storage: Rc<MemoryStorage>,
    chrome: ShellChrome,
}

impl Harness {
    fn new() -> Self {
        Self::over(Rc::new(MemoryStorage::new()))
    }

    fn over(storage: Rc<MemoryStorage>) -> Self {
        let dom = Rc::new(FakeDom::new());
        let chrome = ShellChrome {
            list: dom.create_element(dom.root()),
            new_input: dom.create_element(dom.root()),
            toggle_all: dom.create_element(dom.root()),
            main: dom.create_element(dom.root()),
            footer: dom.create_element(dom.root()),
            stats: dom.create_element(dom.root()),
        };
        let ui = UiContext::new(Rc::clone(&dom) as Rc<dyn Dom>, Rc::new(PlainTemplates));
        let store = TaskStore::new(Rc::clone(&storage) as Rc<dyn TaskStorage>);
        let shell = ApplicationShell::new(store, ui, chrome);
        Self { shell, dom, storage, chrome }
    }

    /// Type into the new-task input and press Enter.
    fn create(&self, content: &str) {
        self.dom.type_into(self.chrome.new_input, content);
        self.shell
            .handle_input(AppInput::NewTaskKey(Key::Enter))
            .expect("create persists");
    }

    /// Deliver raw row input to the task at list position `at`.
    fn row_input(&self, at: usize, input: RowInput) {
        let id = self.shell.store().records()[at].id();
        self.shell
            .view_of(id)
            .expect("session exists")
            .handle_input(input);
    }
}

#[test]
fn creating_a_task_populates_store_and_list() {
    let h = Harness::new();
    h.create("buy milk");

    let records = h.shell.store().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content(), "buy milk");
    assert_eq!(records[0].order(), 1);
    assert!(!records[0].is_done());

    let rows = h.dom.children_of(h.chrome.list);
    assert_eq!(rows.len(), 1);
    assert_eq!(h.dom.markup_of(rows[0]), "[ ] buy milk");
    assert_eq!(h.dom.input_text(h.chrome.new_input), "", "input blanked");
}

#[test]
fn toggling_partitions_done_and_remaining() {
    let h = Harness::new();
    h.create("buy milk");
    h.row_input(0, RowInput::CheckClick);

    let store = h.shell.store();
    assert_eq!(store.done().len(), 1);
    assert!(store.remaining().is_empty());
    assert!(store.records()[0].is_done());

    let row = h.dom.children_of(h.chrome.list)[0];
    assert_eq!(h.dom.markup_of(row), "[x] buy milk");
    assert!(
        h.dom.checked(h.chrome.toggle_all),
        "nothing remaining, so the toggle-all checkbox reflects it"
    );
}

#[test]
fn editing_commits_on_close() {
    let h = Harness::new();
    h.create("buy milk");
    let row = h.dom.children_of(h.chrome.list)[0];
    let id = h.shell.store().records()[0].id();

    h.row_input(0, RowInput::LabelDoubleClick);
    assert!(h.dom.editing_of(row));
    assert_eq!(h.shell.editing_of(id), Some(true));

    h.dom.type_into(row, "buy oat milk");
    h.row_input(0, RowInput::EditKey(Key::Enter));

    assert!(!h.dom.editing_of(row));
    assert_eq!(h.shell.editing_of(id), Some(false));
    assert_eq!(h.shell.store().records()[0].content(), "buy oat milk");
    assert_eq!(h.dom.markup_of(row), "[ ] buy oat milk");
    assert_eq!(h.storage.stored(id).unwrap().content, "buy oat milk");
}

#[test]
fn toggle_all_completes_every_task() {
    let h = Harness::new();
    h.create("buy milk");
    h.create("walk dog");
    assert_eq!(h.shell.store().records()[1].order(), 2);

    // The host flips the checkbox, then reports the click.
    h.dom.click_checkbox(h.chrome.toggle_all);
    h.shell.handle_input(AppInput::ToggleAllClick).unwrap();

    assert!(h.shell.store().records().iter().all(|r| r.is_done()));
    assert_eq!(h.shell.stats(), Stats { total: 2, done: 2, remaining: 0 });
    for row in h.dom.children_of(h.chrome.list) {
        assert!(h.dom.markup_of(row).starts_with("[x]"));
    }
}

#[test]
fn clear_completed_empties_store_and_hides_chrome() {
    let h = Harness::new();
    h.create("buy milk");
    h.create("walk dog");
    h.dom.click_checkbox(h.chrome.toggle_all);
    h.shell.handle_input(AppInput::ToggleAllClick).unwrap();

    h.shell.handle_input(AppInput::ClearCompletedClick).unwrap();

    assert!(h.shell.store().is_empty());
    assert_eq!(h.shell.session_count(), 0);
    assert!(h.dom.children_of(h.chrome.list).is_empty());
    assert!(!h.dom.visible_of(h.chrome.main));
    assert!(!h.dom.visible_of(h.chrome.footer));
    assert_eq!(h.storage.stored_count(), 0);
}

#[test]
fn chrome_is_hidden_while_empty_and_shown_with_stats_once_populated() {
    let h = Harness::new();
    assert!(!h.dom.visible_of(h.chrome.main));
    assert!(!h.dom.visible_of(h.chrome.footer));

    h.create("buy milk");
    h.create("walk dog");
    h.row_input(0, RowInput::CheckClick);

    assert!(h.dom.visible_of(h.chrome.main));
    assert!(h.dom.visible_of(h.chrome.footer));
    assert_eq!(h.dom.markup_of(h.chrome.stats), "1 done / 1 remaining");
    assert!(!h.dom.checked(h.chrome.toggle_all), "one task still remaining");
}

#[test]
fn load_rebuilds_rows_in_rank_order() {
    let storage = Rc::new(MemoryStorage::seeded([
        TaskData::new(TaskId::new(), Some("walk dog".into()), true, 2),
        TaskData::new(TaskId::new(), Some("buy milk".into()), false, 1),
    ]));
    let h = Harness::over(storage);

    h.shell.load().unwrap();

    let rows = h.dom.children_of(h.chrome.list);
    assert_eq!(rows.len(), 2);
    assert_eq!(h.dom.markup_of(rows[0]), "[ ] buy milk");
    assert_eq!(h.dom.markup_of(rows[1]), "[x] walk dog");
    assert_eq!(h.shell.session_count(), 2);

    // The next creation continues after the highest loaded rank.
    h.create("write docs");
    assert_eq!(h.shell.store().records()[2].order(), 3);
}

#[test]
fn reloading_a_populated_shell_replaces_the_rows() {
    let h = Harness::new();
    h.create("buy milk");
    h.create("walk dog");
    let old_rows = h.dom.children_of(h.chrome.list);

    // The persisted set changes behind the store's back; a second bulk
    // load must tear down every live row and rebuild from what is stored.
    h.storage
        .save_all(&[TaskData::new(TaskId::new(), Some("write docs".into()), false, 7)])
        .unwrap();
    h.shell.load().unwrap();

    for row in &old_rows {
        assert_eq!(h.dom.detach_count(*row), 1, "old row detached exactly once");
    }
    let rows = h.dom.children_of(h.chrome.list);
    assert_eq!(rows.len(), 1);
    assert_eq!(h.dom.markup_of(rows[0]), "[ ] write docs");
    assert_eq!(h.shell.session_count(), 1);
    assert_eq!(h.shell.store().next_order(), 8);
}

#[test]
fn destroying_one_row_leaves_the_rest_in_place() {
    let h = Harness::new();
    h.create("buy milk");
    h.create("walk dog");
    let rows = h.dom.children_of(h.chrome.list);

    h.row_input(0, RowInput::DestroyClick);

    assert_eq!(h.shell.store().len(), 1);
    assert_eq!(h.shell.session_count(), 1);
    assert_eq!(h.dom.children_of(h.chrome.list), [rows[1]]);
    assert_eq!(h.dom.markup_of(rows[1]), "[ ] walk dog");
}

#[test]
fn non_enter_keys_in_the_new_task_input_create_nothing() {
    let h = Harness::new();
    h.dom.type_into(h.chrome.new_input, "half-typed");
    h.shell
        .handle_input(AppInput::NewTaskKey(Key::Other(65)))
        .unwrap();

    assert!(h.shell.store().is_empty());
    assert_eq!(
        h.dom.input_text(h.chrome.new_input),
        "half-typed",
        "the draft is untouched"
    );
}

#[test]
fn clear_completed_reports_the_first_failure_but_sweeps_everything() {
    let h = Harness::new();
    h.create("buy milk");
    h.create("walk dog");
    h.dom.click_checkbox(h.chrome.toggle_all);
    h.shell.handle_input(AppInput::ToggleAllClick).unwrap();

    h.storage.fail_writes(true);
    let err = h.shell.handle_input(AppInput::ClearCompletedClick);

    assert!(err.is_err(), "the failed delete is surfaced");
    assert!(h.shell.store().is_empty(), "memory is still the authority");
    assert!(h.dom.children_of(h.chrome.list).is_empty());
}
