//! Scripted console demo for the Taskwire engine.
//!
//! Drives the application shell through a fake in-memory document (the
//! same one the test suite uses) while persisting to a JSON file, so a
//! second run picks up where the first left off.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p taskwire-console [path/to/tasks.json]
//! ```

mod storage;

use anyhow::{Context, Result};
use std::rc::Rc;
use storage::JsonFileStorage;
use taskwire_core::ui::{Dom, Key, UiContext};
use taskwire_runtime::view::RowInput;
use taskwire_runtime::{AppInput, ApplicationShell, ShellChrome, TaskStore};
use taskwire_testing::mocks::{FakeDom, PlainTemplates};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn print_list(dom: &FakeDom, chrome: ShellChrome) {
    for row in dom.children_of(chrome.list) {
        println!("  {}", dom.markup_of(row));
    }
    if dom.visible_of(chrome.footer) {
        println!("  -- {}", dom.markup_of(chrome.stats));
    } else {
        println!("  (list empty, footer hidden)");
    }
}

fn row_input(shell: &ApplicationShell, at: usize, input: RowInput) -> Result<()> {
    let id = shell
        .store()
        .records()
        .get(at)
        .context("no task at that position")?
        .id();
    shell
        .view_of(id)
        .context("no session for that task")?
        .handle_input(input);
    Ok(())
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "taskwire-tasks.json".to_owned());
    println!("=== Taskwire Console Demo ===");
    println!("persisting to {path}\n");

    let dom = Rc::new(FakeDom::new());
    let chrome = ShellChrome {
        list: dom.create_element(dom.root()),
        new_input: dom.create_element(dom.root()),
        toggle_all: dom.create_element(dom.root()),
        main: dom.create_element(dom.root()),
        footer: dom.create_element(dom.root()),
        stats: dom.create_element(dom.root()),
    };
    let ui = UiContext::new(
        Rc::clone(&dom) as Rc<dyn Dom>,
        Rc::new(PlainTemplates),
    );
    let store = TaskStore::new(Rc::new(JsonFileStorage::new(&path)));
    let shell = ApplicationShell::new(store, ui, chrome);

    shell.load()?;
    println!("Loaded {} persisted task(s):", shell.stats().total);
    print_list(&dom, chrome);

    println!("\nCreating tasks...");
    for content in ["Buy milk", "Write documentation", "Deploy to production"] {
        dom.type_into(chrome.new_input, content);
        shell.handle_input(AppInput::NewTaskKey(Key::Enter))?;
    }
    print_list(&dom, chrome);

    println!("\nCompleting the first task...");
    row_input(&shell, 0, RowInput::CheckClick)?;
    print_list(&dom, chrome);

    println!("\nRenaming the second task...");
    let second = shell
        .store()
        .records()
        .get(1)
        .context("no second task")?
        .id();
    let row = shell
        .view_of(second)
        .context("no session for the second task")?
        .node();
    row_input(&shell, 1, RowInput::LabelDoubleClick)?;
    dom.type_into(row, "Write the README");
    row_input(&shell, 1, RowInput::EditKey(Key::Enter))?;
    print_list(&dom, chrome);

    println!("\nMarking everything done...");
    dom.set_checked(chrome.toggle_all, true);
    shell.handle_input(AppInput::ToggleAllClick)?;
    print_list(&dom, chrome);

    println!("\nClearing completed tasks...");
    shell.handle_input(AppInput::ClearCompletedClick)?;
    print_list(&dom, chrome);

    println!("\n=== Demo Complete ===");
    Ok(())
}
