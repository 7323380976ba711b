//! # Taskwire Runtime
//!
//! The live half of the Taskwire task-list engine: records, the store,
//! per-task editing sessions and row views, and the application shell
//! that wires everything to a host-supplied page skeleton.
//!
//! Everything here is single-threaded by construction. Components share
//! state through [`Rc`](std::rc::Rc) handles, events are delivered
//! synchronously on the emitting call stack, and nothing is `Send`; see
//! `taskwire-core` for the event and collaborator seams.
//!
//! ## Ownership shape
//!
//! - [`TaskStore`](store::TaskStore) owns the [`TaskRecord`](record::TaskRecord)s.
//! - [`ApplicationShell`](shell::ApplicationShell) owns one
//!   [`EditingSession`](session::EditingSession) per record.
//! - Each session owns one [`TaskRow`](view::TaskRow).
//! - Sessions and views hold their record as a non-owning collaborator.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use taskwire_runtime::store::{NewTask, TaskStore};
//! use taskwire_testing::mocks::MemoryStorage;
//!
//! # fn main() -> Result<(), taskwire_core::storage::StorageError> {
//! let store = TaskStore::new(Rc::new(MemoryStorage::new()));
//! let record = store.create(NewTask::with_content("buy milk"))?;
//! record.toggle()?;
//!
//! assert_eq!(store.stats().done, 1);
//! # Ok(())
//! # }
//! ```

pub mod record;
pub mod session;
pub mod shell;
pub mod store;
pub mod view;

pub use record::{RecordEvent, TaskRecord};
pub use session::{EditingSession, SessionEvent};
pub use shell::{AppInput, ApplicationShell, ShellChrome};
pub use store::{NewTask, StoreEvent, TaskStore};
pub use view::{Intent, RowInput, TaskRow};
