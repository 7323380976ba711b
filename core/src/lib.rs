//! # Taskwire Core
//!
//! Core types and collaborator traits for the Taskwire task-list engine.
//!
//! This crate provides the fundamental abstractions the runtime builds on:
//!
//! - **Task data**: [`task::TaskData`] and friends: one task's durable
//!   attributes (content, done flag, insertion order) plus typed patches
//!   and change diffs
//! - **Event registry**: [`emitter::Emitter`], an explicit, ordered
//!   publish/subscribe mechanism with disposable subscription handles
//! - **Storage collaborator**: [`storage::TaskStorage`], the persisted
//!   storage seam (the engine treats storage as a write-behind cache of
//!   in-memory state)
//! - **UI collaborators**: [`ui::Dom`] and [`ui::TemplateEngine`], the
//!   injected DOM capability and opaque template functions
//!
//! ## Architecture Principles
//!
//! - Composition over inheritance: concrete record/store types plus small
//!   capability traits, not framework base classes
//! - Explicit wiring: no ambient globals; every collaborator is injected
//! - Typed events: change notifications name the fields that changed
//! - Single-threaded, cooperative execution: handlers run to completion in
//!   registration order, so none of these types are `Send`
//!
//! ## Example
//!
//! ```
//! use taskwire_core::emitter::Emitter;
//! use taskwire_core::task::{TaskData, TaskId};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let events: Emitter<u32> = Emitter::new();
//! let seen = Rc::new(Cell::new(0));
//! let sub = events.subscribe({
//!     let seen = Rc::clone(&seen);
//!     move |n| seen.set(seen.get() + n)
//! });
//! events.emit(&3);
//! assert_eq!(seen.get(), 3);
//! drop(sub); // deterministic unsubscribe
//! events.emit(&4);
//! assert_eq!(seen.get(), 3);
//!
//! let task = TaskData::new(TaskId::new(), Some("buy milk".into()), false, 1);
//! assert!(!task.done);
//! ```

pub mod emitter;
pub mod storage;
pub mod task;
pub mod ui;

// Re-export commonly used types
pub use emitter::{Emitter, Subscription};
pub use storage::{StorageError, TaskStorage};
pub use task::{ChangedFields, Stats, TaskData, TaskId, TaskPatch};
pub use ui::{Dom, Key, Markup, NodeId, TemplateEngine, UiContext};
