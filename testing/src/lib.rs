//! # Taskwire Testing
//!
//! Testing utilities for the Taskwire task-list engine.
//!
//! This crate provides:
//! - Mock implementations of the engine's collaborator traits
//!   ([`mocks::MemoryStorage`], [`mocks::FakeDom`], [`mocks::PlainTemplates`])
//! - Property-based testing strategies ([`strategies`])
//!
//! The mocks are deterministic and fully inspectable: every write is
//! counted, every detach is counted, and failure modes are switchable per
//! instance so error paths can be exercised without a real medium.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use taskwire_core::storage::TaskStorage;
//! use taskwire_core::task::{TaskData, TaskId};
//! use taskwire_testing::mocks::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! let task = TaskData::new(TaskId::new(), Some("buy milk".into()), false, 1);
//! storage.put(&task).unwrap();
//!
//! assert_eq!(storage.stored(task.id).unwrap().content, "buy milk");
//! assert_eq!(storage.write_count(), 1);
//! ```

pub mod mocks;
pub mod strategies;
