//! Property-based testing strategies for engine state.
//!
//! The interesting invariants (rank monotonicity, membership
//! partitioning) hold across arbitrary interleavings of user actions, so
//! the main export is [`store_ops`]: random scripts of store-level
//! operations that tests replay against a live store.

use proptest::prelude::*;
use taskwire_core::task::{TaskData, TaskId};

/// Task content as users actually type it, empty included.
pub fn content() -> impl Strategy<Value = String> {
    "[a-z ]{0,24}"
}

/// A persisted task with an arbitrary rank, for seeding storage mocks.
pub fn task_data() -> impl Strategy<Value = TaskData> {
    (content(), any::<bool>(), 1u64..1_000).prop_map(|(content, done, order)| {
        TaskData::new(TaskId::new(), Some(content), done, order)
    })
}

/// One scripted user action against a store.
///
/// Index-carrying variants address the membership by position modulo its
/// current length; replaying code skips them when the store is empty.
#[derive(Clone, Debug)]
pub enum StoreOp {
    /// Create a task with the given content.
    Create(String),
    /// Toggle the completion flag of the member at `index % len`.
    Toggle(usize),
    /// Overwrite the content of the member at `index % len`.
    Edit(usize, String),
    /// Destroy the member at `index % len`.
    Destroy(usize),
}

/// A random script of up to `max_len` store operations.
pub fn store_ops(max_len: usize) -> impl Strategy<Value = Vec<StoreOp>> {
    let op = prop_oneof![
        3 => content().prop_map(StoreOp::Create),
        2 => any::<usize>().prop_map(StoreOp::Toggle),
        2 => (any::<usize>(), content()).prop_map(|(i, text)| StoreOp::Edit(i, text)),
        1 => any::<usize>().prop_map(StoreOp::Destroy),
    ];
    proptest::collection::vec(op, 0..=max_len)
}
