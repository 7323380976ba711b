//! Property-based tests over the store's ordering and partitioning
//! invariants, replayed against random scripts of user actions.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use std::rc::Rc;
use taskwire_core::storage::TaskStorage;
use taskwire_runtime::store::{NewTask, TaskStore};
use taskwire_testing::mocks::MemoryStorage;
use taskwire_testing::strategies::{self, StoreOp};

fn fresh_store() -> TaskStore {
    TaskStore::new(Rc::new(MemoryStorage::new()) as Rc<dyn TaskStorage>)
}

/// Replay a script, skipping member-addressed ops while the store is empty.
fn replay(store: &TaskStore, ops: &[StoreOp]) {
    for op in ops {
        let len = store.len();
        match op {
            StoreOp::Create(content) => {
                store.create(NewTask::with_content(content.clone())).unwrap();
            }
            StoreOp::Toggle(index) if len > 0 => {
                store.records()[index % len].toggle().unwrap();
            }
            StoreOp::Edit(index, content) if len > 0 => {
                store.records()[index % len]
                    .save(taskwire_core::task::TaskPatch::content(content.clone()))
                    .unwrap();
            }
            StoreOp::Destroy(index) if len > 0 => {
                store.records()[index % len].clear().unwrap();
            }
            StoreOp::Toggle(_) | StoreOp::Edit(..) | StoreOp::Destroy(_) => {}
        }
    }
}

proptest! {
    /// Ranks are strictly increasing in membership order, whatever the
    /// interleaving of creations and destructions.
    #[test]
    fn ranks_stay_strictly_increasing(ops in strategies::store_ops(40)) {
        let store = fresh_store();
        replay(&store, &ops);

        let orders: Vec<u64> = store.records().iter().map(|r| r.order()).collect();
        prop_assert!(orders.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// `done` and `remaining` partition the membership exactly.
    #[test]
    fn done_and_remaining_partition_membership(ops in strategies::store_ops(40)) {
        let store = fresh_store();
        replay(&store, &ops);

        let done = store.done();
        let remaining = store.remaining();
        prop_assert_eq!(done.len() + remaining.len(), store.len());
        prop_assert!(done.iter().all(|r| r.is_done()));
        prop_assert!(remaining.iter().all(|r| !r.is_done()));

        let stats = store.stats();
        prop_assert_eq!(stats.done, done.len());
        prop_assert_eq!(stats.remaining, remaining.len());
        prop_assert_eq!(stats.total, store.len());
    }

    /// Ranks assigned at creation never exceed the next one handed out.
    #[test]
    fn next_order_tops_every_member(ops in strategies::store_ops(40)) {
        let store = fresh_store();
        replay(&store, &ops);

        let next = store.next_order();
        prop_assert!(store.records().iter().all(|r| r.order() < next));
    }

    /// Toggling twice is the identity on the completion flag.
    #[test]
    fn double_toggle_is_identity(done in any::<bool>()) {
        let store = fresh_store();
        let record = store.create(NewTask { content: Some("buy milk".into()), done }).unwrap();

        record.toggle().unwrap();
        record.toggle().unwrap();
        prop_assert_eq!(record.is_done(), done);
    }
}
