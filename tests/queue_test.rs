//! Tests for the priority queue.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use civic_core::error::EngineError;
use civic_core::queue::{HeapEntry, Prioritized, PriorityQueue};
use civic_core::record::RequestRecord;

fn record(id: &str, priority: i32) -> RequestRecord {
    RequestRecord::new(id, "Roads", priority, Utc.with_ymd_and_hms(2024, 8, 1, 7, 0, 0).unwrap())
}

#[test]
fn extract_from_empty_queue_fails() {
    let mut queue: PriorityQueue<HeapEntry<'_>> = PriorityQueue::new();
    assert_eq!(
        queue.extract_max().unwrap_err(),
        EngineError::EmptyStructure { structure: "priority queue" }
    );
    assert!(queue.peek().is_err());
}

#[test]
fn peek_does_not_remove() {
    let records = [record("SR-1", 3), record("SR-2", 8)];
    let mut queue: PriorityQueue<HeapEntry<'_>> = records.iter().map(HeapEntry::new).collect();
    assert_eq!(queue.peek().unwrap().id(), "SR-2");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.extract_max().unwrap().id(), "SR-2");
    assert_eq!(queue.extract_max().unwrap().id(), "SR-1");
    assert!(queue.is_empty());
}

#[test]
fn borrowed_records_order_by_priority() {
    let records: Vec<RequestRecord> = (0..10).map(|i| record(&format!("SR-{i}"), (i * 7) % 10)).collect();
    let mut queue: PriorityQueue<&RequestRecord> = PriorityQueue::new();
    for r in &records {
        queue.insert(r);
    }
    let priorities: Vec<i32> = queue.into_sorted_vec().iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
}

#[test]
fn equal_priorities_all_come_out() {
    let records: Vec<RequestRecord> = (0..5).map(|i| record(&format!("SR-{i}"), 4)).collect();
    let queue: PriorityQueue<HeapEntry<'_>> = records.iter().map(HeapEntry::new).collect();
    let mut ids: Vec<&str> = queue.into_sorted_vec().iter().map(|e| e.id()).collect();
    // Order among equals is unspecified; membership is not.
    ids.sort_unstable();
    assert_eq!(ids, vec!["SR-0", "SR-1", "SR-2", "SR-3", "SR-4"]);
}

#[derive(Debug, Clone)]
enum Op {
    Insert(i32),
    Extract,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-20i32..20).prop_map(Op::Insert),
        1 => Just(Op::Extract),
    ]
}

proptest! {
    #[test]
    fn heap_property_holds_under_interleaving(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let records: Vec<RequestRecord> = ops
            .iter()
            .enumerate()
            .map(|(i, op)| match op {
                Op::Insert(p) => record(&format!("SR-{i}"), *p),
                Op::Extract => record(&format!("SR-{i}"), 0),
            })
            .collect();

        let mut queue: PriorityQueue<&RequestRecord> = PriorityQueue::new();
        let mut shadow: Vec<i32> = Vec::new();
        for (op, r) in ops.iter().zip(&records) {
            match op {
                Op::Insert(p) => {
                    queue.insert(r);
                    shadow.push(*p);
                }
                Op::Extract => {
                    let expected = shadow.iter().copied().max();
                    match queue.extract_max() {
                        Ok(top) => {
                            prop_assert_eq!(Some(top.priority()), expected);
                            let pos = shadow.iter().position(|&p| p == top.priority()).unwrap();
                            shadow.swap_remove(pos);
                        }
                        Err(_) => prop_assert!(expected.is_none()),
                    }
                }
            }
            prop_assert!(queue.is_valid());
            let slice = queue.as_slice();
            for i in 0..slice.len() {
                for child in [2 * i + 1, 2 * i + 2] {
                    if child < slice.len() {
                        prop_assert!(slice[i].priority >= slice[child].priority);
                    }
                }
            }
        }
    }

    #[test]
    fn n_extractions_are_non_increasing(priorities in prop::collection::vec(any::<i32>(), 0..100)) {
        let records: Vec<RequestRecord> = priorities
            .iter()
            .enumerate()
            .map(|(i, p)| record(&format!("SR-{i}"), *p))
            .collect();
        let mut queue: PriorityQueue<HeapEntry<'_>> = records.iter().map(HeapEntry::new).collect();
        let mut out = Vec::new();
        for _ in 0..records.len() {
            out.push(queue.extract_max().unwrap().priority());
        }
        prop_assert!(out.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(queue.extract_max().is_err());
    }
}
