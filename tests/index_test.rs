//! Tests for the ordered request index (both variants).

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use civic_core::index::{OrderedIndex, RecordLookup, RedBlackIndex, UnbalancedIndex};
use civic_core::record::RequestRecord;

fn record(id: &str) -> RequestRecord {
    RequestRecord::new(id, "Sanitation", 2, Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap())
}

fn ids(index: &dyn OrderedIndex) -> Vec<String> {
    index.in_order().iter().map(|r| r.id().to_string()).collect()
}

#[test]
fn find_on_empty_index_is_absent() {
    let rb = RedBlackIndex::new();
    let plain = UnbalancedIndex::new();
    assert!(rb.find("SR-1").is_none());
    assert!(plain.find("SR-1").is_none());
    assert!(OrderedIndex::is_empty(&rb));
}

#[test]
fn find_non_matching_key_is_absent() {
    let mut rb = RedBlackIndex::new();
    for id in ["SR-5", "SR-2", "SR-8"] {
        rb.insert(record(id));
    }
    assert!(rb.find("SR-3").is_none());
    assert_eq!(rb.find("SR-8").unwrap().id(), "SR-8");
}

#[test]
fn both_variants_share_contract() {
    let mut variants: Vec<Box<dyn OrderedIndex>> =
        vec![Box::new(RedBlackIndex::new()), Box::new(UnbalancedIndex::new())];
    for index in variants.iter_mut() {
        for id in ["M", "C", "X", "A", "E", "C"] {
            index.insert(record(id));
        }
        assert_eq!(index.len(), 5);
        assert_eq!(ids(&**index), vec!["A", "C", "E", "M", "X"]);
        assert!(index.find("E").is_some());
    }
}

#[test]
fn balanced_variant_is_shallower_on_sorted_input() {
    let mut rb = RedBlackIndex::new();
    let mut plain = UnbalancedIndex::new();
    for i in 0..512 {
        let id = format!("SR-{i:04}");
        rb.insert(record(&id));
        plain.insert(record(&id));
    }
    assert_eq!(plain.height(), 512);
    assert!(rb.height() <= 18, "red-black height {}", rb.height());
    assert!(rb.check_invariants().is_ok());
}

#[test]
fn duplicate_insert_leaves_structure_unchanged() {
    let mut rb = RedBlackIndex::new();
    for i in [50, 20, 80, 10, 30, 70, 90, 60] {
        rb.insert(record(&format!("K{i}")));
    }
    let before_height = rb.height();
    let before_black = rb.check_invariants().unwrap();
    let root_before = rb.root().unwrap().record().id().to_string();

    assert!(!rb.insert(record("K30")));
    assert_eq!(rb.len(), 8);
    assert_eq!(rb.height(), before_height);
    assert_eq!(rb.check_invariants().unwrap(), before_black);
    assert_eq!(rb.root().unwrap().record().id(), root_before);
}

proptest! {
    #[test]
    fn in_order_is_sorted_for_any_sequence(keys in prop::collection::vec(0u32..500, 0..200)) {
        let mut rb = RedBlackIndex::new();
        let mut plain = UnbalancedIndex::new();
        for k in &keys {
            rb.insert(record(&format!("R{k:03}")));
            plain.insert(record(&format!("R{k:03}")));
        }
        let rb_ids = ids(&rb);
        let plain_ids = ids(&plain);
        prop_assert!(rb_ids.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(&rb_ids, &plain_ids);

        let mut unique = keys.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(rb.len(), unique.len());
        prop_assert_eq!(plain.len(), unique.len());
    }

    #[test]
    fn red_black_invariants_hold_after_every_insert(keys in prop::collection::vec(any::<u16>(), 1..150)) {
        let mut rb = RedBlackIndex::new();
        for k in keys {
            rb.insert(record(&format!("{k:05}")));
            let black_height = rb.check_invariants();
            prop_assert!(black_height.is_ok(), "{:?}", black_height);
            prop_assert!(!rb.root().unwrap().is_red());
        }
    }

    #[test]
    fn reinsert_keeps_count_and_find(keys in prop::collection::vec(0u8..50, 1..60), pick in any::<prop::sample::Index>()) {
        let mut rb = RedBlackIndex::new();
        for k in &keys {
            rb.insert(record(&format!("{k:02}")));
        }
        let target = format!("{:02}", keys[pick.index(keys.len())]);
        let count = rb.len();
        let found = rb.find(&target).cloned();

        let mut changed = record(&target);
        changed.priority = 99;
        prop_assert!(!rb.insert(changed));
        prop_assert_eq!(rb.len(), count);
        prop_assert_eq!(rb.find(&target).cloned(), found);
    }
}
