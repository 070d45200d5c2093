//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cost, recency and failure guarantees of the store.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::CacheStore;
use crate::config::CacheConfig;
use crate::error::CacheError;

// == Test Configuration ==
const TEST_CAPACITY: u64 = 20;

fn test_store(capacity: u64) -> CacheStore {
    CacheStore::new(
        CacheConfig::default()
            .with_total_cost_limit(capacity)
            .with_count_limit(0),
    )
}

// == Strategies ==
/// Generates keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    "[a-h]{1,2}".prop_map(String::into_bytes)
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: Vec<u8>, value: Vec<u8> },
    SetWithCost { key: Vec<u8>, value: Vec<u8>, cost: i64 },
    Get { key: Vec<u8> },
    Remove { key: Vec<u8> },
    RemoveAll,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => (key_strategy(), value_strategy(), -3i64..30)
            .prop_map(|(key, value, cost)| CacheOp::SetWithCost { key, value, cost }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::RemoveAll),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // After every operation the resident cost stays within the limit and
    // matches the sum of resident entry costs tracked alongside.
    #[test]
    fn prop_total_cost_never_exceeds_limit(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = test_store(TEST_CAPACITY);
        // Cost of each key that is resident, as far as we know
        let mut costs: HashMap<Vec<u8>, u64> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value).unwrap();
                    costs.insert(key, 1);
                }
                CacheOp::SetWithCost { key, value, cost } => {
                    if store.set_with_cost(key.clone(), value, cost).is_ok() {
                        costs.insert(key, cost as u64);
                    }
                }
                CacheOp::Get { key } => {
                    let _ = store.get(&key);
                }
                CacheOp::Remove { key } => {
                    store.remove(&key);
                    costs.remove(&key);
                }
                CacheOp::RemoveAll => {
                    store.remove_all();
                    costs.clear();
                }
            }

            // Forget evicted keys
            costs.retain(|key, _| store.contains(key));

            prop_assert!(store.total_cost() <= TEST_CAPACITY);
            prop_assert_eq!(store.total_cost(), costs.values().sum::<u64>());
            prop_assert_eq!(store.len(), costs.len());
        }
    }

    // Storing then immediately retrieving returns the stored bytes.
    #[test]
    fn prop_set_then_get_returns_value(key in key_strategy(), value in value_strategy(), cost in 0i64..=20) {
        let mut store = test_store(TEST_CAPACITY);

        store.set_with_cost(key.clone(), value.clone(), cost).unwrap();
        prop_assert_eq!(store.get(&key).unwrap(), value);
    }

    // Remove is always followed by NotFound.
    #[test]
    fn prop_remove_then_get_not_found(
        ops in prop::collection::vec(cache_op_strategy(), 0..30),
        key in key_strategy()
    ) {
        let mut store = test_store(TEST_CAPACITY);
        for op in ops {
            if let CacheOp::Set { key, value } = op {
                store.set(key, value).unwrap();
            }
        }

        store.remove(&key);
        prop_assert!(matches!(store.get(&key), Err(CacheError::NotFound(_))));
    }

    // Remove-all forgets every key that was ever stored.
    #[test]
    fn prop_remove_all_forgets_everything(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..40)
    ) {
        let mut store = test_store(TEST_CAPACITY);
        for (key, value) in &entries {
            store.set(key.clone(), value.clone()).unwrap();
        }

        store.remove_all();

        prop_assert_eq!(store.total_cost(), 0);
        for (key, _) in &entries {
            prop_assert!(matches!(store.get(key), Err(CacheError::NotFound(_))));
        }
    }

    // An entry larger than the limit is refused and changes nothing.
    #[test]
    fn prop_oversized_entry_leaves_store_unchanged(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..20),
        key in key_strategy(),
        excess in 1i64..1000
    ) {
        let mut store = test_store(TEST_CAPACITY);
        for (key, value) in &entries {
            store.set(key.clone(), value.clone()).unwrap();
        }
        let before_len = store.len();
        let before_cost = store.total_cost();
        let prior = store.get(&key).ok();

        let cost = TEST_CAPACITY as i64 + excess;
        let result = store.set_with_cost(key.clone(), b"new".to_vec(), cost);

        prop_assert!(
            matches!(result, Err(CacheError::CapacityExceeded { .. })),
            "expected CapacityExceeded, got {:?}",
            result
        );
        prop_assert_eq!(store.len(), before_len);
        prop_assert_eq!(store.total_cost(), before_cost);
        prop_assert_eq!(store.get(&key).ok(), prior);
    }
}

// Property tests with costs and limits near the integer bounds
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Huge costs against a huge limit never overflow the running total and
    // still evict to keep it within the limit.
    #[test]
    fn prop_huge_costs_stay_within_limit(
        limit in prop_oneof![Just(u64::MAX), (u64::MAX - 1000)..=u64::MAX, (i64::MAX as u64)..=u64::MAX],
        ops in prop::collection::vec(
            (key_strategy(), prop_oneof![(i64::MAX - 1000)..=i64::MAX, 0i64..10]),
            1..40
        )
    ) {
        let mut store = test_store(limit);
        let mut costs: HashMap<Vec<u8>, u64> = HashMap::new();

        for (key, cost) in ops {
            store.set_with_cost(key.clone(), b"v".to_vec(), cost).unwrap();
            costs.insert(key, cost as u64);
            costs.retain(|key, _| store.contains(key));

            let sum: u128 = costs.values().map(|&c| u128::from(c)).sum();
            prop_assert!(sum <= u128::from(limit));
            prop_assert_eq!(u128::from(store.total_cost()), sum);
        }
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With unit costs, filling the store and adding one more key evicts the
    // key read least recently, taking reads into account.
    #[test]
    fn prop_lru_eviction_order(
        reads in prop::collection::vec(0usize..5, 0..20)
    ) {
        let keys: Vec<Vec<u8>> = (0..5).map(|i| format!("key{i}").into_bytes()).collect();
        let mut store = test_store(keys.len() as u64);

        // Model: most recently used at the back
        let mut order: Vec<usize> = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            store.set(key.clone(), b"v".to_vec()).unwrap();
            order.push(i);
        }
        for i in reads {
            store.get(&keys[i]).unwrap();
            order.retain(|&k| k != i);
            order.push(i);
        }

        store.set(b"newcomer".to_vec(), b"v".to_vec()).unwrap();

        let expected_victim = &keys[order[0]];
        prop_assert!(!store.contains(expected_victim), "least recently used key should be evicted");
        for &i in &order[1..] {
            prop_assert!(store.contains(&keys[i]));
        }
        prop_assert!(store.contains(b"newcomer"));
    }
}
