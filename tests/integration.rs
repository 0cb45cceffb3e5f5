//! Integration tests for the canopy containers.
//! These tests only use the public API.

use canopy::{Associative, BPlusTree, BTree, BTreeDictionary, Dictionary, Error, Record};

// ==================== Shared Contract ====================

fn fill_with<C: Associative<i32, String> + Default>(keys: &[i32]) -> C {
    let mut engine = C::default();
    for &k in keys {
        engine
            .insert(Record::Entry(k, k.to_string()))
            .expect("fresh key");
    }
    engine
}

fn contract_round_trip<C: Associative<i32, String> + Default>() {
    let mut engine: C = fill_with(&[3, 1, 2]);

    assert_eq!(engine.len(), 3);
    assert!(!engine.is_empty());
    for k in 1..=3 {
        assert!(engine.contains(&k));
        assert_eq!(engine.get(&k).unwrap().value().unwrap(), &k.to_string());
    }

    // insert then remove then contains == false
    engine.insert(Record::Entry(9, "nine".to_string())).unwrap();
    assert!(engine.remove(&9).is_some());
    assert!(!engine.contains(&9));

    // remove of an absent key is a no-op, twice over
    assert!(engine.remove(&9).is_none());
    assert!(engine.remove(&9).is_none());
    assert_eq!(engine.len(), 3);
}

fn contract_duplicate_insert<C: Associative<i32, String> + Default>() {
    let mut engine = C::default();
    engine.insert(Record::Entry(1, "one".to_string())).unwrap();

    let err = engine
        .insert(Record::Entry(1, "dup".to_string()))
        .unwrap_err();
    assert!(matches!(err, Error::KeyCollision));

    // The colliding insert must leave the stored value untouched.
    assert_eq!(engine.get(&1).unwrap().value().unwrap(), "one");
    assert_eq!(engine.len(), 1);
}

fn contract_ordered_iteration<C: Associative<i32, String> + Default>() {
    let engine: C = fill_with(&[41, 7, 23, 2, 38, 15]);

    let keys: Vec<i32> = engine.iter().map(|r| *r.key()).collect();
    assert_eq!(keys, vec![2, 7, 15, 23, 38, 41]);

    let backward: Vec<i32> = engine.iter().rev().map(|r| *r.key()).collect();
    assert_eq!(backward, vec![41, 38, 23, 15, 7, 2]);

    // size == number of records enumerated
    assert_eq!(engine.len(), engine.iter().count());
}

#[test]
fn test_btree_contract() {
    contract_round_trip::<BTree<i32, String>>();
    contract_duplicate_insert::<BTree<i32, String>>();
    contract_ordered_iteration::<BTree<i32, String>>();
}

#[test]
fn test_bplustree_contract() {
    contract_round_trip::<BPlusTree<i32, String>>();
    contract_duplicate_insert::<BPlusTree<i32, String>>();
    contract_ordered_iteration::<BPlusTree<i32, String>>();
}

// ==================== Concrete Scenarios ====================

#[test]
fn test_small_degree_mixed_inserts() {
    let mut tree: BTree<i32, i32> = BTree::with_degree(2);
    for k in [10, 20, 5, 6, 12, 30, 7, 17] {
        tree.insert_entry(k, k).unwrap();
    }

    let keys: Vec<i32> = tree.iter().map(|r| *r.key()).collect();
    assert_eq!(keys, vec![5, 6, 7, 10, 12, 17, 20, 30]);
    assert_eq!(tree.height(), 2);
}

#[test]
fn test_small_degree_remove_middle() {
    let mut tree: BTree<i32, i32> = BTree::with_degree(2);
    for k in 1..=10 {
        tree.insert_entry(k, k).unwrap();
    }
    tree.remove(&6);

    let keys: Vec<i32> = tree.iter().map(|r| *r.key()).collect();
    assert_eq!(keys, vec![1, 2, 3, 4, 5, 7, 8, 9, 10]);
    assert!(!tree.contains(&6));
    assert_eq!(tree.len(), 9);
}

#[test]
fn test_thousand_sequential_inserts() {
    let mut btree: BTree<u32, u32> = BTree::new();
    let mut bplus: BPlusTree<u32, u32> = BPlusTree::new();
    for k in 0..1000 {
        btree.insert_entry(k, k).unwrap();
        bplus.insert_entry(k, k).unwrap();
    }

    assert_eq!(btree.len(), 1000);
    assert_eq!(bplus.len(), 1000);
    assert!(!btree.find(&500).is_end());
    assert!(!bplus.find(&500).is_end());

    let expected: Vec<u32> = (0..1000).collect();
    assert_eq!(btree.iter().map(|r| *r.key()).collect::<Vec<_>>(), expected);
    assert_eq!(bplus.iter().map(|r| *r.key()).collect::<Vec<_>>(), expected);
}

#[test]
fn test_duplicate_pair_keeps_first_value() {
    let mut tree: BPlusTree<i32, String> = BPlusTree::new();
    tree.insert(Record::Entry(1, "one".to_string())).unwrap();

    let err = tree.insert(Record::Entry(1, "dup".to_string())).unwrap_err();
    assert!(matches!(err, Error::KeyCollision));
    assert_eq!(tree.get(&1).unwrap().value().unwrap(), "one");
}

// ==================== Cursors ====================

#[test]
fn test_cursor_walks_match_between_engines() {
    let keys = [15, 3, 9, 27, 1, 21, 33];
    let btree: BTree<i32, String> = fill_with(&keys);
    let bplus: BPlusTree<i32, String> = fill_with(&keys);

    let mut sorted = keys.to_vec();
    sorted.sort();

    let mut b_cursor = btree.begin();
    let mut p_cursor = bplus.begin();
    for &expected in &sorted {
        b_cursor.move_next();
        p_cursor.move_next();
        assert_eq!(b_cursor.key(), Some(&expected));
        assert_eq!(p_cursor.key(), Some(&expected));
    }
    b_cursor.move_next();
    p_cursor.move_next();
    assert!(b_cursor.is_end());
    assert!(p_cursor.is_end());

    // Decrementing the end sentinel lands on the last record.
    b_cursor.move_prev();
    p_cursor.move_prev();
    assert_eq!(b_cursor.key(), Some(sorted.last().unwrap()));
    assert_eq!(p_cursor.key(), Some(sorted.last().unwrap()));
}

#[test]
fn test_find_returns_end_for_absent_keys() {
    let tree: BTree<i32, String> = fill_with(&[1, 2, 3]);
    assert!(tree.find(&42).is_end());
    assert_eq!(tree.find(&42), tree.end());

    let tree: BPlusTree<i32, String> = fill_with(&[1, 2, 3]);
    assert!(tree.find(&42).is_end());
    assert_eq!(tree.find(&42), tree.end());
}

// ==================== Dictionary Facade ====================

#[test]
fn test_dictionary_uniform_surface() {
    let mut dict: BTreeDictionary<String, u64> = Dictionary::new();
    dict.add("charlie".to_string(), 3).unwrap();
    dict.add("alpha".to_string(), 1).unwrap();
    dict.add("bravo".to_string(), 2).unwrap();

    let names: Vec<&String> = dict.keys().collect();
    assert_eq!(names, ["alpha", "bravo", "charlie"]);

    *dict.get_mut(&"bravo".to_string()).unwrap() = 20;
    assert_eq!(*dict.get(&"bravo".to_string()).unwrap(), 20);

    assert!(matches!(
        dict.get(&"delta".to_string()),
        Err(Error::AbsentKey)
    ));
    assert!(matches!(
        dict.add("alpha".to_string(), 9),
        Err(Error::KeyCollision)
    ));
}

// ==================== Degree Boundaries ====================

#[test]
fn test_exact_capacity_boundaries() {
    for degree in [2usize, 3, 4] {
        let cap = 2 * degree - 1;

        let mut tree: BTree<usize, usize> = BTree::with_degree(degree);
        for k in 0..cap {
            tree.insert_entry(k, k).unwrap();
        }
        assert_eq!(tree.height(), 1, "degree {degree}: no split before 2t-1");
        tree.insert_entry(cap, cap).unwrap();
        assert_eq!(tree.height(), 2, "degree {degree}: split at 2t");

        // Draining down again collapses the root.
        for k in 0..=cap {
            tree.remove(&k);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
    }
}

#[test]
fn test_single_element_tree() {
    let mut tree: BPlusTree<i32, i32> = BPlusTree::with_degree(2);
    tree.insert_entry(7, 70).unwrap();
    assert_eq!(tree.len(), 1);

    assert_eq!(tree.remove(&7).unwrap().value(), Some(&70));
    assert!(tree.is_empty());
    assert!(tree.find(&7).is_end());
}
