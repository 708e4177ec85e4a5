//! Property-based testing for the containers
//!
//! Each container is driven with random operation sequences and compared
//! step by step against a std collection that models the same semantics.

use dsdb::{codec, Array, CompleteBinaryTree, DoublyList, Queue, SinglyList, Stack, Store, TraversalOrder};
use proptest::prelude::*;
use std::collections::VecDeque;

// =============================================================================
// PROPERTY TEST GENERATORS
// =============================================================================

/// Short values from a small alphabet so value-relative operations hit often
fn value_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(str::to_string)
}

/// Values that the text codec can represent
fn token_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,6}"
}

#[derive(Debug, Clone)]
enum ArrayOp {
    Push(String),
    Insert(i64, String),
    Remove(i64),
    Replace(i64, String),
    Get(i64),
}

fn array_ops_strategy() -> impl Strategy<Value = Vec<ArrayOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => value_strategy().prop_map(ArrayOp::Push),
            2 => (-2i64..40, value_strategy()).prop_map(|(i, v)| ArrayOp::Insert(i, v)),
            3 => (-2i64..40).prop_map(ArrayOp::Remove),
            1 => (-2i64..40, value_strategy()).prop_map(|(i, v)| ArrayOp::Replace(i, v)),
            1 => (-2i64..40).prop_map(ArrayOp::Get),
        ],
        0..300,
    )
}

#[derive(Debug, Clone)]
enum ListOp {
    PushFront(String),
    PushBack(String),
    InsertBefore(String, String),
    InsertAfter(String, String),
    PopFront,
    PopBack,
    RemoveValue(String),
    RemoveBefore(String),
    RemoveAfter(String),
}

fn list_ops_strategy() -> impl Strategy<Value = Vec<ListOp>> {
    prop::collection::vec(
        prop_oneof![
            value_strategy().prop_map(ListOp::PushFront),
            value_strategy().prop_map(ListOp::PushBack),
            (value_strategy(), value_strategy()).prop_map(|(t, v)| ListOp::InsertBefore(t, v)),
            (value_strategy(), value_strategy()).prop_map(|(t, v)| ListOp::InsertAfter(t, v)),
            Just(ListOp::PopFront),
            Just(ListOp::PopBack),
            value_strategy().prop_map(ListOp::RemoveValue),
            value_strategy().prop_map(ListOp::RemoveBefore),
            value_strategy().prop_map(ListOp::RemoveAfter),
        ],
        0..200,
    )
}

/// Applies a list operation to the model, returning whether it succeeded
fn apply_list_model(model: &mut VecDeque<String>, op: &ListOp) -> bool {
    let position = |model: &VecDeque<String>, target: &str| model.iter().position(|v| v == target);
    match op {
        ListOp::PushFront(v) => {
            model.push_front(v.clone());
            true
        }
        ListOp::PushBack(v) => {
            model.push_back(v.clone());
            true
        }
        ListOp::InsertBefore(t, v) => match position(model, t) {
            Some(i) => {
                model.insert(i, v.clone());
                true
            }
            None => false,
        },
        ListOp::InsertAfter(t, v) => match position(model, t) {
            Some(i) => {
                model.insert(i + 1, v.clone());
                true
            }
            None => false,
        },
        ListOp::PopFront => model.pop_front().is_some(),
        ListOp::PopBack => model.pop_back().is_some(),
        ListOp::RemoveValue(v) => match position(model, v) {
            Some(i) => model.remove(i).is_some(),
            None => false,
        },
        ListOp::RemoveBefore(t) => match position(model, t) {
            Some(i) if i > 0 => model.remove(i - 1).is_some(),
            _ => false,
        },
        ListOp::RemoveAfter(t) => match position(model, t) {
            Some(i) => model.remove(i + 1).is_some(),
            None => false,
        },
    }
}

macro_rules! apply_list {
    ($list:expr, $op:expr) => {
        match $op {
            ListOp::PushFront(v) => {
                $list.push_front(v.as_str());
                true
            }
            ListOp::PushBack(v) => {
                $list.push_back(v.as_str());
                true
            }
            ListOp::InsertBefore(t, v) => $list.insert_before(t, v.as_str()),
            ListOp::InsertAfter(t, v) => $list.insert_after(t, v.as_str()),
            ListOp::PopFront => $list.pop_front(),
            ListOp::PopBack => $list.pop_back(),
            ListOp::RemoveValue(v) => $list.remove_value(v),
            ListOp::RemoveBefore(t) => $list.remove_before(t),
            ListOp::RemoveAfter(t) => $list.remove_after(t),
        }
    };
}

/// Pre-order walk over heap indices of a breadth-first-filled tree
fn heap_preorder(index: usize, len: usize, out: &mut Vec<usize>) {
    if index < len {
        out.push(index);
        heap_preorder(2 * index + 1, len, out);
        heap_preorder(2 * index + 2, len, out);
    }
}

// =============================================================================
// ARRAY PROPERTY TESTS
// =============================================================================

proptest! {
    #[test]
    fn prop_array_matches_vec(ops in array_ops_strategy(), capacity in 0usize..8) {
        let mut array = Array::with_capacity(capacity);
        let mut model: Vec<String> = Vec::new();

        for op in &ops {
            match op {
                ArrayOp::Push(v) => {
                    array.push_back(v.as_str());
                    model.push(v.clone());
                }
                ArrayOp::Insert(i, v) => {
                    let valid = *i >= 0 && (*i as usize) <= model.len();
                    prop_assert_eq!(array.insert(*i, v.as_str()), valid);
                    if valid {
                        model.insert(*i as usize, v.clone());
                    }
                }
                ArrayOp::Remove(i) => {
                    let valid = *i >= 0 && (*i as usize) < model.len();
                    prop_assert_eq!(array.remove(*i), valid);
                    if valid {
                        model.remove(*i as usize);
                    }
                }
                ArrayOp::Replace(i, v) => {
                    let valid = *i >= 0 && (*i as usize) < model.len();
                    prop_assert_eq!(array.replace(*i, v.as_str()), valid);
                    if valid {
                        model[*i as usize] = v.clone();
                    }
                }
                ArrayOp::Get(i) => {
                    let expected = usize::try_from(*i).ok().and_then(|i| model.get(i)).map(String::as_str);
                    prop_assert_eq!(array.get(*i), expected);
                }
            }
            prop_assert_eq!(array.len(), model.len());
            prop_assert!(array.capacity() >= array.len().max(1));
        }
        prop_assert_eq!(array.to_vec(), model);
    }

    #[test]
    fn prop_array_insert_then_get(values in prop::collection::vec(value_strategy(), 0..50), value in value_strategy()) {
        for index in 0..=values.len() {
            let mut array: Array = values.iter().map(String::as_str).collect();
            prop_assert!(array.insert(index as i64, value.as_str()));
            prop_assert_eq!(array.get(index as i64), Some(value.as_str()));
            prop_assert_eq!(array.len(), values.len() + 1);
        }
    }

    #[test]
    fn prop_array_remove_shifts_left(values in prop::collection::vec(value_strategy(), 1..50), pick in any::<prop::sample::Index>()) {
        let index = pick.index(values.len());
        let mut array: Array = values.iter().map(String::as_str).collect();
        prop_assert!(array.remove(index as i64));
        for i in index..values.len() - 1 {
            prop_assert_eq!(array.get(i as i64), Some(values[i + 1].as_str()));
        }
    }
}

// =============================================================================
// LIST PROPERTY TESTS
// =============================================================================

proptest! {
    #[test]
    fn prop_singly_list_matches_model(ops in list_ops_strategy()) {
        let mut list = SinglyList::new();
        let mut model = VecDeque::new();
        for op in &ops {
            let before = list.len();
            let ok = apply_list!(list, op);
            prop_assert_eq!(ok, apply_list_model(&mut model, op), "{:?}", op);
            if !ok {
                prop_assert_eq!(list.len(), before);
            }
            prop_assert_eq!(list.len(), model.len());
            prop_assert_eq!(list.front(), model.front().map(String::as_str));
            prop_assert_eq!(list.back(), model.back().map(String::as_str));
        }
        prop_assert_eq!(list.to_vec(), Vec::from(model.clone()));
        let reversed: Vec<&str> = model.iter().rev().map(String::as_str).collect();
        prop_assert_eq!(list.to_vec_rev(), reversed);
    }

    #[test]
    fn prop_doubly_list_matches_model(ops in list_ops_strategy()) {
        let mut list = DoublyList::new();
        let mut model = VecDeque::new();
        for op in &ops {
            let ok = apply_list!(list, op);
            prop_assert_eq!(ok, apply_list_model(&mut model, op), "{:?}", op);
            prop_assert_eq!(list.len(), model.len());
        }
        prop_assert_eq!(list.to_vec(), Vec::from(model.clone()));
        let backward: Vec<&str> = list.iter_rev().collect();
        let reversed: Vec<&str> = model.iter().rev().map(String::as_str).collect();
        prop_assert_eq!(backward, reversed);
    }

    #[test]
    fn prop_doubly_links_navigate_both_ways(values in prop::collection::vec(value_strategy(), 1..40)) {
        let list: DoublyList = values.iter().map(String::as_str).collect();
        let mut id = list.find(&values[0]).unwrap();
        prop_assert_eq!(list.prev(id), None);
        for expected in &values[1..] {
            let next = list.next(id).unwrap();
            prop_assert_eq!(list.value(next), Some(expected.as_str()));
            prop_assert_eq!(list.prev(next), Some(id));
            id = next;
        }
        prop_assert_eq!(list.next(id), None);
    }
}

// =============================================================================
// STACK / QUEUE PROPERTY TESTS
// =============================================================================

proptest! {
    #[test]
    fn prop_stack_is_lifo(ops in prop::collection::vec(prop::option::of(value_strategy()), 0..300), capacity in 0usize..4) {
        let mut stack = Stack::with_capacity(capacity);
        let mut model = Vec::new();
        for op in ops {
            match op {
                Some(v) => {
                    stack.push(v.as_str());
                    model.push(v);
                }
                None => prop_assert_eq!(stack.pop(), model.pop()),
            }
            prop_assert_eq!(stack.len(), model.len());
            prop_assert_eq!(stack.peek(), model.last().map(String::as_str));
            prop_assert_eq!(stack.is_empty(), model.is_empty());
        }
    }

    #[test]
    fn prop_queue_is_fifo(ops in prop::collection::vec(prop::option::of(value_strategy()), 0..300), capacity in 0usize..4) {
        let mut queue = Queue::with_capacity(capacity);
        let mut model = VecDeque::new();
        for op in ops {
            match op {
                Some(v) => {
                    queue.push(v.as_str());
                    model.push_back(v);
                }
                None => prop_assert_eq!(queue.pop(), model.pop_front()),
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.peek(), model.front().map(String::as_str));
            prop_assert!(queue.iter().eq(model.iter().map(String::as_str)));
        }
    }
}

// =============================================================================
// TREE PROPERTY TESTS
// =============================================================================

proptest! {
    #[test]
    fn prop_tree_level_order_is_insertion_order(keys in prop::collection::vec(-50i64..50, 0..200)) {
        let mut tree = CompleteBinaryTree::new();
        for (i, &key) in keys.iter().enumerate() {
            let value = format!("v{}", i);
            prop_assert!(tree.insert(key, value));
        }
        let level: Vec<i64> = tree.iter(TraversalOrder::LevelOrder).map(|(k, _)| k).collect();
        prop_assert_eq!(&level, &keys);
        prop_assert_eq!(tree.len(), keys.len());

        let expected_height = if keys.is_empty() { 0 } else { (usize::BITS - keys.len().leading_zeros()) as usize };
        prop_assert_eq!(tree.height(), expected_height);
        // Breadth-first filling leaves a lone left child exactly when the count is even
        prop_assert_eq!(tree.is_full(), keys.len() % 2 == 1 || keys.is_empty());

        for order in TraversalOrder::ALL {
            prop_assert_eq!(tree.iter(order).count(), keys.len());
        }
    }

    #[test]
    fn prop_tree_search_is_first_in_preorder(keys in prop::collection::vec(0i64..8, 1..60), probe in 0i64..8) {
        let mut tree = CompleteBinaryTree::new();
        for (i, &key) in keys.iter().enumerate() {
            tree.insert(key, format!("v{}", i));
        }
        let mut order = Vec::new();
        heap_preorder(0, keys.len(), &mut order);
        let expected = order.into_iter().find(|&i| keys[i] == probe).map(|i| format!("v{}", i));
        prop_assert_eq!(tree.search(probe).map(str::to_string), expected);

        let preorder: Vec<i64> = tree.iter(TraversalOrder::PreOrder).map(|(k, _)| k).collect();
        let mut indices = Vec::new();
        heap_preorder(0, keys.len(), &mut indices);
        let modelled: Vec<i64> = indices.into_iter().map(|i| keys[i]).collect();
        prop_assert_eq!(preorder, modelled);
    }
}

// =============================================================================
// CODEC PROPERTY TESTS
// =============================================================================

proptest! {
    #[test]
    fn prop_codec_round_trip(
        arrays in prop::collection::btree_map(token_strategy(), prop::collection::vec(token_strategy(), 0..10), 0..3),
        lists in prop::collection::btree_map(token_strategy(), prop::collection::vec(token_strategy(), 0..10), 0..3),
        stacks in prop::collection::btree_map(token_strategy(), prop::collection::vec(token_strategy(), 0..10), 0..3),
        queues in prop::collection::btree_map(token_strategy(), prop::collection::vec(token_strategy(), 0..10), 0..3),
        trees in prop::collection::btree_map(token_strategy(), prop::collection::vec((any::<i64>(), token_strategy()), 0..20), 0..3),
    ) {
        let mut store = Store::new();
        for (name, values) in &arrays {
            store.insert_array(name.as_str(), values.iter().map(String::as_str).collect());
        }
        for (name, values) in &lists {
            store.insert_singly_list(name.as_str(), values.iter().map(String::as_str).collect());
            store.insert_doubly_list(name.as_str(), values.iter().map(String::as_str).collect());
        }
        for (name, values) in &stacks {
            let mut stack = Stack::new();
            values.iter().for_each(|v| stack.push(v.as_str()));
            store.insert_stack(name.as_str(), stack);
        }
        for (name, values) in &queues {
            let mut queue = Queue::with_capacity(2);
            values.iter().for_each(|v| queue.push(v.as_str()));
            // Rotate so the live window wraps before encoding
            if let Some(front) = queue.pop() {
                queue.push(front);
            }
            store.insert_queue(name.as_str(), queue);
        }
        for (name, pairs) in &trees {
            let mut tree = CompleteBinaryTree::new();
            for (key, value) in pairs {
                tree.insert(*key, value.as_str());
            }
            store.insert_tree(name.as_str(), tree);
        }

        let text = codec::encode(&store).unwrap();
        let (decoded, report) = codec::decode(&text);
        prop_assert_eq!(report.skipped, 0);
        prop_assert_eq!(report.loaded, store.len());
        prop_assert_eq!(&decoded, &store);
        prop_assert_eq!(codec::encode(&decoded).unwrap(), text);
    }
}
