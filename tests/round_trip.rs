//! Property tests: after any interleaving of list edits and user gestures,
//! a bound list and its control's selection hold the same items.

use proptest::prelude::*;
use spark_selection::{ListBox, ObservableVec, SyncEngine};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Op {
    Push(u8),
    Insert(usize, u8),
    Remove(u8),
    Clear,
    ReplaceAll(BTreeSet<u8>),
    Toggle(u8),
    Click(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..24).prop_map(Op::Push),
        2 => (0usize..32, 0u8..24).prop_map(|(index, item)| Op::Insert(index, item)),
        3 => (0u8..24).prop_map(Op::Remove),
        1 => Just(Op::Clear),
        1 => prop::collection::btree_set(0u8..24, 0..8).prop_map(Op::ReplaceAll),
        4 => (0u8..24).prop_map(Op::Toggle),
        1 => (0u8..24).prop_map(Op::Click),
    ]
}

fn sorted(mut items: Vec<u8>) -> Vec<u8> {
    items.sort_unstable();
    items
}

proptest! {
    #[test]
    fn list_and_selection_converge(
        initial in prop::collection::btree_set(0u8..24, 0..6),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let engine: SyncEngine<u8> = SyncEngine::new();
        // Extended mode: click replaces the selection, ctrl-click toggles.
        let list_box: ListBox<u8> = ListBox::new();
        let list = ObservableVec::from_vec(initial.into_iter().collect());
        engine.attach(&list_box, Some(list.shared())).unwrap();

        for op in ops {
            match op {
                // Items stay distinct on the list side; the selection is a set.
                Op::Push(item) => {
                    if !list.contains(&item) {
                        list.push(item).unwrap();
                    }
                }
                Op::Insert(index, item) => {
                    if !list.contains(&item) {
                        list.insert(index % (list.len() + 1), item).unwrap();
                    }
                }
                Op::Remove(item) => {
                    list.remove_item(&item).unwrap();
                }
                Op::Clear => list.clear().unwrap(),
                Op::ReplaceAll(items) => list.replace_all(items.into_iter().collect()).unwrap(),
                Op::Toggle(item) => list_box.ctrl_click(item).unwrap(),
                Op::Click(item) => list_box.click(item).unwrap(),
            }

            prop_assert_eq!(sorted(list.to_vec()), sorted(list_box.selected_items()));
            prop_assert!(!engine.is_control_updating(list_box.id()));
            prop_assert!(!engine.is_list_updating(list.id()));
        }
    }

    #[test]
    fn attach_always_mirrors_list(
        selected in prop::collection::btree_set(0u8..24, 0..10),
        bound in prop::collection::vec(0u8..24, 0..10),
    ) {
        let engine: SyncEngine<u8> = SyncEngine::new();
        let list_box: ListBox<u8> = ListBox::new();
        list_box.selection().extend(selected).unwrap();

        let mut seen = BTreeSet::new();
        let distinct: Vec<u8> = bound.into_iter().filter(|item| seen.insert(*item)).collect();
        let list = ObservableVec::from_vec(distinct.clone());

        engine.attach(&list_box, Some(list.shared())).unwrap();

        prop_assert_eq!(list_box.selected_items(), distinct.clone());
        prop_assert_eq!(list.to_vec(), distinct);
    }

    #[test]
    fn two_controls_on_one_list_converge(
        initial in prop::collection::btree_set(0u8..24, 0..6),
        ops in prop::collection::vec((any::<bool>(), op_strategy()), 0..40),
    ) {
        let engine: SyncEngine<u8> = SyncEngine::new();
        let first: ListBox<u8> = ListBox::new();
        let second: ListBox<u8> = ListBox::new();
        let list = ObservableVec::from_vec(initial.into_iter().collect());
        engine.attach(&first, Some(list.shared())).unwrap();
        engine.attach(&second, Some(list.shared())).unwrap();

        for (on_first, op) in ops {
            let target = if on_first { &first } else { &second };
            match op {
                Op::Push(item) => {
                    if !list.contains(&item) {
                        list.push(item).unwrap();
                    }
                }
                Op::Insert(index, item) => {
                    if !list.contains(&item) {
                        list.insert(index % (list.len() + 1), item).unwrap();
                    }
                }
                Op::Remove(item) => {
                    list.remove_item(&item).unwrap();
                }
                Op::Clear => list.clear().unwrap(),
                Op::ReplaceAll(items) => list.replace_all(items.into_iter().collect()).unwrap(),
                Op::Toggle(item) => target.ctrl_click(item).unwrap(),
                Op::Click(item) => target.click(item).unwrap(),
            }

            let expected = sorted(list.to_vec());
            prop_assert_eq!(sorted(first.selected_items()), expected.clone());
            prop_assert_eq!(sorted(second.selected_items()), expected);
        }
    }
}
