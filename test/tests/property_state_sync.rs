//! Property tests for the merge and interpolation laws the protocol
//! relies on.

use std::time::Duration;

use proptest::prelude::*;

use mirage_shared::{Step, Value, World};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-1.0e6..1.0e6f64).prop_map(Value::Number),
        "[a-z]{0,6}".prop_map(Value::Text),
    ]
}

fn state_tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            proptest::collection::btree_map("[a-z]{1,3}", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #[test]
    fn merging_a_tree_into_its_clone_changes_nothing(tree in state_tree()) {
        let mut copy = tree.clone();
        copy.merge_from(&tree);
        prop_assert_eq!(copy, tree);
    }

    #[test]
    fn interpolation_is_bounded_by_its_samples(
        v1 in -1.0e3..1.0e3f64,
        v2 in -1.0e3..1.0e3f64,
        target in 1u64..1000,
    ) {
        let mut world = World::new(
            Value::from([("x", Value::from(v1))]),
            0,
            Duration::from_millis(10_000),
        );
        world.put(Value::from([("x", Value::from(v2))]), 1000);

        let estimate = world.interpolate(target, 1000);
        let x = estimate
            .select(&[Step::Key("x".into())])
            .and_then(Value::as_number)
            .unwrap();

        let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
        prop_assert!(x >= lo - 1.0e-9 && x <= hi + 1.0e-9, "x = {x} outside [{lo}, {hi}]");
    }

    #[test]
    fn changes_are_never_redelivered(
        timestamps in proptest::collection::btree_set(1u64..5000, 1..20),
        watermark_seed in 0u64..5000,
    ) {
        let mut world = World::new(Value::map(), 0, Duration::from_millis(1_000_000));
        for (index, timestamp) in timestamps.iter().enumerate() {
            world.put(Value::from([("n", Value::from(index as f64))]), *timestamp);
        }

        let now = 10_000;
        let first = world.changes_since(watermark_seed, now);
        if let Some(watermark) = first.keys().next_back().copied() {
            let second = world.changes_since(watermark, now);
            prop_assert!(second.is_empty(), "deltas at {:?} were redelivered", second.keys());
        }
    }
}
