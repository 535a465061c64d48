use formula_frame::{DataFrame, Row, Sequence, Series, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn composed_views_do_no_work_until_observed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let series = Series::new(vec![1, 2, 3, 4]);
    let doubled = series.map(move |value, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        value * 2
    });
    let filtered = doubled.filter(|value| *value > 2);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(filtered.to_vec(), vec![4, 6, 8]);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn baking_evaluates_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let baked = Series::new(vec![1, 2, 3])
        .map(move |value, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            value + 1
        })
        .bake();
    assert!(baked.is_baked());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    assert_eq!(baked.to_vec(), vec![2, 3, 4]);
    assert_eq!(baked.to_vec(), vec![2, 3, 4]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn bake_of_baked_view_is_the_same_instance() {
    let series = Series::new(vec![1, 2]).map(|value, _| value * 10);
    let once = series.bake();
    let twice = once.bake();
    assert!(once.ptr_eq(&twice));
    assert_eq!(twice.to_pairs(), vec![(0, 10), (1, 20)]);

    let frame = DataFrame::new(vec![Row::from([("a", 1)])]).filter(|_| true);
    let once = frame.bake();
    assert!(once.ptr_eq(&once.bake()));
}

#[test]
fn sequences_can_be_walked_concurrently() {
    let sequence = Sequence::range(0, 5).map(|value, _| value * value);
    let mut first = sequence.iter();
    let mut second = sequence.iter();
    assert_eq!(first.next(), Some(0));
    assert_eq!(first.next(), Some(1));
    assert_eq!(second.next(), Some(0));
    assert_eq!(first.next(), Some(4));
    assert_eq!(second.next(), Some(1));
}

#[test]
fn generated_sequences_restart_from_scratch() {
    let sequence = Sequence::from_fn(|| (1..=3).map(Value::from));
    assert_eq!(sequence.count(), 3);
    assert_eq!(
        sequence.to_vec(),
        vec![Value::from(1), Value::from(2), Value::from(3)]
    );
    assert!(!sequence.is_materialized());
    assert!(sequence.materialize().is_materialized());
}

#[test]
fn window_helpers_chunk_sequences() {
    let sequence = Sequence::range(1, 5);
    assert_eq!(
        sequence.window(2).unwrap().to_vec(),
        vec![vec![1, 2], vec![3, 4]]
    );
    assert_eq!(
        sequence.rolling_window(4).unwrap().to_vec(),
        vec![vec![1, 2, 3, 4], vec![2, 3, 4, 5]]
    );
    assert_eq!(
        Sequence::from_vec(vec![1, 2, 4, 5, 7])
            .variable_window(|a, b| b - a == 1)
            .to_vec(),
        vec![vec![1, 2], vec![4, 5], vec![7]]
    );
}

proptest! {
    #[test]
    fn traversals_are_independent(values in proptest::collection::vec(-50i32..50, 0..40), threshold in -50i32..50) {
        let source = Series::new(values.clone());
        let view = source.map(|value, _| value * 3).filter(move |value| *value > threshold);

        let expected: Vec<i32> = values.iter().map(|v| v * 3).filter(|v| *v > threshold).collect();
        prop_assert_eq!(view.to_vec(), expected.clone());
        prop_assert_eq!(view.to_vec(), expected);
        prop_assert_eq!(source.to_vec(), values);
    }

    #[test]
    fn skip_and_take_partition_the_sequence(values in proptest::collection::vec(0u32..100, 0..30), split in 0usize..35) {
        let series = Series::new(values.clone());
        let mut joined = series.take(split).to_vec();
        joined.extend(series.skip(split).to_vec());
        prop_assert_eq!(joined, values);
    }
}
