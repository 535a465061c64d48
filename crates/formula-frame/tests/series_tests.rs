use chrono::NaiveDate;
use formula_frame::{FrameError, Series, SeriesConfig, Value};
use pretty_assertions::assert_eq;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[test]
fn config_shapes_resolve_to_the_same_content() {
    let from_values = Series::from_config(SeriesConfig::from_values(vec![10, 20]));
    let from_pairs = Series::from_config(SeriesConfig::from_pairs(vec![(0usize, 10), (1, 20)]));
    let from_index = Series::from_config(SeriesConfig::from_index_values(vec![0usize, 1], vec![10, 20]));
    assert_eq!(from_values.to_pairs(), from_pairs.to_pairs());
    assert_eq!(from_pairs.to_pairs(), from_index.to_pairs());

    let derived = Series::from_config(SeriesConfig::from_values(vec![3, 4]).with_index_from(|v: &i32| v * 100));
    assert_eq!(derived.to_pairs(), vec![(300, 3), (400, 4)]);
}

#[test]
fn lazy_configuration_resolves_on_first_access() {
    let series: Series<usize, i32> = Series::lazy(|| SeriesConfig::from_values(vec![1, 2, 3]));
    assert_eq!(series.count(), 3);
    assert_eq!(series.at(&2), Some(3));
    assert_eq!(series.at(&7), None);
}

#[test]
fn head_and_tail_accept_negative_counts() {
    let series = Series::new(vec![1, 2, 3, 4, 5]);
    assert_eq!(series.head(2).to_vec(), vec![1, 2]);
    assert_eq!(series.head(-2).to_vec(), vec![1, 2, 3]);
    assert_eq!(series.tail(2).to_vec(), vec![4, 5]);
    assert_eq!(series.tail(-2).to_vec(), vec![3, 4, 5]);
    assert_eq!(series.tail(2).get_index().to_vec(), vec![3, 4]);
}

#[test]
fn while_and_until_stop_testing_after_the_first_switch() {
    let series = Series::new(vec![1, 2, 5, 1, 2]);
    assert_eq!(series.skip_while(|v| *v < 3).to_vec(), vec![5, 1, 2]);
    assert_eq!(series.take_while(|v| *v < 3).to_vec(), vec![1, 2]);
    assert_eq!(series.skip_until(|v| *v > 3).to_vec(), vec![5, 1, 2]);
    assert_eq!(series.take_until(|v| *v > 3).to_vec(), vec![1, 2]);
}

#[test]
fn map_keeps_index_and_reset_index_renumbers() {
    let series = Series::from_pairs(vec![("a", 1), ("b", 2)]);
    let mapped = series.map(|v, pos| v * 10 + pos as i32);
    assert_eq!(mapped.to_pairs(), vec![("a", 10), ("b", 21)]);
    assert_eq!(mapped.reset_index().to_pairs(), vec![(0, 10), (1, 21)]);
}

#[test]
fn windows_keep_original_indices() {
    let series = Series::from_pairs(vec![(10i32, 'a'), (20, 'b'), (30, 'c'), (40, 'd'), (50, 'e')]);
    let windows = series.window(2).unwrap();
    assert_eq!(windows.count(), 2);
    assert_eq!(windows.last().unwrap().to_pairs(), vec![(30, 'c'), (40, 'd')]);

    let rolling = series.rolling_window(3).unwrap();
    assert_eq!(rolling.count(), 3);
    assert_eq!(rolling.get_index().to_vec(), vec![0, 1, 2]);
    assert_eq!(rolling.at(&2).unwrap().to_vec(), vec!['c', 'd', 'e']);

    assert_eq!(
        series.window(0).unwrap_err(),
        FrameError::invalid_argument("window", "period", "must be greater than zero")
    );
}

#[test]
fn sequential_distinct_keeps_the_last_of_each_run() {
    let series = Series::new(vec![1, 1, 2, 2, 2, 1]);
    let collapsed = series.sequential_distinct();
    assert_eq!(collapsed.to_pairs(), vec![(1, 1), (4, 2), (5, 1)]);
}

#[test]
fn range_queries_follow_the_index_order() {
    let series = Series::from_pairs((1..=5).map(|d| (day(d), d as i32)));
    assert_eq!(series.start_at(day(3)).unwrap().to_vec(), vec![3, 4, 5]);
    assert_eq!(series.end_at(day(2)).unwrap().to_vec(), vec![1, 2]);
    assert_eq!(series.before(day(3)).unwrap().to_vec(), vec![1, 2]);
    assert_eq!(series.after(day(3)).unwrap().to_vec(), vec![4, 5]);
    assert_eq!(series.between(day(2), day(4)).unwrap().to_vec(), vec![2, 3, 4]);
}

#[test]
fn range_queries_reject_unordered_indices() {
    let series = Series::from_pairs(vec![(Value::from(true), 1), (Value::from(false), 2)]);
    assert_eq!(
        series.after(Value::from(true)).unwrap_err(),
        FrameError::unsupported_index_type("boolean")
    );
}

#[test]
fn zip_stops_at_the_shorter_series() {
    let left = Series::from_pairs(vec![("x", 1), ("y", 2), ("z", 3)]);
    let right = Series::new(vec![10, 20]);
    assert_eq!(left.zip(&right, |a, b| a + b).to_pairs(), vec![("x", 11), ("y", 22)]);

    let many = left.zip_many(&[left.clone(), left.clone()], |values| values.iter().sum::<i32>());
    assert_eq!(many.to_vec(), vec![3, 6, 9]);
}

#[test]
fn concat_insert_and_append() {
    let a = Series::new(vec![1, 2]);
    let b = Series::new(vec![3]);
    assert_eq!(a.concat(&[b]).to_pairs(), vec![(0, 1), (1, 2), (0, 3)]);
    assert_eq!(a.insert_pair((9, 0)).to_pairs(), vec![(9, 0), (0, 1), (1, 2)]);
    assert_eq!(a.append_pair((9, 3)).to_pairs(), vec![(0, 1), (1, 2), (9, 3)]);
}

#[test]
fn default_if_empty_substitutes_only_when_empty() {
    let fallback = Series::new(vec![42]);
    assert_eq!(Series::<usize, i32>::empty().default_if_empty(&fallback).to_vec(), vec![42]);
    assert_eq!(Series::new(vec![1]).default_if_empty(&fallback).to_vec(), vec![1]);
}

#[test]
fn predicates_and_folds() {
    let series = Series::new(vec![2, 4, 6]);
    assert!(series.all(|v| v % 2 == 0));
    assert!(series.any(|v| *v == 4));
    assert!(series.none(|v| *v > 10));
    assert!(!Series::<usize, i32>::empty().all(|_| true));
    assert_eq!(series.aggregate(1, |acc, v| acc * v), 48);
    assert_eq!(series.reduce(|a, b| a + b), Ok(12));
    assert_eq!(
        Series::<usize, i32>::empty().reduce(|a, b| a + b),
        Err(FrameError::empty_sequence("reduce"))
    );
}

#[test]
fn first_and_last_fail_on_empty_series() {
    let empty = Series::<usize, i32>::empty();
    assert_eq!(empty.first(), Err(FrameError::empty_sequence("first")));
    assert_eq!(empty.last(), Err(FrameError::empty_sequence("last")));
    assert_eq!(Series::new(vec![7, 8]).last_pair(), Ok((1, 8)));
}

#[test]
fn statistics_over_numbers() {
    let series = Series::new(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert_eq!(series.sum(), 40.0);
    assert_eq!(series.average(), Ok(5.0));
    assert_eq!(series.median(), Ok(4.5));
    assert_eq!(series.min(), Ok(2.0));
    assert_eq!(series.max(), Ok(9.0));
    assert_eq!(series.variance(), Ok(4.0));
    assert_eq!(series.std_dev(), Ok(2.0));
    assert!(matches!(
        Series::<usize, f64>::empty().average(),
        Err(FrameError::EmptySequence { .. })
    ));
}

#[test]
fn changes_are_indexed_by_the_window_end() {
    let series = Series::from_pairs(vec![("a", 10.0), ("b", 15.0), ("c", 12.0)]);
    assert_eq!(series.amount_change(2).unwrap().to_pairs(), vec![("b", 5.0), ("c", -3.0)]);
    assert_eq!(series.amount_change(3).unwrap().to_pairs(), vec![("c", 2.0)]);
    assert_eq!(series.proportion_change(2).unwrap().to_pairs()[0], ("b", 0.5));
}

#[test]
fn fill_gaps_inserts_generated_pairs() {
    let series = Series::from_pairs(vec![(1i32, 1.0), (4, 4.0)]);
    let filled = series.fill_gaps(
        |a, b| b.0 - a.0 > 1,
        |a, b| ((a.0 + 1)..b.0).map(|i| (i, 0.0)).collect::<Vec<_>>(),
    );
    assert_eq!(filled.get_index().to_vec(), vec![1, 2, 3, 4]);
    assert_eq!(filled.to_vec(), vec![1.0, 0.0, 0.0, 4.0]);
}

#[test]
fn frequency_counts_in_first_seen_order() {
    let series = Series::new(vec!["b", "a", "b", "b"]);
    let frequencies = series.frequency().to_vec();
    assert_eq!(frequencies.len(), 2);
    assert_eq!((frequencies[0].value, frequencies[0].count), ("b", 3));
    assert_eq!(frequencies[1].proportion, 0.25);
}
