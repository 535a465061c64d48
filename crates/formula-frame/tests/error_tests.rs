use formula_frame::{
    DataFrame, FrameError, Index, IndexOrder, IndexType, PivotValues, Row, Sequence, Series,
    SeriesConfig, Value,
};
use pretty_assertions::assert_eq;

#[test]
fn argument_errors_name_operator_and_parameter() {
    let err = Series::new(vec![1, 2, 3]).rolling_window(0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rolling_window: invalid argument 'period': must be greater than zero"
    );
    let err = Series::new(vec![1.0]).percent_change(0).unwrap_err();
    assert!(matches!(
        err,
        FrameError::InvalidArgument {
            operation: "percent_change",
            parameter: "period",
            ..
        }
    ));
}

#[test]
fn validation_happens_at_the_call_not_during_iteration() {
    let lazy: Series<Value, i32> =
        Series::lazy(|| SeriesConfig::from_pairs(vec![(Value::from(false), 1)]));
    assert!(lazy.before(Value::from(true)).is_err());
}

#[test]
fn unsupported_index_types_have_no_ordering() {
    assert_eq!(
        IndexOrder::new(IndexType::Unsupported("boolean")).unwrap_err(),
        FrameError::unsupported_index_type("boolean")
    );
    let index = Index::new(Sequence::from_vec(vec![Value::Null, Value::from(true)]));
    assert_eq!(index.index_type(), &IndexType::Unsupported("boolean"));
    assert!(index.less_than(&Value::from(false), &Value::from(true)).is_err());

    let numbers = Index::new(Sequence::from_vec(vec![Value::Null, Value::from(2)]));
    assert_eq!(numbers.index_type(), &IndexType::Number);
    assert_eq!(numbers.less_than(&Value::from(1), &Value::from(2)), Ok(true));
}

#[test]
fn merging_frames_with_a_boolean_index_is_rejected() {
    let flags = DataFrame::from_pairs(vec![
        (Value::from(true), Row::from([("a", 1)])),
        (Value::from(false), Row::from([("a", 2)])),
    ]);
    let empty = DataFrame::<Value>::empty();
    assert_eq!(
        DataFrame::merge_all(vec![empty.clone(), flags.clone()]).unwrap_err(),
        FrameError::unsupported_index_type("boolean")
    );
    assert!(flags.merge(&[]).is_err());

    let numbers = DataFrame::from_pairs(vec![
        (Value::from(2), Row::from([("a", 1)])),
        (Value::from(1), Row::from([("a", 2)])),
    ]);
    let merged = empty.merge(&[numbers]).unwrap();
    assert_eq!(merged.get_index().to_vec(), vec![Value::from(1), Value::from(2)]);
}

#[test]
fn empty_views_fail_on_first_and_last() {
    let frame = DataFrame::<usize>::empty();
    assert_eq!(frame.first().unwrap_err().to_string(), "first: sequence contains no elements");
    assert_eq!(frame.last(), Err(FrameError::empty_sequence("last")));
    assert!(Series::<usize, f64>::empty().max().is_err());
}

#[test]
fn missing_columns_are_reported_by_name() {
    let frame = DataFrame::new(vec![Row::from([("a", 1)])]);
    assert_eq!(
        frame.set_index("b").unwrap_err().to_string(),
        "column not found: b"
    );
    let values = PivotValues::new().column("missing", |s| Value::from(s.count()));
    assert_eq!(
        frame.summarize(&values).unwrap_err(),
        FrameError::column_not_found("missing")
    );
    assert!(matches!(
        frame.pivot(&["a"], &PivotValues::new()),
        Err(FrameError::InvalidArgument { parameter: "values", .. })
    ));
}
