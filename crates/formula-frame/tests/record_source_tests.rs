use formula_frame::{
    DataFrame, FrameError, FrameResult, FusedRecordSource, IterRecordSource, RecordSource, Row,
    Value,
};
use pretty_assertions::assert_eq;

/// Yields `rows`, then fails on every later read with a message naming the attempt.
struct Failing {
    rows: Vec<Row>,
    attempts: usize,
}

impl RecordSource for Failing {
    fn column_names(&mut self) -> FrameResult<Vec<String>> {
        Ok(vec!["n".to_string()])
    }

    fn read(&mut self) -> FrameResult<Option<Row>> {
        if !self.rows.is_empty() {
            return Ok(Some(self.rows.remove(0)));
        }
        self.attempts += 1;
        Err(FrameError::record_source(format!("attempt {}", self.attempts)))
    }
}

#[test]
fn drains_an_iterator_source_with_explicit_names() {
    let source = IterRecordSource::new((1..=3).map(|n| Ok(Row::from([("n", n)]))))
        .with_column_names(["n", "extra"]);
    let frame = DataFrame::from_record_source(source).unwrap();
    assert_eq!(frame.column_names(), ["n", "extra"]);
    assert_eq!(frame.count(), 3);
    assert!(frame.is_baked());
    assert_eq!(frame.to_rows()[2], vec![Value::from(3), Value::Null]);
}

#[test]
fn drained_iterator_source_keeps_names_from_the_first_record() {
    let source = IterRecordSource::new(vec![
        Ok(Row::from([("x", 1), ("y", 2)])),
        Ok(Row::from([("x", 3), ("y", 4)])),
    ]);
    let frame = DataFrame::from_record_source(source).unwrap();
    assert_eq!(frame.count(), 2);
    assert_eq!(frame.column_names(), ["x", "y"]);
    assert_eq!(
        frame.to_rows(),
        vec![
            vec![Value::from(1), Value::from(2)],
            vec![Value::from(3), Value::from(4)],
        ]
    );
}

#[test]
fn column_names_are_stable_after_reading() {
    let mut source = IterRecordSource::new(vec![
        Ok(Row::from([("a", 1)])),
        Ok(Row::from([("a", 2), ("b", 3)])),
    ]);
    assert!(source.read().unwrap().is_some());
    assert!(source.read().unwrap().is_some());
    assert_eq!(source.read(), Ok(None));
    assert_eq!(source.column_names().unwrap(), vec!["a"]);
    assert_eq!(source.column_names().unwrap(), vec!["a"]);
}

#[test]
fn empty_source_yields_an_empty_frame() {
    let source = IterRecordSource::new(Vec::<FrameResult<Row>>::new());
    let frame = DataFrame::from_record_source(source).unwrap();
    assert!(frame.is_empty());
    assert!(frame.column_names().is_empty());
}

#[test]
fn first_error_is_propagated_and_never_replaced() {
    let mut fused = FusedRecordSource::new(Failing {
        rows: vec![Row::from([("n", 1)])],
        attempts: 0,
    });
    assert_eq!(fused.read(), Ok(Some(Row::from([("n", 1)]))));
    let err = fused.read().unwrap_err();
    assert_eq!(err, FrameError::record_source("attempt 1"));
    assert_eq!(fused.read(), Err(err.clone()));
    assert_eq!(fused.read(), Err(err));
    assert_eq!(fused.into_inner().attempts, 1);
}

#[test]
fn from_record_source_stops_at_the_failure() {
    let result = DataFrame::from_record_source(Failing {
        rows: vec![Row::from([("n", 1)]), Row::from([("n", 2)])],
        attempts: 0,
    });
    assert_eq!(result.unwrap_err(), FrameError::record_source("attempt 1"));
}

#[test]
fn exhausted_sources_keep_reporting_end_of_data() {
    let mut fused = FusedRecordSource::new(IterRecordSource::new(vec![Ok(Row::from([("a", 1)]))]));
    assert!(fused.read().unwrap().is_some());
    assert_eq!(fused.read(), Ok(None));
    assert_eq!(fused.read(), Ok(None));
}

#[test]
fn boxed_sources_are_sources() {
    let boxed: Box<dyn RecordSource> = Box::new(IterRecordSource::new(vec![
        Ok(Row::from([("a", 1)])),
        Err(FrameError::record_source("truncated file")),
    ]));
    assert_eq!(
        DataFrame::from_record_source(boxed).unwrap_err(),
        FrameError::record_source("truncated file")
    );
}
