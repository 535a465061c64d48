//! Serializable point-in-time copies of a [`DataFrame`].

use crate::frame::{DataFrame, FrameConfig};
use crate::index::IndexKey;
use crate::value::Row;
use serde::{Deserialize, Serialize};

/// Column names, index and rows of a fully evaluated frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot<I> {
    pub column_names: Vec<String>,
    pub index: Vec<I>,
    pub values: Vec<Row>,
}

impl<I: IndexKey> DataFrame<I> {
    /// Evaluate the frame and copy out everything needed to rebuild it.
    pub fn to_snapshot(&self) -> FrameSnapshot<I> {
        let (index, values): (Vec<I>, Vec<Row>) = self.iter_pairs().unzip();
        FrameSnapshot {
            column_names: self.column_names().to_vec(),
            index,
            values,
        }
    }

    /// Memory-resident frame rebuilt from a snapshot.
    pub fn from_snapshot(snapshot: FrameSnapshot<I>) -> Self {
        log::debug!(
            "restoring frame with {} rows from snapshot",
            snapshot.values.len()
        );
        DataFrame::from_config(
            FrameConfig::from_index_rows(snapshot.index, snapshot.values)
                .with_column_names(snapshot.column_names)
                .baked(true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn snapshot_preserves_index_and_column_order() {
        let frame = DataFrame::from_pairs(vec![
            (10, Row::from([("b", 1), ("a", 2)])),
            (20, Row::from([("a", 3)])),
        ]);
        let snapshot = frame.to_snapshot();
        assert_eq!(snapshot.column_names, vec!["b", "a"]);
        assert_eq!(snapshot.index, vec![10, 20]);

        let restored = DataFrame::from_snapshot(snapshot);
        assert!(restored.is_baked());
        assert_eq!(restored.at(&20), Some(Row::from([("a", Value::from(3))])));
    }
}
