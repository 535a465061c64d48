use crate::error::{FrameError, FrameResult};
use crate::frame::{DataFrame, FrameConfig};
use crate::index::IndexKey;
use crate::sequence::{Element, Sequence};
use crate::series::{Series, SeriesConfig};
use crate::value::{Row, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Rename case-insensitive repeats to `name.1`, `name.2`, … keeping first-seen order.
pub(crate) fn dedupe_column_names<N, S>(names: N) -> Vec<String>
where
    N: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in names {
        let name: String = name.into();
        match seen.get_mut(&name.to_lowercase()) {
            Some(repeats) => {
                *repeats += 1;
                let renamed = format!("{name}.{repeats}");
                log::warn!("duplicate column name '{name}' renamed to '{renamed}'");
                out.push(renamed);
            }
            None => {
                seen.insert(name.to_lowercase(), 0);
                out.push(name);
            }
        }
    }
    out
}

/// Field names of the first row, or of every row in first-seen order.
pub(crate) fn infer_column_names(rows: &Sequence<Row>, consider_all_rows: bool) -> Vec<String> {
    if !consider_all_rows {
        return rows
            .first()
            .map(|row| row.keys().map(String::from).collect())
            .unwrap_or_default();
    }
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for row in rows.iter() {
        for key in row.keys() {
            if seen.insert(key.to_string()) {
                names.push(key.to_string());
            }
        }
    }
    names
}

/// A named column of a data frame.
#[derive(Clone)]
pub struct Column<I> {
    pub name: String,
    /// Type name of the first non-null value, or `"null"` when there is none.
    pub type_name: &'static str,
    pub series: Series<I, Value>,
}

impl<I: IndexKey + fmt::Debug> fmt::Debug for Column<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("series", &self.series)
            .finish()
    }
}

impl<I: IndexKey> DataFrame<I> {
    /// Case-insensitive check against the column names.
    pub fn has_series(&self, name: &str) -> bool {
        self.column_names()
            .iter()
            .any(|column| column.to_lowercase() == name.to_lowercase())
    }

    /// Values of field `name`, indexed like the rows. Rows without the field are skipped, so an
    /// unknown column yields an empty series.
    pub fn get_series(&self, name: &str) -> Series<I, Value> {
        let name = name.to_string();
        let frame = self.clone();
        Series::lazy(move || {
            SeriesConfig::from_pairs(frame.pairs().flat_map(move |(index, row), _| {
                row.get(&name).cloned().map(|value| (index, value))
            }))
        })
    }

    /// Like [`get_series`](Self::get_series), failing when no column is named `name`.
    pub fn expect_series(&self, name: &str) -> FrameResult<Series<I, Value>> {
        if !self.column_names().iter().any(|column| column == name) {
            return Err(FrameError::column_not_found(name));
        }
        Ok(self.get_series(name))
    }

    pub fn get_columns(&self) -> Vec<Column<I>> {
        self.column_names()
            .iter()
            .map(|name| {
                let series = self.get_series(name);
                let type_name = series
                    .iter()
                    .find(|value| !value.is_null())
                    .map_or("null", |value| value.type_name());
                Column {
                    name: name.clone(),
                    type_name,
                    series,
                }
            })
            .collect()
    }

    /// Index the frame by the values of column `name`.
    pub fn set_index(&self, name: &str) -> FrameResult<DataFrame<Value>> {
        if !self.column_names().iter().any(|column| column == name) {
            return Err(FrameError::column_not_found(name));
        }
        let name = name.to_string();
        Ok(self.derive(move |frame| {
            FrameConfig::from_view(frame).with_index_from(move |row: &Row| row.value(&name))
        }))
    }

    pub fn with_index<J: IndexKey>(&self, index: impl Into<Sequence<J>>) -> DataFrame<J> {
        let index = index.into();
        self.derive(move |frame| FrameConfig::from_view(frame).with_index(index))
    }

    pub fn reset_index(&self) -> DataFrame<usize> {
        self.with_rows(|rows| rows.reset_index())
    }

    /// Remove the named fields from every row.
    pub fn drop_series(&self, names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        self.derive(move |frame| {
            let columns: Vec<String> = frame
                .column_names()
                .iter()
                .filter(|column| !names.contains(column))
                .cloned()
                .collect();
            let rows = frame.rows().map(move |mut row, _| {
                for name in &names {
                    row.remove(name);
                }
                row
            });
            FrameConfig::from_series(SeriesConfig::from_view(&rows)).with_exact_column_names(columns)
        })
    }

    /// Keep only the named fields, in the given order.
    pub fn subset(&self, names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        self.derive(move |frame| {
            let columns = names.clone();
            let rows = frame.rows().map(move |row, _| project_fields(&row, &names));
            FrameConfig::from_series(SeriesConfig::from_view(&rows)).with_exact_column_names(columns)
        })
    }

    /// Rename fields according to `(from, to)` pairs; unknown names are ignored.
    pub fn rename_series(&self, renames: &[(&str, &str)]) -> Self {
        let renames: Vec<(String, String)> = renames
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        self.derive(move |frame| {
            let rename = move |name: &str| {
                renames
                    .iter()
                    .find(|(from, _)| from == name)
                    .map_or_else(|| name.to_string(), |(_, to)| to.clone())
            };
            let columns: Vec<String> = frame.column_names().iter().map(|c| rename(c.as_str())).collect();
            let rows = frame.rows().map(move |row, _| {
                row.into_iter()
                    .map(|(name, value)| (rename(name.as_str()), value))
                    .collect::<Row>()
            });
            FrameConfig::from_series(SeriesConfig::from_view(&rows)).with_exact_column_names(columns)
        })
    }

    /// Move the named columns to the front, in the given order.
    pub fn reorder_series(&self, names: &[&str]) -> Self {
        let leading: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        self.derive(move |frame| {
            let mut columns = leading.clone();
            columns.extend(
                frame
                    .column_names()
                    .iter()
                    .filter(|column| !leading.contains(column))
                    .cloned(),
            );
            let order = columns.clone();
            let rows = frame.rows().map(move |row, _| {
                let mut reordered = project_fields(&row, &order);
                for (name, value) in row.iter() {
                    if !reordered.contains(name) {
                        reordered.set(name, value.clone());
                    }
                }
                reordered
            });
            FrameConfig::from_series(SeriesConfig::from_view(&rows)).with_exact_column_names(columns)
        })
    }

    /// Collapse every row into a single value.
    pub fn deflate<V, F>(&self, selector: F) -> Series<I, V>
    where
        V: Element,
        F: Fn(&Row) -> V + Send + Sync + 'static,
    {
        self.lazy_rows().map(move |row, _| selector(&row))
    }
}

impl<I: IndexKey + Eq + Hash> DataFrame<I> {
    /// Set column `name` from `series`, matching rows by index.
    ///
    /// Rows whose index has no entry in `series` lose the field. When `series` repeats an index the
    /// later value wins. On an empty frame the result is built from `series` alone.
    pub fn with_series(&self, name: &str, series: &Series<I, Value>) -> Self {
        let name = name.to_string();
        let series = series.clone();
        self.derive(move |frame| {
            if frame.is_empty() {
                let column = name.clone();
                let rows = series
                    .pairs()
                    .map(move |(index, value), _| (index, Row::new().with(column.clone(), value)));
                return FrameConfig::from_pairs(rows).with_exact_column_names(vec![name]);
            }

            let mut lookup: HashMap<I, Value> = HashMap::new();
            for (index, value) in series.iter_pairs() {
                lookup.insert(index, value);
            }
            let mut columns = frame.column_names().to_vec();
            if !columns.contains(&name) {
                columns.push(name.clone());
            }
            let rows = frame.pairs().map(move |(index, mut row), _| {
                match lookup.get(&index) {
                    Some(value) => row.set(name.clone(), value.clone()),
                    None => {
                        row.remove(&name);
                    }
                }
                (index, row)
            });
            FrameConfig::from_pairs(rows).with_exact_column_names(columns)
        })
    }
}

/// A new row holding `names` from `row`, in that order; missing fields stay absent.
fn project_fields(row: &Row, names: &[String]) -> Row {
    names
        .iter()
        .filter_map(|name| row.get(name).map(|value| (name.clone(), value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_get_numeric_suffixes() {
        let names = dedupe_column_names(["a", "b", "A", "a"]);
        assert_eq!(names, vec!["a", "b", "A.1", "a.2"]);
    }

    #[test]
    fn inference_can_union_all_rows() {
        let rows = Sequence::from_vec(vec![
            Row::from([("a", 1)]),
            Row::from([("b", 2), ("a", 3)]),
        ]);
        assert_eq!(infer_column_names(&rows, false), vec!["a"]);
        assert_eq!(infer_column_names(&rows, true), vec!["a", "b"]);
        assert!(infer_column_names(&Sequence::empty(), true).is_empty());
    }
}
