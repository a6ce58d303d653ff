//! Run tables (Arrow)
//!
//! Flattens a run collection into one Arrow `RecordBatch`:
//!
//! ```text
//! name | <config columns...> | <summary columns...>
//! ```
//!
//! - One row per run, in input order (no reordering, no dedup)
//! - Column union across runs; a run missing a key gets a null cell
//! - Config keys starting with `_` are dropped; summary media references too
//! - Config and summary columns are built independently, so a key present
//!   in both shows up twice
//!
//! Cell types are inferred per column, nothing is validated: all-integer
//! columns become `Int64`, all-numeric `Float64`, all-boolean `Boolean`,
//! anything else `Utf8`.

mod longtable;

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{
    new_null_array, Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::{Map, Value};

use crate::experiment::Run;
use crate::Result;

/// Name of the always-first run name column.
pub const NAME_COLUMN: &str = "name";

/// Tabular flattening of a run collection.
#[derive(Debug, Clone)]
pub struct RunTable {
    batch: RecordBatch,
}

impl RunTable {
    /// Flatten runs into a table.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingAttribute` if a run has no summary.
    pub fn from_runs(runs: &[Run]) -> Result<Self> {
        let mut names = Vec::with_capacity(runs.len());
        let mut configs = Vec::with_capacity(runs.len());
        let mut summaries = Vec::with_capacity(runs.len());
        for run in runs {
            summaries.push(run.summary()?.json_dict());
            configs.push(run.public_config());
            names.push(run.name());
        }

        let mut fields = vec![Field::new(NAME_COLUMN, DataType::Utf8, false)];
        let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(names))];
        for records in [&configs, &summaries] {
            for key in column_union(records) {
                let column = infer_column(records.iter().map(|record| record.get(&key)));
                fields.push(Field::new(key, column.data_type().clone(), true));
                columns.push(column);
            }
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        tracing::debug!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "run table built"
        );
        Ok(Self { batch })
    }

    /// Number of rows (runs).
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns, `name` included.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in table order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect()
    }

    /// First column with the given name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.position(name).map(|index| self.batch.column(index))
    }

    /// Underlying Arrow batch.
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Restrict and reorder the table to exactly `columns`.
    ///
    /// A name not present in the table becomes an all-null text column;
    /// a name present more than once resolves to its first occurrence.
    ///
    /// # Errors
    ///
    /// Returns error if the Arrow batch cannot be assembled.
    pub fn select(&self, columns: &[String]) -> Result<Self> {
        let schema = self.batch.schema_ref();
        let mut fields = Vec::with_capacity(columns.len());
        let mut arrays = Vec::with_capacity(columns.len());

        for name in columns {
            if let Some(index) = self.position(name) {
                fields.push(schema.field(index).clone());
                arrays.push(Arc::clone(self.batch.column(index)));
            } else {
                fields.push(Field::new(name, DataType::Utf8, true));
                arrays.push(new_null_array(&DataType::Utf8, self.num_rows()));
            }
        }

        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows()));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(Self { batch })
    }

    /// Render as a LaTeX `longtable`.
    #[must_use]
    pub fn to_latex(&self) -> String {
        longtable::render(&self.batch)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .position(|field| field.name() == name)
    }
}

/// Flatten runs into a [`RunTable`].
///
/// # Errors
///
/// Returns `Error::MissingAttribute` if a run has no summary.
pub fn runs_to_table(runs: &[Run]) -> Result<RunTable> {
    RunTable::from_runs(runs)
}

/// Render the runs of a section as a LaTeX `longtable`.
///
/// Returns an empty string when there are no runs. With a non-empty
/// `columns` list the table is restricted to exactly those columns.
///
/// # Errors
///
/// Returns error if a run has no summary.
pub fn runs_table_to_latex(runs: &[Run], columns: Option<&[String]>) -> Result<String> {
    let table = RunTable::from_runs(runs)?;
    if table.num_rows() == 0 {
        return Ok(String::new());
    }

    let table = match columns {
        Some(columns) if !columns.is_empty() => table.select(columns)?,
        _ => table,
    };
    Ok(table.to_latex())
}

/// Keys across all records, in order of first appearance.
fn column_union(records: &[Map<String, Value>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

fn infer_column<'a>(cells: impl Iterator<Item = Option<&'a Value>>) -> ArrayRef {
    // JSON null is a missing cell
    let cells: Vec<Option<&Value>> = cells.map(|cell| cell.filter(|v| !v.is_null())).collect();
    let present = || cells.iter().flatten();

    if present().next().is_none() {
        return new_null_array(&DataType::Utf8, cells.len());
    }
    if present().all(|v| v.is_i64()) {
        let values: Int64Array = cells.iter().map(|c| c.and_then(Value::as_i64)).collect();
        return Arc::new(values);
    }
    if present().all(|v| v.is_number()) {
        let values: Float64Array = cells.iter().map(|c| c.and_then(Value::as_f64)).collect();
        return Arc::new(values);
    }
    if present().all(|v| v.is_boolean()) {
        let values: BooleanArray = cells.iter().map(|c| c.and_then(Value::as_bool)).collect();
        return Arc::new(values);
    }

    let values: StringArray = cells
        .iter()
        .map(|c| {
            c.map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .collect();
    Arc::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn runs() -> Vec<Run> {
        vec![
            Run::builder("run-a")
                .config("lr", 0.1)
                .config("_wandb", json!({"x": 1}))
                .summary("acc", 0.9)
                .build(),
            Run::builder("run-b")
                .config("lr", 0.01)
                .config("layers", 3)
                .summary("acc", 0.95)
                .summary("loss", 0.2)
                .build(),
        ]
    }

    #[test]
    fn test_columns_name_config_summary() {
        let table = RunTable::from_runs(&runs()).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names(), vec!["name", "lr", "layers", "acc", "loss"]);
    }

    #[test]
    fn test_missing_keys_are_null() {
        let table = RunTable::from_runs(&runs()).unwrap();
        let layers = table.column("layers").unwrap();
        assert_eq!(layers.data_type(), &DataType::Int64);
        assert!(layers.is_null(0));
        assert!(!layers.is_null(1));
    }

    #[test]
    fn test_mixed_types_become_text() {
        let runs = vec![
            Run::builder("a").summary("best", 1).build(),
            Run::builder("b").summary("best", "n/a").build(),
        ];
        let table = RunTable::from_runs(&runs).unwrap();
        let best = table.column("best").unwrap();
        let best = best.as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(best.value(0), "1");
        assert_eq!(best.value(1), "n/a");
    }

    #[test]
    fn test_key_in_config_and_summary_appears_twice() {
        let runs = vec![Run::builder("a").config("epochs", 10).summary("epochs", 9).build()];
        let table = RunTable::from_runs(&runs).unwrap();
        assert_eq!(table.column_names(), vec!["name", "epochs", "epochs"]);
    }

    #[test]
    fn test_select_reorders_and_fills() {
        let table = RunTable::from_runs(&runs()).unwrap();
        let columns = vec!["acc".to_string(), "name".to_string(), "missing".to_string()];
        let selected = table.select(&columns).unwrap();
        assert_eq!(selected.column_names(), vec!["acc", "name", "missing"]);
        assert_eq!(selected.num_rows(), 2);
        assert_eq!(selected.column("missing").unwrap().null_count(), 2);
    }

    #[test]
    fn test_empty_runs() {
        let table = RunTable::from_runs(&[]).unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.column_names(), vec!["name"]);
        assert_eq!(runs_table_to_latex(&[], None).unwrap(), "");
    }

    #[test]
    fn test_run_without_summary_fails() {
        let runs = vec![Run::builder("a").without_summary().build()];
        assert!(RunTable::from_runs(&runs).is_err());
    }
}
