//! LaTeX `longtable` rendering of a record batch
//!
//! Layout (one leading row-index column, booktabs rules, a repeated head
//! and a "continued" foot so the table can span pages):
//!
//! ```text
//! \begin{longtable}{llr}
//! \toprule
//! {} & name & acc \\
//! \midrule
//! \endfirsthead
//! ...
//! \bottomrule
//! \endlastfoot
//! 0 & run-a & 0.900000 \\
//! \end{longtable}
//! ```

use std::fmt::Write;

use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::latex::escape;

const MISSING: &str = "NaN";

pub(super) fn render(batch: &RecordBatch) -> String {
    let schema = batch.schema_ref();
    let width = schema.fields().len() + 1;

    let alignment: String = std::iter::once('l')
        .chain(schema.fields().iter().map(|field| {
            if is_numeric(field.data_type()) {
                'r'
            } else {
                'l'
            }
        }))
        .collect();

    let header = std::iter::once("{}".to_string())
        .chain(schema.fields().iter().map(|field| escape(field.name())))
        .collect::<Vec<_>>()
        .join(" & ");

    let mut out = String::new();
    let _ = writeln!(out, "\\begin{{longtable}}{{{alignment}}}");
    let _ = writeln!(out, "\\toprule\n{header} \\\\\n\\midrule\n\\endfirsthead\n");
    let _ = writeln!(out, "\\toprule\n{header} \\\\\n\\midrule\n\\endhead");
    let _ = writeln!(
        out,
        "\\midrule\n\\multicolumn{{{width}}}{{r}}{{{{Continued on next page}}}} \\\\\n\\midrule\n\\endfoot\n"
    );
    let _ = writeln!(out, "\\bottomrule\n\\endlastfoot");

    for row in 0..batch.num_rows() {
        let cells = std::iter::once(row.to_string())
            .chain(batch.columns().iter().map(|column| cell(column.as_ref(), row)))
            .collect::<Vec<_>>()
            .join(" & ");
        let _ = writeln!(out, "{cells} \\\\");
    }

    out.push_str("\\end{longtable}\n");
    out
}

const fn is_numeric(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Int64 | DataType::Float64)
}

fn cell(column: &dyn Array, row: usize) -> String {
    if column.is_null(row) {
        return MISSING.to_string();
    }

    let any = column.as_any();
    if let Some(values) = any.downcast_ref::<Int64Array>() {
        values.value(row).to_string()
    } else if let Some(values) = any.downcast_ref::<Float64Array>() {
        format!("{:.6}", values.value(row))
    } else if let Some(values) = any.downcast_ref::<BooleanArray>() {
        let text = if values.value(row) { "True" } else { "False" };
        text.to_string()
    } else if let Some(values) = any.downcast_ref::<StringArray>() {
        escape(values.value(row))
    } else {
        MISSING.to_string()
    }
}
