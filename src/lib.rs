//! # runtex: Experiment Reports to LaTeX
//!
//! runtex turns experiment-tracking reports into LaTeX documents and logs
//! diagnostic plots for fitted classifiers.
//!
//! ## Pipelines
//!
//! - **Report export**: runs are flattened into Arrow run tables, markdown
//!   panels are converted to LaTeX, chart images are attached per section,
//!   and everything is wrapped in a fixed preamble and bibliography.
//! - **Model watching**: predictions on held-out data become ROC,
//!   confusion-matrix and feature-importance plot artifacts, emitted to a
//!   run logger under `"roc"`, `"confusion_matrix"` and
//!   `"feature_importances"`.
//!
//! Both are synchronous call-and-return functions with no state kept
//! between calls.
//!
//! ## Example Usage
//!
//! ```rust
//! use runtex::experiment::{Panel, ReportSnapshot, Run, Section};
//! use runtex::report_to_latex;
//!
//! let mut report = ReportSnapshot::new("alice", "Curriculum Learning");
//! report.add_section(
//!     Section::new("Results", vec![Panel::markdown("Accuracy **improved**.")]),
//!     vec![Run::builder("run-001").config("lr", 0.01).summary("acc", 0.93).build()],
//! );
//!
//! let latex = report_to_latex(&report, None, false)?;
//! assert!(latex.contains("\\title{Curriculum Learning}"));
//! assert!(latex.contains("\\textbf{improved}"));
//! # Ok::<(), runtex::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod charts;
pub mod error;
pub mod experiment;
pub mod export;
pub mod latex;
pub mod table;
pub mod watch;

pub use error::{Error, Result};
pub use export::{report_to_latex, ReportExporter, ReportExporterBuilder};
pub use latex::section_to_latex;
pub use table::{runs_table_to_latex, runs_to_table, RunTable};
pub use watch::watch;
