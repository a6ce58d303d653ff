//! Experiment-tracking object model consumed by the exporter
//!
//! ## Schema Overview
//!
//! ```text
//! Report (ReportSource) ──< Section ──< Panel (Markdown | Other)
//!                              │
//!                              └──< Run { name, config, summary }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use runtex::experiment::{Panel, ReportSnapshot, ReportSource, Run, Section};
//!
//! let mut report = ReportSnapshot::new("alice", "Curriculum Learning");
//! let run = Run::builder("run-001")
//!     .config("learning_rate", 0.01)
//!     .summary("accuracy", 0.93)
//!     .build();
//! report.add_section(Section::new("Results", vec![Panel::markdown("# Results")]), vec![run]);
//!
//! assert_eq!(report.sections().len(), 1);
//! ```

mod report;
mod run;
mod section;

pub use report::{ChartImage, ReportSnapshot, ReportSource};
pub use run::{Run, RunBuilder, RunSummary, RESERVED_PREFIX};
pub use section::{Panel, Section, MARKDOWN_PANEL};
