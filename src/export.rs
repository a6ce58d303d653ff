//! Report to LaTeX document assembly
//!
//! ```text
//! header(author, title)
//!   -> [download charts | discover charts]
//!   -> for each section i: section_to_latex(section, charts[i]) + runs_table_to_latex(runs(section))
//!   -> footer
//! ```
//!
//! Assembly is append-only. Any failure aborts the export and the partial
//! document is dropped.
//!
//! ## Example
//!
//! ```rust,no_run
//! use runtex::experiment::ReportSnapshot;
//! use runtex::export::ReportExporter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = ReportSnapshot::from_json(&std::fs::read_to_string("report.json")?)?;
//! let latex = ReportExporter::builder()
//!     .columns(["name", "learning_rate", "accuracy"])
//!     .charts_dir("build/charts")
//!     .build()
//!     .export(&report)?;
//! std::fs::write("report.tex", latex)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::charts::{ChartIndex, DEFAULT_CHARTS_DIR};
use crate::experiment::ReportSource;
use crate::latex::{self, CmarkLatex, MarkupConverter};
use crate::table::runs_table_to_latex;
use crate::Result;

/// Report exporter configured through [`ReportExporterBuilder`].
pub struct ReportExporter {
    columns: Option<Vec<String>>,
    download_charts: bool,
    charts_dir: PathBuf,
    converter: Box<dyn MarkupConverter>,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ReportExporter {
    /// Create a new exporter builder
    #[must_use]
    pub fn builder() -> ReportExporterBuilder {
        ReportExporterBuilder::default()
    }

    /// Directory chart images are read from (and downloaded into).
    #[must_use]
    pub fn charts_dir(&self) -> &Path {
        &self.charts_dir
    }

    /// Export a report to a complete LaTeX document.
    ///
    /// # Errors
    ///
    /// Returns the first error from chart download/discovery, run
    /// enumeration, markdown conversion or table building.
    pub fn export(&self, report: &dyn ReportSource) -> Result<String> {
        let mut document = latex::header(report.entity(), report.name());

        let sections = report.sections();
        let charts = if self.download_charts {
            report.download_charts(&self.charts_dir)?
        } else {
            ChartIndex::discover(&self.charts_dir, sections.len())?
        };
        tracing::debug!(charts = charts.len(), "chart index ready");

        for (index, section) in sections.iter().enumerate() {
            document.push_str(&latex::section_to_latex(
                section,
                charts.charts(index),
                &*self.converter,
            )?);

            let runs = report.runs(index)?;
            document.push_str(&runs_table_to_latex(&runs, self.columns.as_deref())?);
            tracing::debug!(index, section = section.name(), runs = runs.len(), "section rendered");
        }

        document.push_str(latex::FOOTER);
        tracing::info!(
            report = report.name(),
            sections = sections.len(),
            bytes = document.len(),
            "report exported"
        );
        Ok(document)
    }
}

/// Builder for [`ReportExporter`]
pub struct ReportExporterBuilder {
    columns: Option<Vec<String>>,
    download_charts: bool,
    charts_dir: PathBuf,
    converter: Box<dyn MarkupConverter>,
}

impl Default for ReportExporterBuilder {
    fn default() -> Self {
        Self {
            columns: None,
            download_charts: true,
            charts_dir: PathBuf::from(DEFAULT_CHARTS_DIR),
            converter: Box::new(CmarkLatex),
        }
    }
}

impl ReportExporterBuilder {
    /// Restrict run tables to these columns, in this order
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Download chart images before rendering (default: true)
    #[must_use]
    pub const fn download_charts(mut self, download: bool) -> Self {
        self.download_charts = download;
        self
    }

    /// Directory for chart images (default: `charts`)
    #[must_use]
    pub fn charts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.charts_dir = dir.into();
        self
    }

    /// Markdown converter (default: [`CmarkLatex`])
    #[must_use]
    pub fn converter(mut self, converter: impl MarkupConverter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    /// Build the exporter
    #[must_use]
    pub fn build(self) -> ReportExporter {
        ReportExporter {
            columns: self.columns,
            download_charts: self.download_charts,
            charts_dir: self.charts_dir,
            converter: self.converter,
        }
    }
}

/// Export a report with the default converter and `charts/` directory.
///
/// # Errors
///
/// See [`ReportExporter::export`].
pub fn report_to_latex(
    report: &dyn ReportSource,
    columns: Option<&[String]>,
    download_charts: bool,
) -> Result<String> {
    let mut builder = ReportExporter::builder().download_charts(download_charts);
    if let Some(columns) = columns {
        builder = builder.columns(columns.iter().cloned());
    }
    builder.build().export(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{ChartImage, Panel, ReportSnapshot, Run, Section};
    use crate::Error;

    struct Shouting;

    impl MarkupConverter for Shouting {
        fn convert(&self, markdown: &str) -> Result<String> {
            Ok(markdown.to_uppercase())
        }
    }

    struct Failing;

    impl MarkupConverter for Failing {
        fn convert(&self, _markdown: &str) -> Result<String> {
            Err(Error::Conversion("boom".to_string()))
        }
    }

    fn report() -> ReportSnapshot {
        let mut report = ReportSnapshot::new("alice", "Study");
        report.add_section(
            Section::new("Intro", vec![Panel::markdown("hello")]),
            vec![Run::builder("run-1").summary("acc", 0.5).build()],
        );
        report.add_chart(0, ChartImage::new("acc.png", vec![0]));
        report
    }

    #[test]
    fn test_builder_defaults() {
        let exporter = ReportExporter::default();
        assert_eq!(exporter.charts_dir(), Path::new("charts"));
        assert!(exporter.download_charts);
        assert!(exporter.columns.is_none());
    }

    #[test]
    fn test_export_uses_configured_converter() {
        let dir = tempfile::tempdir().unwrap();
        let latex = ReportExporter::builder()
            .charts_dir(dir.path())
            .converter(Shouting)
            .build()
            .export(&report())
            .unwrap();
        assert!(latex.contains("HELLO"));
        assert!(latex.contains("section_0_acc.png"));
        assert!(latex.contains("\\begin{longtable}"));
    }

    #[test]
    fn test_conversion_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReportExporter::builder()
            .charts_dir(dir.path())
            .converter(Failing)
            .build()
            .export(&report());
        assert!(matches!(result, Err(Error::Conversion(_))));
    }
}
