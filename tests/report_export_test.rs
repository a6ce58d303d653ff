//! Report export tests
//!
//! End-to-end assembly of report snapshots into LaTeX documents.

use std::fs;
use std::path::Path;

use runtex::charts::ChartIndex;
use runtex::experiment::{ChartImage, Panel, ReportSnapshot, ReportSource, Run, Section};
use runtex::latex::{self, CmarkLatex, FOOTER};
use runtex::{report_to_latex, runs_table_to_latex, section_to_latex, Error, ReportExporter};

// =============================================================================
// Fixtures
// =============================================================================

fn study() -> ReportSnapshot {
    let mut report = ReportSnapshot::new("Alice", "Study");
    report.add_section(
        Section::new(
            "Setup",
            vec![
                Panel::markdown("# Setup\nWe sweep the *learning rate*."),
                Panel::other("Parallel Coordinates Plot"),
            ],
        ),
        vec![
            Run::builder("sweep-1").config("lr", 0.1).summary("acc", 0.81).build(),
            Run::builder("sweep-2").config("lr", 0.01).summary("acc", 0.92).build(),
        ],
    );
    report.add_section(
        Section::new("Findings", vec![Panel::markdown("Lower is **better**.")]),
        vec![],
    );
    report.add_chart(0, ChartImage::new("lr.png", vec![137, 80, 78, 71]));
    report
}

fn export(report: &ReportSnapshot, charts_dir: &Path) -> String {
    ReportExporter::builder()
        .charts_dir(charts_dir)
        .build()
        .export(report)
        .unwrap()
}

/// A report whose chart download and run enumeration always fail.
struct Offline {
    sections: Vec<Section>,
}

impl ReportSource for Offline {
    fn entity(&self) -> &str {
        "bob"
    }

    fn name(&self) -> &str {
        "Offline"
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn runs(&self, _index: usize) -> runtex::Result<Vec<Run>> {
        Err(Error::Tracking("service unreachable".to_string()))
    }

    fn download_charts(&self, _dir: &Path) -> runtex::Result<ChartIndex> {
        Err(Error::Tracking("service unreachable".to_string()))
    }
}

// =============================================================================
// Document Structure
// =============================================================================

#[test]
fn test_document_is_header_sections_footer() {
    let dir = tempfile::tempdir().unwrap();
    let latex = export(&study(), dir.path());

    assert!(latex.starts_with(&latex::header("Alice", "Study")));
    assert!(latex.ends_with(FOOTER));
}

#[test]
fn test_header_substitution_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let latex = export(&study(), dir.path());

    assert!(latex.contains("\\title{Study}"));
    assert!(latex.contains("\\author{%\n  Alice\n}"));
    assert!(!latex.contains("\\title{TITLE}"));
    assert!(latex.contains("\\usepackage{longtable}"));
}

#[test]
fn test_sections_render_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let report = study();
    let latex = export(&report, dir.path());

    let setup = latex.find("\\section{Setup}").unwrap();
    let table = latex.find("\\begin{longtable}").unwrap();
    let findings = latex.find("\\textbf{better}").unwrap();
    assert!(setup < table && table < findings);
}

#[test]
fn test_document_equals_concatenated_section_renders() {
    let dir = tempfile::tempdir().unwrap();
    let report = study();
    let latex = export(&report, dir.path());

    let mut expected = latex::header(report.entity(), report.name());
    for (index, section) in report.sections().iter().enumerate() {
        let charts = runtex::charts::section_charts(dir.path(), index).unwrap();
        expected.push_str(&section_to_latex(section, &charts, &CmarkLatex).unwrap());
        expected.push_str(&runs_table_to_latex(&report.runs(index).unwrap(), None).unwrap());
    }
    expected.push_str(FOOTER);

    assert_eq!(latex, expected);
}

// =============================================================================
// Charts
// =============================================================================

#[test]
fn test_downloaded_charts_are_included() {
    let dir = tempfile::tempdir().unwrap();
    let latex = export(&study(), dir.path());

    let chart = dir.path().join("section_0_lr.png");
    assert!(chart.exists());
    assert!(latex.contains(&format!(
        "\\includegraphics[width=0.5\\linewidth]{{{}}}",
        chart.display()
    )));
    assert_eq!(latex.matches("\\begin{figure}[h]").count(), 1);
}

#[test]
fn test_chart_order_same_with_and_without_download() {
    let mut report = ReportSnapshot::new("erin", "Charts");
    report.add_section(Section::new("Plots", vec![]), vec![]);
    report.add_chart(0, ChartImage::new("zeta.png", vec![1]));
    report.add_chart(0, ChartImage::new("alpha.png", vec![2]));

    let dir = tempfile::tempdir().unwrap();
    let downloaded = export(&report, dir.path());
    let discovered = ReportExporter::builder()
        .charts_dir(dir.path())
        .download_charts(false)
        .build()
        .export(&report)
        .unwrap();

    assert_eq!(downloaded, discovered);
    let alpha = downloaded.find("section_0_alpha.png").unwrap();
    let zeta = downloaded.find("section_0_zeta.png").unwrap();
    assert!(alpha < zeta);
}

#[test]
fn test_existing_charts_discovered_without_download() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("section_1_old.png"), b"png").unwrap();
    fs::write(dir.path().join("section_11_other.png"), b"png").unwrap();

    let latex = ReportExporter::builder()
        .charts_dir(dir.path())
        .download_charts(false)
        .build()
        .export(&study())
        .unwrap();

    assert!(latex.contains("section_1_old.png"));
    assert!(!latex.contains("section_11_other.png"));
    assert!(!dir.path().join("section_0_lr.png").exists());
}

// =============================================================================
// Run Tables
// =============================================================================

#[test]
fn test_section_without_runs_has_no_table() {
    let dir = tempfile::tempdir().unwrap();
    let latex = export(&study(), dir.path());
    assert_eq!(latex.matches("\\begin{longtable}").count(), 1);
}

#[test]
fn test_columns_restrict_tables() {
    let dir = tempfile::tempdir().unwrap();
    let latex = ReportExporter::builder()
        .charts_dir(dir.path())
        .columns(["acc", "name"])
        .build()
        .export(&study())
        .unwrap();

    assert!(latex.contains("{} & acc & name \\\\"));
    assert!(!latex.contains("& lr"));
}

#[test]
fn test_sections_sharing_a_name_render_their_own_runs() {
    let mut report = ReportSnapshot::new("frank", "Duplicates");
    report.add_section(
        Section::new("Untitled", vec![]),
        vec![Run::builder("run-first").summary("acc", 0.1).build()],
    );
    report.add_section(
        Section::new("Untitled", vec![]),
        vec![Run::builder("run-second").summary("acc", 0.2).build()],
    );

    let dir = tempfile::tempdir().unwrap();
    let latex = export(&report, dir.path());

    let first = latex.find("0 & run-first & 0.100000").unwrap();
    let second = latex.find("0 & run-second & 0.200000").unwrap();
    assert!(first < second);
    assert_eq!(latex.matches("run-first").count(), 1);
    assert_eq!(latex.matches("run-second").count(), 1);
}

#[test]
fn test_report_to_latex_without_download() {
    let mut report = ReportSnapshot::new("carol", "Plain");
    report.add_section(Section::new("Only text", vec![Panel::markdown("hi")]), vec![]);

    let columns = vec!["name".to_string()];
    let latex = report_to_latex(&report, Some(&columns), false).unwrap();
    assert!(latex.contains("hi\n"));
    assert!(!latex.contains("\\begin{figure}"));
}

// =============================================================================
// Failure Propagation
// =============================================================================

#[test]
fn test_download_failure_propagates() {
    let report = Offline { sections: vec![] };
    let err = report_to_latex(&report, None, true).unwrap_err();
    assert!(err.to_string().contains("service unreachable"));
}

#[test]
fn test_run_enumeration_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let report = Offline {
        sections: vec![Section::new("s", vec![])],
    };
    let result = ReportExporter::builder()
        .charts_dir(dir.path())
        .download_charts(false)
        .build()
        .export(&report);
    assert!(matches!(result, Err(Error::Tracking(_))));
}

#[test]
fn test_run_without_summary_aborts_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut report = ReportSnapshot::new("dave", "Broken");
    report.add_section(
        Section::new("s", vec![]),
        vec![Run::builder("ghost").without_summary().build()],
    );

    let result = ReportExporter::builder()
        .charts_dir(dir.path())
        .build()
        .export(&report);
    assert!(matches!(result, Err(Error::MissingAttribute(_))));
}

// =============================================================================
// Snapshot Loading
// =============================================================================

#[test]
fn test_export_from_service_json() {
    let json = r###"{
        "entity": "stacey",
        "name": "Curriculum Learning with Nature Photos",
        "sections": [
            {
                "name": "Intro",
                "panels": { "views": { "0": { "config": [
                    { "viewType": "Markdown Panel", "config": { "value": "## Motivation" } },
                    { "viewType": "Run History Line Plot", "config": {} }
                ] } } }
            }
        ],
        "runs": [
            [
                { "name": "baseline", "config": { "epochs": 10, "_wandb": {} }, "summary": { "val_acc": 0.71 } }
            ]
        ]
    }"###;
    let report = ReportSnapshot::from_json(json).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let latex = export(&report, dir.path());
    assert!(latex.contains("\\title{Curriculum Learning with Nature Photos}"));
    assert!(latex.contains("\\subsection{Motivation}"));
    assert!(latex.contains("{} & name & epochs & val\\_acc \\\\"));
    assert!(latex.contains("0 & baseline & 10 & 0.710000 \\\\"));
}

#[test]
fn test_malformed_section_json_rejected() {
    let json = r#"{ "entity": "x", "name": "y", "sections": [ { "name": "no panels" } ] }"#;
    assert!(ReportSnapshot::from_json(json).is_err());
}
