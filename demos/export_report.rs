//! Report Export Example
//!
//! Builds a report snapshot (or loads one from JSON), exports it to a
//! LaTeX document and writes the document to disk.
//!
//! Run with: cargo run --example export_report -- [report.json] [out.tex]
//!
//! Set `RUST_LOG=runtex=debug` to follow the export step by step.

use std::path::PathBuf;

use runtex::experiment::{ChartImage, Panel, ReportSnapshot, ReportSource, Run, Section};
use runtex::ReportExporter;
use tracing_subscriber::EnvFilter;

fn sample_report() -> ReportSnapshot {
    let mut report = ReportSnapshot::new("stacey", "Curriculum Learning with Nature Photos");

    report.add_section(
        Section::new(
            "Motivation",
            vec![Panel::markdown(
                "# Motivation\n\
                 Can a classifier learn faster if it sees *easy* classes first?\n\n\
                 - baseline: all 10 classes from the start\n\
                 - curriculum: 3 classes, then 10",
            )],
        ),
        vec![],
    );

    report.add_section(
        Section::new(
            "Results",
            vec![
                Panel::markdown("## Results\nThe curriculum run reaches **0.74** validation accuracy."),
                Panel::other("Run History Line Plot"),
            ],
        ),
        vec![
            Run::builder("baseline")
                .config("epochs", 10)
                .config("lr", 0.001)
                .config("_wandb", serde_json::json!({ "cli_version": "0.8.36" }))
                .summary("val_acc", 0.68)
                .summary("val_loss", 1.12)
                .build(),
            Run::builder("curriculum")
                .config("epochs", 10)
                .config("lr", 0.001)
                .config("warmup_classes", 3)
                .summary("val_acc", 0.74)
                .summary("val_loss", 0.97)
                .build(),
        ],
    );
    report.add_chart(1, ChartImage::new("val_acc.png", b"\x89PNG\r\n".to_vec()));

    report
}

fn main() -> runtex::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("runtex=info")),
        )
        .init();

    println!("=== runtex Report Export ===\n");

    let mut args = std::env::args().skip(1);
    let report = match args.next() {
        Some(path) => {
            println!("1. Loading report from {path}...");
            ReportSnapshot::from_json(&std::fs::read_to_string(path)?)?
        }
        None => {
            println!("1. Building sample report...");
            sample_report()
        }
    };
    let output = args.next().map_or_else(|| PathBuf::from("report.tex"), PathBuf::from);

    println!("   Author: {}", report.entity());
    println!("   Title: {}", report.name());
    println!("   Sections: {}", report.sections().len());

    // -------------------------------------------------------------------------
    // 2. Export with a restricted run table
    // -------------------------------------------------------------------------
    println!("\n2. Exporting...");

    let exporter = ReportExporter::builder()
        .columns(["name", "warmup_classes", "val_acc"])
        .charts_dir("charts")
        .build();
    let latex = exporter.export(&report)?;

    std::fs::write(&output, &latex)?;
    println!("   Charts directory: {}", exporter.charts_dir().display());
    println!("   Wrote {} bytes to {}", latex.len(), output.display());

    println!("\n=== Done: compile with `pdflatex {}` ===", output.display());
    Ok(())
}
