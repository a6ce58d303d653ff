//! Property-based tests for runtex
//!
//! - Test table-shape and document-order invariants
//! - Test metric bounds on random predictions
//! - Run with ProptestConfig::with_cases(100)

use proptest::prelude::*;
use runtex::experiment::{Panel, ReportSnapshot, Run, Section};
use runtex::table::NAME_COLUMN;
use runtex::watch::{roc_curve, ConfusionMatrix};
use runtex::{runs_table_to_latex, runs_to_table, ReportExporter};

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate a run whose config mixes public and reserved keys
fn arb_run() -> impl Strategy<Value = Run> {
    (
        "[a-z]{1,8}-[0-9]{1,3}",
        proptest::collection::vec(("_?[a-z]{1,6}", -1000i64..1000), 0..5),
        proptest::collection::vec(("[a-z]{1,6}", 0.0f64..1.0), 1..5),
    )
        .prop_map(|(name, config, summary)| {
            let mut builder = Run::builder(name);
            for (key, value) in config {
                builder = builder.config(key, value);
            }
            for (key, value) in summary {
                builder = builder.summary(key, value);
            }
            builder.build()
        })
}

fn arb_runs(max: usize) -> impl Strategy<Value = Vec<Run>> {
    proptest::collection::vec(arb_run(), 1..=max)
}

/// Generate paired true/predicted labels over a small class set
fn arb_label_pairs(max: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0usize..5, 0usize..5), 1..=max)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Run Table Properties
    // ========================================================================

    /// Property: one table row per run
    #[test]
    fn prop_table_has_one_row_per_run(runs in arb_runs(20)) {
        let table = runs_to_table(&runs).unwrap();
        prop_assert_eq!(table.num_rows(), runs.len());
    }

    /// Property: the name column always comes first
    #[test]
    fn prop_name_column_first(runs in arb_runs(20)) {
        let table = runs_to_table(&runs).unwrap();
        prop_assert_eq!(table.column_names()[0], NAME_COLUMN);
    }

    /// Property: reserved config keys never become columns
    #[test]
    fn prop_no_reserved_columns(runs in arb_runs(20)) {
        let table = runs_to_table(&runs).unwrap();
        for name in table.column_names() {
            prop_assert!(!name.starts_with('_'), "reserved column {}", name);
        }
    }

    /// Property: selection yields exactly the requested columns, in order
    #[test]
    fn prop_select_exact_columns(
        runs in arb_runs(10),
        columns in proptest::collection::vec("[a-z]{1,6}", 1..6)
    ) {
        let table = runs_to_table(&runs).unwrap().select(&columns).unwrap();
        prop_assert_eq!(table.num_rows(), runs.len());
        let names: Vec<String> = table.column_names().iter().map(|s| (*s).to_string()).collect();
        prop_assert_eq!(names, columns);
    }

    /// Property: the longtable has one body line per run
    #[test]
    fn prop_longtable_body_lines(runs in arb_runs(20)) {
        let latex = runs_table_to_latex(&runs, None).unwrap();
        let body = latex.split("\\endlastfoot\n").nth(1).unwrap();
        let rows = body.lines().filter(|line| line.ends_with("\\\\")).count();
        prop_assert_eq!(rows, runs.len());
    }

    // ========================================================================
    // Document Properties
    // ========================================================================

    /// Property: sections appear in the document in report order
    #[test]
    fn prop_sections_in_order(count in 1usize..8) {
        let mut report = ReportSnapshot::new("alice", "Ordering");
        for i in 0..count {
            report.add_section(
                Section::new(format!("s{i}"), vec![Panel::markdown(format!("marker{i}x"))]),
                vec![],
            );
        }

        let dir = tempfile::tempdir().unwrap();
        let latex = ReportExporter::builder()
            .charts_dir(dir.path())
            .download_charts(false)
            .build()
            .export(&report)
            .unwrap();

        let positions: Vec<usize> = (0..count)
            .map(|i| latex.find(&format!("marker{i}x")).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    // ========================================================================
    // Metric Properties
    // ========================================================================

    /// Property: confusion matrix counts every sample exactly once
    #[test]
    fn prop_confusion_total_is_sample_count(pairs in arb_label_pairs(100)) {
        let (y_true, y_pred): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();
        let matrix = ConfusionMatrix::new(&y_true, &y_pred).unwrap();
        prop_assert_eq!(matrix.total(), y_true.len() as u64);
    }

    /// Property: confusion matrix is square over the observed labels
    #[test]
    fn prop_confusion_is_square(pairs in arb_label_pairs(100)) {
        let (y_true, y_pred): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();
        let matrix = ConfusionMatrix::new(&y_true, &y_pred).unwrap();
        let n = matrix.labels().len();
        prop_assert_eq!(matrix.counts().len(), n);
        prop_assert!(matrix.counts().iter().all(|row| row.len() == n));
    }

    /// Property: AUC lies in [0, 1] and curves run from (0,0) to (1,1)
    #[test]
    fn prop_roc_bounds(
        samples in proptest::collection::vec((any::<bool>(), 0.0f64..1.0), 2..100)
    ) {
        let (targets, scores): (Vec<bool>, Vec<f64>) = samples.into_iter().unzip();
        prop_assume!(targets.iter().any(|&t| t) && targets.iter().any(|&t| !t));

        let curve = roc_curve(&targets, &scores).unwrap();
        let auc = curve.auc();
        prop_assert!((0.0..=1.0).contains(&auc), "auc out of range: {}", auc);
        prop_assert_eq!(curve.fpr[0], 0.0);
        prop_assert_eq!(curve.tpr[0], 0.0);
        prop_assert!((curve.fpr[curve.fpr.len() - 1] - 1.0).abs() < 1e-12);
        prop_assert!((curve.tpr[curve.tpr.len() - 1] - 1.0).abs() < 1e-12);
    }

    /// Property: ROC rates never decrease along the curve
    #[test]
    fn prop_roc_monotonic(
        samples in proptest::collection::vec((any::<bool>(), 0.0f64..1.0), 2..100)
    ) {
        let (targets, scores): (Vec<bool>, Vec<f64>) = samples.into_iter().unzip();
        prop_assume!(targets.iter().any(|&t| t) && targets.iter().any(|&t| !t));

        let curve = roc_curve(&targets, &scores).unwrap();
        prop_assert!(curve.fpr.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(curve.tpr.windows(2).all(|w| w[0] <= w[1]));
    }
}
