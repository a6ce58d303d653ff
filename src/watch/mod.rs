//! Model watcher: diagnostic plots for fitted classifiers
//!
//! [`watch`] computes predictions on held-out data, turns them into plot
//! artifacts and logs them under fixed keys:
//!
//! | key                   | when                                          |
//! |-----------------------|-----------------------------------------------|
//! | `roc`                 | classifier, test inputs and labels given      |
//! | `confusion_matrix`    | classifier, test inputs and labels given      |
//! | `feature_importances` | feature labels given                          |
//!
//! ## Example
//!
//! ```rust
//! use runtex::watch::{watch, Classifier, Estimator, MemoryLogger};
//!
//! struct Threshold;
//!
//! impl Classifier for Threshold {
//!     fn classes(&self) -> &[usize] {
//!         &[0, 1]
//!     }
//!     fn predict(&self, x: &[Vec<f64>]) -> runtex::Result<Vec<usize>> {
//!         Ok(x.iter().map(|row| usize::from(row[0] > 0.5)).collect())
//!     }
//!     fn predict_proba(&self, x: &[Vec<f64>]) -> runtex::Result<Vec<Vec<f64>>> {
//!         Ok(x.iter().map(|row| vec![1.0 - row[0], row[0]]).collect())
//!     }
//! }
//!
//! impl Estimator for Threshold {
//!     fn as_classifier(&self) -> Option<&dyn Classifier> {
//!         Some(self)
//!     }
//! }
//!
//! let x = vec![vec![0.1], vec![0.9], vec![0.4], vec![0.7]];
//! let y = vec![0, 1, 0, 1];
//! let mut logger = MemoryLogger::new();
//! watch(&Threshold, Some(x.as_slice()), Some(y.as_slice()), None, &mut logger)?;
//! assert_eq!(logger.keys(), vec!["roc", "confusion_matrix"]);
//! # Ok::<(), runtex::Error>(())
//! ```

mod estimator;
mod logger;
pub mod metrics;
pub mod plot;

pub use estimator::{Classifier, Estimator};
pub use logger::{read_jsonl, JsonlLogger, LogEntry, MemoryLogger, RunLogger};
pub use metrics::{multiclass_roc, roc_curve, ConfusionMatrix, LabeledCurve, RocCurve};
pub use plot::{PlotArtifact, PlotKind};

use crate::{Error, Result};

/// Log diagnostic plots for a fitted estimator.
///
/// The ROC and confusion-matrix plots need a classifier plus both
/// `x_test` and `y_test`; otherwise they are skipped without error. The
/// feature-importance plot is logged whenever `labels` is given.
///
/// # Errors
///
/// Returns error if prediction fails, the test data is inconsistent,
/// labels are given for an estimator without feature importances (or
/// with a different number of them), or the logger rejects an emission.
pub fn watch(
    estimator: &dyn Estimator,
    x_test: Option<&[Vec<f64>]>,
    y_test: Option<&[usize]>,
    labels: Option<&[String]>,
    logger: &mut dyn RunLogger,
) -> Result<()> {
    if let (Some(classifier), Some(x), Some(y)) = (estimator.as_classifier(), x_test, y_test) {
        let y_pred = classifier.predict(x)?;
        let y_probas = classifier.predict_proba(x)?;

        let curves = multiclass_roc(y, &y_probas, classifier.classes())?;
        emit(logger, plot::roc_plot(&curves))?;

        let matrix = ConfusionMatrix::new(y, &y_pred)?;
        emit(logger, plot::confusion_matrix_plot(&matrix))?;
    } else {
        tracing::debug!("skipping prediction plots: need a classifier with test inputs and labels");
    }

    if let Some(labels) = labels {
        let importances = estimator.feature_importances().ok_or_else(|| {
            Error::MissingAttribute("estimator does not expose feature importances".to_string())
        })?;
        emit(logger, plot::feature_importance_plot(&importances, labels)?)?;
    }

    Ok(())
}

fn emit(logger: &mut dyn RunLogger, artifact: PlotArtifact) -> Result<()> {
    let key = artifact.kind().key();
    tracing::debug!(key, title = artifact.title(), "logging plot");
    logger.log(key, artifact)
}
