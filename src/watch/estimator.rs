//! Estimator capabilities consumed by the watcher

use crate::Result;

/// A fitted model.
///
/// Capabilities are optional: an estimator that is not a classifier
/// returns `None` from [`Estimator::as_classifier`], and one without
/// per-feature importances returns `None` from
/// [`Estimator::feature_importances`].
pub trait Estimator {
    /// The classifier view of this estimator, if it is one.
    fn as_classifier(&self) -> Option<&dyn Classifier> {
        None
    }

    /// One importance score per input feature, if the model exposes them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }
}

/// A fitted classifier over dense feature rows.
pub trait Classifier {
    /// Class labels, in the column order of [`Classifier::predict_proba`].
    fn classes(&self) -> &[usize];

    /// Predicted class label per row.
    ///
    /// # Errors
    ///
    /// Returns error if the rows do not match the fitted feature shape.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Class probabilities per row, one column per entry of `classes()`.
    ///
    /// # Errors
    ///
    /// Returns error if the rows do not match the fitted feature shape.
    fn predict_proba(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;
}
