//! Classification diagnostics: ROC curves and confusion matrices
//!
//! Multi-class ROC is computed one-vs-rest per class, plus a
//! micro-average (all class/sample pairs pooled) and a macro-average
//! (per-class curves interpolated onto a shared FPR grid and averaged).

use std::collections::BTreeSet;

use crate::{Error, Result};

/// Receiver operating characteristic curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// False positive rate per threshold, non-decreasing, from 0 to 1
    pub fpr: Vec<f64>,
    /// True positive rate per threshold, non-decreasing, from 0 to 1
    pub tpr: Vec<f64>,
    /// Score thresholds (first entry is +inf)
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Area under the curve (trapezoid rule).
    #[must_use]
    pub fn auc(&self) -> f64 {
        trapezoid(&self.fpr, &self.tpr)
    }
}

/// ROC curve for binary targets and decision scores.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the inputs differ in length, are
/// empty, or contain only one of the two classes.
#[allow(clippy::cast_precision_loss)]
pub fn roc_curve(y_true: &[bool], scores: &[f64]) -> Result<RocCurve> {
    if y_true.len() != scores.len() {
        return Err(Error::InvalidInput(format!(
            "roc_curve: {} targets but {} scores",
            y_true.len(),
            scores.len()
        )));
    }

    let positives = y_true.iter().filter(|&&t| t).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::InvalidInput(
            "roc_curve needs both positive and negative samples".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];
    let (mut tp, mut fp) = (0usize, 0usize);

    for (rank, &i) in order.iter().enumerate() {
        if y_true[i] {
            tp += 1;
        } else {
            fp += 1;
        }
        // emit a point only once all samples sharing this score are counted
        let last_of_score = order
            .get(rank + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if last_of_score {
            fpr.push(fp as f64 / negatives as f64);
            tpr.push(tp as f64 / positives as f64);
            thresholds.push(scores[i]);
        }
    }

    Ok(RocCurve {
        fpr,
        tpr,
        thresholds,
    })
}

/// One ROC curve of a multi-class plot.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledCurve {
    /// Legend label, e.g. `class 2` or `micro-average`
    pub label: String,
    /// Curve points
    pub fpr: Vec<f64>,
    /// Curve points
    pub tpr: Vec<f64>,
    /// Area under the curve
    pub auc: f64,
}

/// One-vs-rest ROC curves for every class, plus micro and macro averages.
///
/// Classes absent from `y_true` (or covering every sample) have no
/// defined curve and are skipped. The macro-average needs at least one
/// per-class curve and the micro-average needs both outcomes among the
/// pooled pairs, so a split holding a single class may yield only the
/// micro-average, or no curves at all.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if lengths disagree or a probability row
/// does not have one column per class.
pub fn multiclass_roc(
    y_true: &[usize],
    probas: &[Vec<f64>],
    classes: &[usize],
) -> Result<Vec<LabeledCurve>> {
    if y_true.len() != probas.len() {
        return Err(Error::InvalidInput(format!(
            "{} targets but {} probability rows",
            y_true.len(),
            probas.len()
        )));
    }
    if let Some(row) = probas.iter().find(|row| row.len() != classes.len()) {
        return Err(Error::InvalidInput(format!(
            "probability row has {} columns, expected {}",
            row.len(),
            classes.len()
        )));
    }

    let mut curves = Vec::new();
    for (column, &class) in classes.iter().enumerate() {
        let targets: Vec<bool> = y_true.iter().map(|&y| y == class).collect();
        let scores: Vec<f64> = probas.iter().map(|row| row[column]).collect();
        match roc_curve(&targets, &scores) {
            Ok(curve) => curves.push(LabeledCurve {
                label: format!("class {class}"),
                auc: curve.auc(),
                fpr: curve.fpr,
                tpr: curve.tpr,
            }),
            Err(_) => tracing::debug!(class, "no ROC curve for class"),
        }
    }

    let macro_average = if curves.is_empty() {
        tracing::debug!("no per-class ROC curves, skipping macro-average");
        None
    } else {
        Some(macro_average(&curves))
    };

    let pooled_targets: Vec<bool> = y_true
        .iter()
        .flat_map(|&y| classes.iter().map(move |&class| y == class))
        .collect();
    let pooled_scores: Vec<f64> = probas.iter().flatten().copied().collect();
    match roc_curve(&pooled_targets, &pooled_scores) {
        Ok(micro) => curves.push(LabeledCurve {
            label: "micro-average".to_string(),
            auc: micro.auc(),
            fpr: micro.fpr,
            tpr: micro.tpr,
        }),
        Err(_) => tracing::debug!("no micro-average ROC curve"),
    }
    curves.extend(macro_average);

    Ok(curves)
}

#[allow(clippy::cast_precision_loss)]
fn macro_average(curves: &[LabeledCurve]) -> LabeledCurve {
    let mut grid: Vec<f64> = curves.iter().flat_map(|c| c.fpr.iter().copied()).collect();
    grid.sort_by(f64::total_cmp);
    grid.dedup();

    let tpr: Vec<f64> = grid
        .iter()
        .map(|&x| {
            curves.iter().map(|c| interp(x, &c.fpr, &c.tpr)).sum::<f64>() / curves.len() as f64
        })
        .collect();

    LabeledCurve {
        label: "macro-average".to_string(),
        auc: trapezoid(&grid, &tpr),
        fpr: grid,
        tpr,
    }
}

/// Linear interpolation on a non-decreasing `xs`; at repeated x values
/// the last point wins.
fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let Some(left) = xs.iter().rposition(|&xi| xi <= x) else {
        return ys.first().copied().unwrap_or(0.0);
    };
    match xs.get(left + 1) {
        Some(&x1) if x1 > xs[left] => {
            let t = (x - xs[left]) / (x1 - xs[left]);
            ys[left] + t * (ys[left + 1] - ys[left])
        }
        _ => ys[left],
    }
}

fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (xw[1] - xw[0]) * (yw[1] + yw[0]) / 2.0)
        .sum()
}

/// Counts of (true label, predicted label) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    labels: Vec<usize>,
    counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Build from true and predicted labels. Rows and columns follow the
    /// sorted union of observed labels.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the inputs differ in length.
    pub fn new(y_true: &[usize], y_pred: &[usize]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(Error::InvalidInput(format!(
                "confusion matrix: {} targets but {} predictions",
                y_true.len(),
                y_pred.len()
            )));
        }

        let labels: Vec<usize> = y_true
            .iter()
            .chain(y_pred)
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut counts = vec![vec![0u64; labels.len()]; labels.len()];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            // both labels come from the union above
            if let (Ok(row), Ok(col)) = (labels.binary_search(&t), labels.binary_search(&p)) {
                counts[row][col] += 1;
            }
        }

        Ok(Self { labels, counts })
    }

    /// Row/column labels in ascending order.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Count matrix indexed `[true][predicted]` by label position.
    #[must_use]
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Samples with true label `actual` predicted as `predicted`.
    #[must_use]
    pub fn get(&self, actual: usize, predicted: usize) -> u64 {
        match (
            self.labels.binary_search(&actual),
            self.labels.binary_search(&predicted),
        ) {
            (Ok(row), Ok(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    /// Total number of samples.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}
