//! Plot artifacts
//!
//! Plots are plain values: a kind, a title and a Vega-Lite spec with the
//! plotted data inline. The tracking service renders the spec; nothing
//! here draws pixels or holds drawing state between plots.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::metrics::{ConfusionMatrix, LabeledCurve};
use crate::{Error, Result};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Kind of diagnostic plot, each logged under a fixed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    /// ROC curves, logged as `"roc"`
    Roc,
    /// Confusion matrix heatmap, logged as `"confusion_matrix"`
    ConfusionMatrix,
    /// Feature importance bars, logged as `"feature_importances"`
    FeatureImportances,
}

impl PlotKind {
    /// Log key for this plot kind.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Roc => "roc",
            Self::ConfusionMatrix => "confusion_matrix",
            Self::FeatureImportances => "feature_importances",
        }
    }
}

/// A rendered-on-demand plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotArtifact {
    kind: PlotKind,
    title: String,
    spec: Value,
}

impl PlotArtifact {
    /// Get the plot kind.
    #[must_use]
    pub const fn kind(&self) -> PlotKind {
        self.kind
    }

    /// Get the plot title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the Vega-Lite spec.
    #[must_use]
    pub const fn spec(&self) -> &Value {
        &self.spec
    }

    /// Inline data rows of the spec.
    #[must_use]
    pub fn data(&self) -> &[Value] {
        self.spec
            .pointer("/data/values")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn new(kind: PlotKind, title: &str, mut spec: Value) -> Self {
        if let Some(object) = spec.as_object_mut() {
            object.insert("$schema".to_string(), json!(VEGA_LITE_SCHEMA));
            object.insert("title".to_string(), json!(title));
        }
        Self {
            kind,
            title: title.to_string(),
            spec,
        }
    }
}

/// ROC curves with a dashed chance diagonal.
#[must_use]
pub fn roc_plot(curves: &[LabeledCurve]) -> PlotArtifact {
    let mut rows = Vec::new();
    for curve in curves {
        let series = format!("{} (area = {:.2})", curve.label, curve.auc);
        for (fpr, tpr) in curve.fpr.iter().zip(&curve.tpr) {
            rows.push(json!({ "curve": series, "fpr": fpr, "tpr": tpr }));
        }
    }

    let spec = json!({
        "data": { "values": rows },
        "layer": [
            {
                "mark": { "type": "line" },
                "encoding": {
                    "x": { "field": "fpr", "type": "quantitative", "title": "False Positive Rate" },
                    "y": { "field": "tpr", "type": "quantitative", "title": "True Positive Rate" },
                    "color": { "field": "curve", "type": "nominal" }
                }
            },
            {
                "data": { "values": [ { "fpr": 0.0, "tpr": 0.0 }, { "fpr": 1.0, "tpr": 1.0 } ] },
                "mark": { "type": "line", "strokeDash": [4, 4], "color": "black" },
                "encoding": {
                    "x": { "field": "fpr", "type": "quantitative" },
                    "y": { "field": "tpr", "type": "quantitative" }
                }
            }
        ]
    });
    PlotArtifact::new(PlotKind::Roc, "ROC Curves", spec)
}

/// Confusion matrix heatmap with counts overlaid.
#[must_use]
pub fn confusion_matrix_plot(matrix: &ConfusionMatrix) -> PlotArtifact {
    let labels = matrix.labels();
    let mut rows = Vec::with_capacity(labels.len() * labels.len());
    for (row, &actual) in labels.iter().enumerate() {
        for (col, &predicted) in labels.iter().enumerate() {
            rows.push(json!({
                "actual": actual,
                "predicted": predicted,
                "count": matrix.counts()[row][col],
            }));
        }
    }

    let encoding = json!({
        "x": { "field": "predicted", "type": "ordinal", "title": "Predicted label" },
        "y": { "field": "actual", "type": "ordinal", "title": "True label" }
    });
    let spec = json!({
        "data": { "values": rows },
        "encoding": encoding,
        "layer": [
            {
                "mark": "rect",
                "encoding": { "color": { "field": "count", "type": "quantitative", "scale": { "scheme": "blues" } } }
            },
            {
                "mark": "text",
                "encoding": { "text": { "field": "count", "type": "quantitative" } }
            }
        ]
    });
    PlotArtifact::new(PlotKind::ConfusionMatrix, "Confusion Matrix", spec)
}

/// Feature importances as bars, most important first.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the label count differs from the
/// importance count.
pub fn feature_importance_plot(importances: &[f64], labels: &[String]) -> Result<PlotArtifact> {
    if importances.len() != labels.len() {
        return Err(Error::InvalidInput(format!(
            "{} feature labels for {} importances",
            labels.len(),
            importances.len()
        )));
    }

    let mut ranked: Vec<(&String, f64)> = labels.iter().zip(importances.iter().copied()).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let rows: Vec<Value> = ranked
        .iter()
        .enumerate()
        .map(|(rank, (feature, importance))| {
            json!({ "rank": rank, "feature": feature, "importance": importance })
        })
        .collect();

    let spec = json!({
        "data": { "values": rows },
        "mark": "bar",
        "encoding": {
            "x": { "field": "feature", "type": "nominal", "sort": { "field": "rank" }, "title": "Feature" },
            "y": { "field": "importance", "type": "quantitative", "title": "Importance" }
        }
    });
    Ok(PlotArtifact::new(
        PlotKind::FeatureImportances,
        "Feature Importance",
        spec,
    ))
}
