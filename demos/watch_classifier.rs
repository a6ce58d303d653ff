//! Model Watching Example
//!
//! Fits a nearest-centroid classifier on a toy dataset, then logs ROC,
//! confusion-matrix and feature-importance plots to a JSON-lines run log.
//!
//! Run with: cargo run --example watch_classifier -- [run.jsonl]

use runtex::watch::{read_jsonl, watch, Classifier, Estimator, JsonlLogger};
use runtex::Error;
use tracing_subscriber::EnvFilter;

/// Nearest-centroid classifier with softmax-of-negative-distance scores.
struct NearestCentroid {
    classes: Vec<usize>,
    centroids: Vec<Vec<f64>>,
    spread: Vec<f64>,
}

impl NearestCentroid {
    #[allow(clippy::cast_precision_loss)]
    fn fit(x: &[Vec<f64>], y: &[usize]) -> Self {
        let mut classes: Vec<usize> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let width = x.first().map_or(0, Vec::len);
        let centroids: Vec<Vec<f64>> = classes
            .iter()
            .map(|&class| {
                let rows: Vec<&Vec<f64>> =
                    x.iter().zip(y).filter(|(_, &t)| t == class).map(|(r, _)| r).collect();
                (0..width)
                    .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / rows.len() as f64)
                    .collect()
            })
            .collect();

        // features whose class means differ most separate the classes best
        let spread: Vec<f64> = (0..width)
            .map(|j| {
                let means = centroids.iter().map(|c| c[j]);
                let max = means.clone().fold(f64::NEG_INFINITY, f64::max);
                let min = means.fold(f64::INFINITY, f64::min);
                max - min
            })
            .collect();

        Self {
            classes,
            centroids,
            spread,
        }
    }
}

impl Classifier for NearestCentroid {
    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn predict(&self, x: &[Vec<f64>]) -> runtex::Result<Vec<usize>> {
        Ok(self
            .predict_proba(x)?
            .iter()
            .map(|p| {
                let best = p
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map_or(0, |(i, _)| i);
                self.classes[best]
            })
            .collect())
    }

    fn predict_proba(&self, x: &[Vec<f64>]) -> runtex::Result<Vec<Vec<f64>>> {
        x.iter()
            .map(|row| {
                if row.len() != self.spread.len() {
                    return Err(Error::InvalidInput(format!(
                        "expected {} features, got {}",
                        self.spread.len(),
                        row.len()
                    )));
                }
                let weights: Vec<f64> = self
                    .centroids
                    .iter()
                    .map(|c| {
                        let d: f64 = c.iter().zip(row).map(|(a, b)| (a - b).powi(2)).sum();
                        (-d.sqrt()).exp()
                    })
                    .collect();
                let total: f64 = weights.iter().sum();
                Ok(weights.iter().map(|w| w / total).collect())
            })
            .collect()
    }
}

impl Estimator for NearestCentroid {
    fn as_classifier(&self) -> Option<&dyn Classifier> {
        Some(self)
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        let total: f64 = self.spread.iter().sum();
        (total > 0.0).then(|| self.spread.iter().map(|s| s / total).collect())
    }
}

fn main() -> runtex::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("runtex=debug")),
        )
        .init();

    println!("=== runtex Model Watching ===\n");

    // -------------------------------------------------------------------------
    // 1. Fit on a toy dataset: petal length, petal width, sepal noise
    // -------------------------------------------------------------------------
    println!("1. Fitting nearest-centroid classifier...");

    let x_train = vec![
        vec![1.4, 0.2, 3.1],
        vec![1.3, 0.3, 2.9],
        vec![4.5, 1.5, 3.0],
        vec![4.1, 1.3, 3.2],
        vec![5.9, 2.1, 3.0],
        vec![6.1, 2.3, 2.8],
    ];
    let y_train = vec![0, 0, 1, 1, 2, 2];
    let model = NearestCentroid::fit(&x_train, &y_train);
    println!("   Classes: {:?}", model.classes());

    let x_test = vec![
        vec![1.5, 0.2, 3.0],
        vec![4.4, 1.4, 2.9],
        vec![5.0, 1.8, 3.1],
        vec![6.0, 2.2, 3.0],
        vec![1.2, 0.4, 3.3],
    ];
    let y_test = vec![0, 1, 2, 2, 0];
    let labels = vec![
        "petal_length".to_string(),
        "petal_width".to_string(),
        "sepal_noise".to_string(),
    ];

    // -------------------------------------------------------------------------
    // 2. Watch: log diagnostic plots
    // -------------------------------------------------------------------------
    let path = std::env::args().nth(1).unwrap_or_else(|| "run.jsonl".to_string());
    println!("\n2. Logging plots to {path}...");

    let mut logger = JsonlLogger::open(&path)?;
    watch(
        &model,
        Some(x_test.as_slice()),
        Some(y_test.as_slice()),
        Some(labels.as_slice()),
        &mut logger,
    )?;

    // -------------------------------------------------------------------------
    // 3. Read the run log back
    // -------------------------------------------------------------------------
    println!("\n3. Logged entries:");
    for entry in read_jsonl(&path)? {
        println!(
            "   [{}] {:<20} {} ({} data points)",
            entry.logged_at().format("%H:%M:%S"),
            entry.key(),
            entry.artifact().title(),
            entry.artifact().data().len()
        );
    }

    println!("\n=== Done ===");
    Ok(())
}
