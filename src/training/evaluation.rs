// Regression metrics for the held-out split

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Error metrics of predictions against actual scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Number of samples evaluated
    pub samples: usize,
}

impl EvaluationMetrics {
    /// Compare raw predictions with the actual targets
    ///
    /// Both arrays must have the same length.
    pub fn compute(actual: &Array1<f64>, predicted: &Array1<f64>) -> Self {
        debug_assert_eq!(actual.len(), predicted.len());
        Self {
            mae: mean_absolute_error(actual, predicted),
            rmse: root_mean_squared_error(actual, predicted),
            r2: r2_score(actual, predicted),
            samples: actual.len(),
        }
    }
}

pub fn mean_absolute_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    (actual - predicted).mapv(f64::abs).sum() / actual.len() as f64
}

pub fn root_mean_squared_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mse = (actual - predicted).mapv(|e| e * e).sum() / actual.len() as f64;
    mse.sqrt()
}

/// R² = 1 - SS_res / SS_tot
///
/// A constant target has no variance to explain: a perfect fit scores 1.0,
/// anything else 0.0.
pub fn r2_score(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let Some(mean) = actual.mean() else {
        return 0.0;
    };
    let ss_res = (actual - predicted).mapv(|e| e * e).sum();
    let ss_tot = actual.mapv(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
