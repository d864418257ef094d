// Ordinary least squares linear regression
//
// Fits an intercept by centering, then solves the normal equations of the
// centered design matrix. Columns that are linear combinations of earlier
// columns get a zero coefficient instead of failing the fit.

use anyhow::{ensure, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Relative pivot size below which a column counts as dependent
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Fitted linear model: coefficients plus intercept
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients: Array1::from(coefficients),
            intercept,
        }
    }

    /// Least-squares fit of `y` on `x` (rows are samples)
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        let (n_samples, n_features) = x.dim();
        ensure!(n_samples > 0, "cannot fit a model on zero samples");
        ensure!(
            n_samples == y.len(),
            "design matrix has {} rows but target has {} values",
            n_samples,
            y.len()
        );

        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let y_mean = y.mean().unwrap_or(0.0);

        let x_centered = x - &x_mean;
        let y_centered = y - y_mean;

        let gram = x_centered.t().dot(&x_centered);
        let rhs = x_centered.t().dot(&y_centered);

        let (coefficients, dropped) = solve_normal_equations(gram, rhs);
        if dropped > 0 {
            tracing::warn!(
                dropped,
                features = n_features,
                "Linearly dependent features received zero coefficients"
            );
        }

        let intercept = y_mean - x_mean.dot(&coefficients);
        ensure!(
            intercept.is_finite() && coefficients.iter().all(|c| c.is_finite()),
            "fit produced non-finite parameters; check the data for NaN or infinite values"
        );
        tracing::debug!(n_samples, n_features, intercept, "Fitted linear model");

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Raw (unclamped) prediction for one encoded row
    pub fn predict_one(&self, features: ArrayView1<f64>) -> f64 {
        self.intercept + self.coefficients.dot(&features)
    }

    /// Raw predictions for every row of `x`
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.coefficients) + self.intercept
    }

    /// Per-feature contribution `coefficient * value` for one encoded row
    pub fn contributions(&self, features: ArrayView1<f64>) -> Array1<f64> {
        &self.coefficients * &features
    }
}

/// Solve `gram * beta = rhs` for a symmetric positive semi-definite `gram`
///
/// Gaussian elimination in column order. A pivot that vanishes relative to
/// its original diagonal marks a dependent column; its coefficient is fixed at
/// zero. Returns the solution and the number of dependent columns.
fn solve_normal_equations(mut gram: Array2<f64>, mut rhs: Array1<f64>) -> (Array1<f64>, usize) {
    let p = rhs.len();
    let diagonal: Vec<f64> = (0..p).map(|k| gram[[k, k]]).collect();
    let mut active = vec![true; p];

    for k in 0..p {
        let pivot = gram[[k, k]];
        if diagonal[k] <= 0.0 || pivot <= PIVOT_TOLERANCE * diagonal[k] {
            active[k] = false;
            continue;
        }
        for i in (k + 1)..p {
            let factor = gram[[i, k]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in k..p {
                gram[[i, j]] -= factor * gram[[k, j]];
            }
            rhs[i] -= factor * rhs[k];
        }
    }

    let mut beta = Array1::zeros(p);
    for k in (0..p).rev() {
        if !active[k] {
            continue;
        }
        let mut sum = rhs[k];
        for j in (k + 1)..p {
            sum -= gram[[k, j]] * beta[j];
        }
        beta[k] = sum / gram[[k, k]];
    }

    let dropped = active.iter().filter(|a| !**a).count();
    (beta, dropped)
}
