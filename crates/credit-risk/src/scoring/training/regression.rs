use super::super::domain::FEATURE_COUNT;
use super::super::model::{sigmoid, LogisticRegression};

/// Solver settings for [`fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub max_iterations: usize,
    pub learning_rate: f64,
    /// Inverse L2 regularization strength; larger values regularize less.
    pub inverse_regularization: f64,
    /// Stop once the largest gradient component falls below this.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            learning_rate: 0.5,
            inverse_regularization: 1.0,
            tolerance: 1e-6,
        }
    }
}

pub struct FitReport {
    pub iterations: usize,
    pub converged: bool,
}

/// Full-batch gradient descent on the L2-penalized log loss.
///
/// Inputs are standardized with per-column mean and population standard deviation; constant
/// columns keep a scale of one. The scaler statistics are stored in the returned model.
pub fn fit(
    rows: &[[f64; FEATURE_COUNT]],
    targets: &[f64],
    options: &FitOptions,
) -> (LogisticRegression, FitReport) {
    debug_assert_eq!(rows.len(), targets.len());

    let n = rows.len().max(1) as f64;
    let (means, scales) = column_statistics(rows);

    let standardized: Vec<[f64; FEATURE_COUNT]> = rows
        .iter()
        .map(|row| {
            let mut scaled = [0.0; FEATURE_COUNT];
            for (column, value) in scaled.iter_mut().enumerate() {
                *value = (row[column] - means[column]) / scales[column];
            }
            scaled
        })
        .collect();

    let penalty = 1.0 / (options.inverse_regularization * n);
    let mut weights = [0.0; FEATURE_COUNT];
    let mut intercept = 0.0;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;

        let mut weight_gradient = [0.0; FEATURE_COUNT];
        let mut intercept_gradient = 0.0;

        for (row, target) in standardized.iter().zip(targets) {
            let z = row
                .iter()
                .zip(&weights)
                .fold(intercept, |acc, (x, w)| acc + x * w);
            let error = sigmoid(z) - target;
            for (gradient, x) in weight_gradient.iter_mut().zip(row) {
                *gradient += error * x;
            }
            intercept_gradient += error;
        }

        for (gradient, weight) in weight_gradient.iter_mut().zip(&weights) {
            *gradient = *gradient / n + penalty * weight;
        }
        intercept_gradient /= n;

        let largest = weight_gradient
            .iter()
            .chain(std::iter::once(&intercept_gradient))
            .fold(0.0_f64, |acc, gradient| acc.max(gradient.abs()));

        for (weight, gradient) in weights.iter_mut().zip(&weight_gradient) {
            *weight -= options.learning_rate * gradient;
        }
        intercept -= options.learning_rate * intercept_gradient;

        if largest < options.tolerance {
            converged = true;
            break;
        }
    }

    let model = LogisticRegression {
        coefficients: weights.to_vec(),
        intercept,
        feature_means: means.to_vec(),
        feature_scales: scales.to_vec(),
    };

    (
        model,
        FitReport {
            iterations,
            converged,
        },
    )
}

fn column_statistics(
    rows: &[[f64; FEATURE_COUNT]],
) -> ([f64; FEATURE_COUNT], [f64; FEATURE_COUNT]) {
    let n = rows.len().max(1) as f64;
    let mut means = [0.0; FEATURE_COUNT];
    for row in rows {
        for (mean, value) in means.iter_mut().zip(row) {
            *mean += value / n;
        }
    }

    let mut scales = [0.0; FEATURE_COUNT];
    for row in rows {
        for (column, variance) in scales.iter_mut().enumerate() {
            let delta = row[column] - means[column];
            *variance += delta * delta / n;
        }
    }
    for scale in scales.iter_mut() {
        *scale = scale.sqrt();
        if !scale.is_finite() || *scale < f64::EPSILON {
            *scale = 1.0;
        }
    }

    (means, scales)
}
