use serde::{Deserialize, Serialize};

use crate::config::RSquaredPolicy;
use crate::error::{CalcError, CalcResult};
use crate::math::vector::first_non_finite;
use crate::math::Vector;

/// Fitted line `y = slope * x + intercept` and its goodness of fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// `slope * x[i] + intercept` for each input `x`, in input order.
    pub predictions: Vec<f64>,
}

/// Ordinary least-squares line fit with the default r² policy.
pub fn linear_regression(x: &[f64], y: &[f64]) -> CalcResult<RegressionResult> {
    linear_regression_with(x, y, RSquaredPolicy::default())
}

/// Ordinary least-squares line fit.
///
/// slope     = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
/// intercept = (Σy − slope·Σx) / n
/// r²        = 1 − SS_res / SS_tot
///
/// # Arguments
///
/// * `x` - Independent variable, at least two finite values.
/// * `y` - Dependent variable, same length as `x`.
/// * `policy` - r² reported when `SS_tot == 0`.
///
/// # Returns
///
/// The fit, or `LengthMismatch`, `InsufficientData`, `InvalidOperand` or
/// `DegenerateRegression` when every x is identical.
pub fn linear_regression_with(
    x: &[f64],
    y: &[f64],
    policy: RSquaredPolicy,
) -> CalcResult<RegressionResult> {
    if x.len() != y.len() {
        return Err(CalcError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(CalcError::InsufficientData {
            operation: "linear regression",
            required: 2,
            actual: x.len(),
        });
    }
    for (name, values) in [("x", x), ("y", y)] {
        if let Some(idx) = first_non_finite(values) {
            return Err(CalcError::invalid(
                "linear regression",
                format!("{}[{}] is {}", name, idx, values[idx]),
            ));
        }
    }

    let n = x.len();
    let xs = Vector::from_slice(x);
    let ys = Vector::from_slice(y);

    let nf = n as f64;
    let sum_x = xs.sum();
    let sum_y = ys.sum();
    let sum_xy = xs.dot(&ys);
    let sum_xx = xs.dot(&xs);

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom == 0.0 || x.iter().all(|&v| v == x[0]) {
        return Err(CalcError::DegenerateRegression { n, x: x[0] });
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(CalcError::invalid(
            "linear regression",
            format!("fit overflowed (slope {}, intercept {})", slope, intercept),
        ));
    }

    let predictions = predict(&xs, slope, intercept)?;

    let y_mean = sum_y / nf;
    let ss_total = ys.sum_sq_dev(y_mean);
    let ss_residual = ys
        .iter()
        .zip(predictions.iter())
        .fold(0.0, |acc, (yi, pi)| acc + (yi - pi) * (yi - pi));

    let r_squared = if ss_total == 0.0 {
        match policy {
            RSquaredPolicy::Zero => 0.0,
            RSquaredPolicy::PerfectFit if ss_residual == 0.0 => 1.0,
            RSquaredPolicy::PerfectFit => 0.0,
        }
    } else {
        1.0 - ss_residual / ss_total
    };
    if !r_squared.is_finite() {
        return Err(CalcError::invalid(
            "linear regression",
            format!("r-squared is not finite ({})", r_squared),
        ));
    }

    Ok(RegressionResult {
        slope,
        intercept,
        r_squared,
        predictions: predictions.into(),
    })
}

/// `slope * x + intercept` for each `x`, failing if any fitted value overflows.
fn predict(xs: &Vector, slope: f64, intercept: f64) -> CalcResult<Vector> {
    let predictions = xs.mapv(|&xi| slope * xi + intercept);
    if let Some(idx) = first_non_finite(predictions.as_slice()) {
        return Err(CalcError::invalid(
            "linear regression",
            format!("prediction at x[{}] = {} overflowed", idx, xs[idx]),
        ));
    }
    Ok(predictions)
}
