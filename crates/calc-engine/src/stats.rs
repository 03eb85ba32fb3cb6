use crate::config::VarianceConvention;
use crate::error::{CalcError, CalcResult};
use crate::math::vector::{first_non_finite, sum, sum_sq_dev};

/// Reject empty or non-finite datasets before any statistic is computed.
fn check_dataset(operation: &'static str, values: &[f64]) -> CalcResult<()> {
    if values.is_empty() {
        return Err(CalcError::EmptyDataset { operation });
    }
    if let Some(idx) = first_non_finite(values) {
        return Err(CalcError::invalid(
            operation,
            format!("value at index {} is {}", idx, values[idx]),
        ));
    }
    Ok(())
}

fn finite(operation: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(
            operation,
            format!("result overflowed to {}", value),
        ))
    }
}

/// Arithmetic mean of a non-empty dataset.
///
/// Values are accumulated once, left to right, and divided by `n`. The same
/// input therefore always yields the same bits.
///
/// # Arguments
///
/// * `values` - The dataset. Must be non-empty and finite.
///
/// # Returns
///
/// The mean, or `EmptyDataset` / `InvalidOperand`.
pub fn mean(values: &[f64]) -> CalcResult<f64> {
    check_dataset("mean", values)?;
    finite("mean", sum(values) / values.len() as f64)
}

/// Average of `lo <= hi` without overflowing when both are near `f64::MAX`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    if lo.is_sign_negative() != hi.is_sign_negative() {
        (lo + hi) / 2.0
    } else {
        lo + (hi - lo) / 2.0
    }
}

/// Median of a non-empty dataset.
///
/// The values are copied and sorted ascending. For an odd count the middle
/// element is returned, for an even count the average of the two middle
/// elements.
pub fn median(values: &[f64]) -> CalcResult<f64> {
    check_dataset("median", values)?;

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        Ok(midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Ok(sorted[mid])
    }
}

/// Variance of a dataset under the given convention.
///
/// # Arguments
///
/// * `values` - The dataset. Must be non-empty and finite.
/// * `convention` - `Population` divides by `n`, `Sample` by `n - 1`.
///
/// # Returns
///
/// The variance. `Sample` with fewer than two values fails with
/// `InsufficientData`.
pub fn variance(values: &[f64], convention: VarianceConvention) -> CalcResult<f64> {
    check_dataset("variance", values)?;

    let n = values.len();
    let divisor = match convention {
        VarianceConvention::Population => n as f64,
        VarianceConvention::Sample => {
            if n < 2 {
                return Err(CalcError::InsufficientData {
                    operation: "sample variance",
                    required: 2,
                    actual: n,
                });
            }
            (n - 1) as f64
        }
    };

    let avg = mean(values)?;
    finite("variance", sum_sq_dev(values, avg) / divisor)
}

/// Population standard deviation: `sqrt(sum((x - mean)^2) / n)`.
pub fn std_dev(values: &[f64]) -> CalcResult<f64> {
    std_dev_with(values, VarianceConvention::Population)
}

/// Standard deviation under an explicit variance convention.
pub fn std_dev_with(values: &[f64], convention: VarianceConvention) -> CalcResult<f64> {
    variance(values, convention).map(f64::sqrt)
}
