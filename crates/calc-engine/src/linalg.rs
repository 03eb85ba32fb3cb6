//! Matrix kernels: transpose, product and determinant.
//!
//! Inputs are [`Matrix`] values, which are rectangular by construction, so the
//! kernels only check the shape relations between operands.
//!
//! Determinants use cofactor expansion for small orders, where it is exact
//! for integer-valued entries, and Gaussian elimination with partial pivoting
//! for larger ones, where the factorial cost of expansion is prohibitive.

use log::{debug, trace};

use crate::config::DeterminantMethod;
use crate::error::{CalcError, CalcResult};
use crate::math::Matrix;

/// Largest order expanded by cofactors when the method is `Auto`.
pub const DEFAULT_LAPLACE_MAX_ORDER: usize = 4;

// ============================================================================
// Transpose / product
// ============================================================================

/// Transpose `a`: `result[j][i] = a[i][j]`.
pub fn transpose(a: &Matrix) -> Matrix {
    let (rows, cols) = a.shape();
    let mut data = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        for i in 0..rows {
            data.push(a[(i, j)]);
        }
    }
    Matrix::from_raw(cols, rows, data)
}

/// Matrix product `a · b`.
///
/// Fails with `EmptyMatrix` for empty operands and `DimensionMismatch` unless
/// `cols(a) == rows(b)`. Each entry is accumulated over `k` ascending.
pub fn multiply(a: &Matrix, b: &Matrix) -> CalcResult<Matrix> {
    if a.is_empty() || b.is_empty() {
        return Err(CalcError::EmptyMatrix {
            operation: "matrix multiply",
        });
    }
    if a.ncols() != b.nrows() {
        return Err(CalcError::DimensionMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }

    let (rows, inner, cols) = (a.nrows(), a.ncols(), b.ncols());
    trace!("multiply {}x{} by {}x{}", rows, inner, inner, cols);

    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        let lhs = a.row_slice(i);
        for j in 0..cols {
            let mut acc = 0.0;
            for (k, value) in lhs.iter().enumerate() {
                acc += value * b[(k, j)];
            }
            if !acc.is_finite() {
                return Err(CalcError::invalid(
                    "matrix multiply",
                    format!("entry ({}, {}) overflowed to {}", i, j, acc),
                ));
            }
            data.push(acc);
        }
    }

    Ok(Matrix::from_raw(rows, cols, data))
}

// ============================================================================
// Determinant
// ============================================================================

/// Determinant of a square, non-empty matrix using the `Auto` method.
pub fn determinant(a: &Matrix) -> CalcResult<f64> {
    determinant_with(a, DeterminantMethod::Auto, DEFAULT_LAPLACE_MAX_ORDER)
}

/// Determinant with an explicit algorithm choice.
///
/// # Arguments
///
/// * `a` - Square, non-empty matrix.
/// * `method` - `Laplace`, `Lu`, or `Auto` (Laplace up to `laplace_max_order`).
/// * `laplace_max_order` - Threshold used by `Auto`.
pub fn determinant_with(
    a: &Matrix,
    method: DeterminantMethod,
    laplace_max_order: usize,
) -> CalcResult<f64> {
    if a.is_empty() {
        return Err(CalcError::EmptyMatrix {
            operation: "determinant",
        });
    }
    if !a.is_square() {
        return Err(CalcError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }

    let n = a.nrows();
    let use_laplace = match method {
        DeterminantMethod::Laplace => true,
        DeterminantMethod::Lu => false,
        DeterminantMethod::Auto => n <= laplace_max_order,
    };
    debug!(
        "determinant of order {} via {}",
        n,
        if use_laplace { "cofactor expansion" } else { "LU" }
    );

    let det = if use_laplace {
        laplace(a.as_slice(), n)
    } else {
        lu(a.as_slice(), n)
    };

    if det.is_finite() {
        Ok(det)
    } else {
        Err(CalcError::invalid(
            "determinant",
            format!("result overflowed to {}", det),
        ))
    }
}

/// Cofactor expansion along the first row of the `n`×`n` row-major `m`.
fn laplace(m: &[f64], n: usize) -> f64 {
    match n {
        1 => m[0],
        2 => m[0] * m[3] - m[1] * m[2],
        _ => {
            let mut det = 0.0;
            for col in 0..n {
                let entry = m[col];
                if entry == 0.0 {
                    continue;
                }
                let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
                det += sign * entry * laplace(&minor(m, n, col), n - 1);
            }
            det
        }
    }
}

/// Submatrix of `m` without row 0 and column `skip`.
fn minor(m: &[f64], n: usize, skip: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity((n - 1) * (n - 1));
    for row in 1..n {
        for col in 0..n {
            if col != skip {
                out.push(m[row * n + col]);
            }
        }
    }
    out
}

/// Gaussian elimination with partial pivoting.
///
/// Returns exactly `0.0` as soon as a pivot column is entirely zero.
fn lu(m: &[f64], n: usize) -> f64 {
    let mut work = m.to_vec();
    let mut det = 1.0;

    for k in 0..n {
        let pivot = (k..n)
            .max_by(|&i, &j| work[i * n + k].abs().total_cmp(&work[j * n + k].abs()))
            .unwrap_or(k);

        if work[pivot * n + k] == 0.0 {
            return 0.0;
        }
        if pivot != k {
            for col in 0..n {
                work.swap(k * n + col, pivot * n + col);
            }
            det = -det;
        }

        let diag = work[k * n + k];
        det *= diag;

        for row in (k + 1)..n {
            let factor = work[row * n + k] / diag;
            if factor == 0.0 {
                continue;
            }
            for col in (k + 1)..n {
                work[row * n + col] -= factor * work[k * n + col];
            }
        }
    }

    det
}
