//! Integration tests for transpose, matrix product and determinant.

use calc_engine::config::DeterminantMethod;
use calc_engine::linalg::{determinant, determinant_with, multiply, transpose};
use calc_engine::{CalcError, Matrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn m(rows: &[&[f64]]) -> Matrix {
    Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    let data = (0..rows * cols).map(|_| rng.gen_range(-10.0..10.0)).collect();
    Matrix::from_shape_vec((rows, cols), data).unwrap()
}

// ---------------------------------------------------------------------------
// Transpose
// ---------------------------------------------------------------------------

#[test]
fn transpose_swaps_dimensions() {
    let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
    let t = transpose(&a);
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.to_rows(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
}

#[test]
fn transpose_is_an_involution() {
    let mut rng = StdRng::seed_from_u64(3);
    for (rows, cols) in [(1, 1), (1, 5), (4, 2), (7, 7)] {
        let a = random_matrix(&mut rng, rows, cols);
        assert_eq!(transpose(&transpose(&a)), a);
    }
}

#[test]
fn transpose_leaves_input_untouched() {
    let a = m(&[&[1.0, 2.0]]);
    let before = a.clone();
    let _ = transpose(&a);
    assert_eq!(a, before);
}

// ---------------------------------------------------------------------------
// Multiply
// ---------------------------------------------------------------------------

#[test]
fn multiply_two_by_two() {
    let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
    let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);
    let c = multiply(&a, &b).unwrap();
    assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
}

#[test]
fn multiply_rectangular_shape() {
    let a = m(&[&[1.0, 2.0, 3.0]]);
    let b = m(&[&[1.0], &[1.0], &[1.0]]);
    let c = multiply(&a, &b).unwrap();
    assert_eq!(c.shape(), (1, 1));
    assert_eq!(c[(0, 0)], 6.0);

    let outer = multiply(&b, &a).unwrap();
    assert_eq!(outer.shape(), (3, 3));
}

#[test]
fn multiply_by_identity() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = random_matrix(&mut rng, 3, 4);
    assert_eq!(multiply(&a, &Matrix::identity(4)).unwrap(), a);
    assert_eq!(multiply(&Matrix::identity(3), &a).unwrap(), a);
}

#[test]
fn multiply_dimension_mismatch() {
    let a = m(&[&[1.0, 2.0]]);
    let b = m(&[&[1.0, 2.0]]);
    assert_eq!(
        multiply(&a, &b).unwrap_err(),
        CalcError::DimensionMismatch {
            left: (1, 2),
            right: (1, 2)
        }
    );
}

#[test]
fn multiply_empty_fails() {
    let empty = Matrix::from_rows(vec![]).unwrap();
    let a = m(&[&[1.0]]);
    assert_eq!(multiply(&empty, &a).unwrap_err().kind(), "empty_matrix");
}

#[test]
fn multiply_overflow_fails() {
    let a = m(&[&[1e200]]);
    assert_eq!(multiply(&a, &a).unwrap_err().kind(), "invalid_operand");
}

// ---------------------------------------------------------------------------
// Determinant
// ---------------------------------------------------------------------------

#[test]
fn determinant_small_cases() {
    assert_eq!(determinant(&m(&[&[4.0]])).unwrap(), 4.0);
    assert_eq!(determinant(&m(&[&[1.0, 2.0], &[3.0, 4.0]])).unwrap(), -2.0);
    let a = m(&[&[6.0, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]);
    assert_eq!(determinant(&a).unwrap(), -306.0);
}

#[test]
fn determinant_of_identity_is_one() {
    for n in 1..=8 {
        assert_eq!(determinant(&Matrix::identity(n)).unwrap(), 1.0, "n = {}", n);
        for method in [DeterminantMethod::Laplace, DeterminantMethod::Lu] {
            assert_eq!(determinant_with(&Matrix::identity(n), method, 4).unwrap(), 1.0);
        }
    }
}

#[test]
fn determinant_singular_is_zero() {
    let a = m(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], &[1.0, 0.0, 1.0]]);
    assert_eq!(determinant(&a).unwrap(), 0.0);
    assert_eq!(determinant_with(&a, DeterminantMethod::Lu, 4).unwrap(), 0.0);
}

#[test]
fn laplace_and_lu_agree() {
    let mut rng = StdRng::seed_from_u64(9);
    for n in 1..=6 {
        let a = random_matrix(&mut rng, n, n);
        let laplace = determinant_with(&a, DeterminantMethod::Laplace, 0).unwrap();
        let lu = determinant_with(&a, DeterminantMethod::Lu, 0).unwrap();
        assert!(
            (laplace - lu).abs() <= 1e-8 * laplace.abs().max(1.0),
            "n = {}: {} vs {}",
            n,
            laplace,
            lu
        );
    }
}

#[test]
fn auto_switches_to_lu_for_large_orders() {
    // Upper-triangular: determinant is the product of the diagonal.
    let n = 12;
    let mut rows = vec![vec![0.0; n]; n];
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate().skip(i) {
            *value = if i == j { 2.0 } else { 1.0 };
        }
    }
    let a = Matrix::from_rows(rows).unwrap();
    assert_eq!(determinant(&a).unwrap(), 4096.0);
}

#[test]
fn determinant_not_square() {
    let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
    assert_eq!(
        determinant(&a).unwrap_err(),
        CalcError::NotSquare { rows: 2, cols: 3 }
    );
}

#[test]
fn determinant_empty() {
    let empty = Matrix::from_rows(vec![]).unwrap();
    assert_eq!(determinant(&empty).unwrap_err().kind(), "empty_matrix");
}
