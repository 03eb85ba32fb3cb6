use std::fmt;
use std::ops::Index;

use serde::de::{Deserialize, Deserializer, Error as DeError};
use serde::ser::{Serialize, Serializer};

use crate::error::{CalcError, CalcResult};
use crate::math::vector::{first_non_finite, Vector};

/// Rectangular, row-major matrix of finite scalars.
///
/// The shape is fixed at construction. Kernels never mutate a `Matrix`;
/// they build a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

/// `rows * cols`, or `InvalidOperand` when the product does not fit in `usize`.
fn element_count(operation: &'static str, rows: usize, cols: usize) -> CalcResult<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        CalcError::invalid(
            operation,
            format!("shape ({}, {}) is too large", rows, cols),
        )
    })
}

impl Matrix {
    /// Build a matrix from nested rows, rejecting ragged or non-finite input.
    ///
    /// Zero rows, or rows that are all zero-length, give an empty matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> CalcResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(CalcError::RaggedMatrix {
                    row: idx,
                    expected: ncols,
                    actual: row.len(),
                });
            }
            if let Some(col) = first_non_finite(row) {
                return Err(CalcError::invalid(
                    "matrix",
                    format!("entry ({}, {}) is {}", idx, col, row[col]),
                ));
            }
        }

        let len = element_count("matrix", nrows, ncols)?;
        let mut data = Vec::with_capacity(len);
        for row in rows {
            data.extend(row);
        }

        let rows = if ncols == 0 { 0 } else { nrows };
        Ok(Self {
            data,
            rows,
            cols: ncols,
        })
    }

    pub fn from_shape_vec(shape: (usize, usize), data: Vec<f64>) -> CalcResult<Self> {
        let (rows, cols) = shape;
        if data.len() != element_count("matrix", rows, cols)? {
            return Err(CalcError::invalid(
                "matrix",
                format!(
                    "invalid shape ({}, {}) for buffer of length {}",
                    rows,
                    cols,
                    data.len()
                ),
            ));
        }
        if let Some(pos) = first_non_finite(&data) {
            return Err(CalcError::invalid(
                "matrix",
                format!("entry ({}, {}) is {}", pos / cols, pos % cols, data[pos]),
            ));
        }
        if rows == 0 || cols == 0 {
            return Ok(Self::zeros(0, 0));
        }
        Ok(Self { data, rows, cols })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[f64] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    pub fn column(&self, col: usize) -> Vector {
        assert!(col < self.cols, "column index out of bounds");
        (0..self.rows).map(|row| self[(row, col)]).collect()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[self.offset(row, col)])
        } else {
            None
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row_slice(r).to_vec()).collect()
    }

    /// Wraps a buffer produced by a kernel. Shape consistency is the caller's
    /// responsibility.
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = CalcError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Matrix::from_rows(rows)
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.rows).map(|r| self.row_slice(r)))
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        Matrix::from_rows(rows).map_err(D::Error::custom)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.rows {
            write!(f, "{}", Vector::from_slice(self.row_slice(row)))?;
            if row + 1 != self.rows {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
