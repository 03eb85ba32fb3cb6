use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;
use std::slice::Iter;

/// Sum of `values`, accumulated left to right.
///
/// The accumulation order is fixed so identical inputs always produce
/// bit-identical sums.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Dot product of two equal-length slices, accumulated left to right.
pub fn dot(lhs: &[f64], rhs: &[f64]) -> f64 {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "Dot product requires equal length vectors"
    );
    lhs.iter().zip(rhs.iter()).fold(0.0, |acc, (a, b)| acc + a * b)
}

/// Sum of squared deviations of `values` around `center`.
pub fn sum_sq_dev(values: &[f64], center: f64) -> f64 {
    values.iter().fold(0.0, |acc, v| {
        let diff = v - center;
        acc + diff * diff
    })
}

/// Position of the first non-finite value, if any.
pub fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}

/// Owned, ordered sequence of scalars.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self::new(data)
    }

    pub fn from_slice(data: &[f64]) -> Self {
        Self::new(data.to_vec())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, f64> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn mapv<F>(&self, f: F) -> Vector
    where
        F: FnMut(&f64) -> f64,
    {
        Vector::from_vec(self.data.iter().map(f).collect())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    pub fn sum(&self) -> f64 {
        sum(&self.data)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum() / self.len() as f64)
        }
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        dot(&self.data, &other.data)
    }

    pub fn sum_sq_dev(&self, center: f64) -> f64 {
        sum_sq_dev(&self.data, center)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(value: Vec<f64>) -> Self {
        Vector::from_vec(value)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(value: Vector) -> Self {
        value.data
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, value) in self.data.iter().enumerate() {
            write!(f, "{}", value)?;
            if idx + 1 != self.data.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
