//! Value types shared by the kernels.
//!
//! `Matrix` is a rectangular row-major container that validates its shape on
//! construction; `Vector` and the free functions in [`vector`] hold the
//! fixed-order summation helpers used by statistics and regression.
pub mod matrix;
pub mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
