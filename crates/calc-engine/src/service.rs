//! Operation dispatch on top of the kernels.
//!
//! A transport hands the [`Calculator`] an operation name plus primitive
//! arguments, either directly or as a [`CalcRequest`], and gets back a
//! [`CalcResponse`] or a typed [`CalcError`]. Nothing here touches I/O; the
//! serde derives only describe the value shapes so any transport can reuse
//! them.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{CalcError, CalcResult};
use crate::math::Matrix;
use crate::regression::{linear_regression_with, RegressionResult};
use crate::{arithmetic, linalg, stats};

// ============================================================================
// Operation names
// ============================================================================

/// Two-operand scalar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BasicOperation {
    pub fn name(&self) -> &'static str {
        match self {
            BasicOperation::Add => "add",
            BasicOperation::Subtract => "subtract",
            BasicOperation::Multiply => "multiply",
            BasicOperation::Divide => "divide",
            BasicOperation::Power => "power",
        }
    }

    pub fn apply(self, a: f64, b: f64) -> CalcResult<f64> {
        match self {
            BasicOperation::Add => arithmetic::add(a, b),
            BasicOperation::Subtract => arithmetic::subtract(a, b),
            BasicOperation::Multiply => arithmetic::multiply(a, b),
            BasicOperation::Divide => arithmetic::divide(a, b),
            BasicOperation::Power => arithmetic::power(a, b),
        }
    }
}

impl FromStr for BasicOperation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(BasicOperation::Add),
            "subtract" => Ok(BasicOperation::Subtract),
            "multiply" => Ok(BasicOperation::Multiply),
            "divide" => Ok(BasicOperation::Divide),
            "power" => Ok(BasicOperation::Power),
            _ => Err(CalcError::UnsupportedOperation {
                family: "basic",
                name: s.to_string(),
            }),
        }
    }
}

/// Descriptive statistics over one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticalOperation {
    Mean,
    Median,
    StdDev,
}

impl StatisticalOperation {
    pub fn name(&self) -> &'static str {
        match self {
            StatisticalOperation::Mean => "mean",
            StatisticalOperation::Median => "median",
            StatisticalOperation::StdDev => "std_dev",
        }
    }
}

impl FromStr for StatisticalOperation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(StatisticalOperation::Mean),
            "median" => Ok(StatisticalOperation::Median),
            "std_dev" => Ok(StatisticalOperation::StdDev),
            _ => Err(CalcError::UnsupportedOperation {
                family: "statistical",
                name: s.to_string(),
            }),
        }
    }
}

/// Matrix algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixOperation {
    Multiply,
    Transpose,
    Determinant,
}

impl MatrixOperation {
    pub fn name(&self) -> &'static str {
        match self {
            MatrixOperation::Multiply => "multiply",
            MatrixOperation::Transpose => "transpose",
            MatrixOperation::Determinant => "determinant",
        }
    }
}

impl FromStr for MatrixOperation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiply" => Ok(MatrixOperation::Multiply),
            "transpose" => Ok(MatrixOperation::Transpose),
            "determinant" => Ok(MatrixOperation::Determinant),
            _ => Err(CalcError::UnsupportedOperation {
                family: "matrix",
                name: s.to_string(),
            }),
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }
        )*
    };
}

display_by_name!(BasicOperation, StatisticalOperation, MatrixOperation);

// ============================================================================
// Request / response shapes
// ============================================================================

/// One calculation, as primitive data.
///
/// Operation names are kept as strings and matrices as nested rows so that
/// unknown operations and ragged matrices surface as typed engine errors
/// rather than as deserialisation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalcRequest {
    Basic {
        operation: String,
        a: f64,
        b: f64,
    },
    #[serde(rename = "stats")]
    Statistics {
        operation: String,
        values: Vec<f64>,
    },
    Matrix {
        operation: String,
        matrix_a: Vec<Vec<f64>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matrix_b: Option<Vec<Vec<f64>>>,
    },
    Regression {
        x: Vec<f64>,
        y: Vec<f64>,
    },
}

impl CalcRequest {
    /// Total number of scalars carried by the request.
    pub fn element_count(&self) -> usize {
        match self {
            CalcRequest::Basic { .. } => 2,
            CalcRequest::Statistics { values, .. } => values.len(),
            CalcRequest::Matrix {
                matrix_a, matrix_b, ..
            } => {
                let count = |m: &Vec<Vec<f64>>| m.iter().map(Vec::len).sum::<usize>();
                count(matrix_a) + matrix_b.as_ref().map_or(0, count)
            }
            CalcRequest::Regression { x, y } => x.len() + y.len(),
        }
    }
}

/// Result of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalcResponse {
    Scalar { result: f64 },
    Matrix { result: Matrix },
    Regression(RegressionResult),
}

impl CalcResponse {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            CalcResponse::Scalar { result } => Some(*result),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            CalcResponse::Matrix { result } => Some(result),
            _ => None,
        }
    }

    pub fn as_regression(&self) -> Option<&RegressionResult> {
        match self {
            CalcResponse::Regression(result) => Some(result),
            _ => None,
        }
    }
}

/// Serialisable view of a failure: stable kind code plus rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&CalcError> for ErrorBody {
    fn from(err: &CalcError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Calculator
// ============================================================================

/// Stateless dispatcher from operation names to kernels.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: EngineConfig,
}

impl Calculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn basic(&self, operation: BasicOperation, a: f64, b: f64) -> CalcResult<f64> {
        operation.apply(a, b)
    }

    /// `std_dev` follows the configured variance convention.
    pub fn statistics(&self, operation: StatisticalOperation, values: &[f64]) -> CalcResult<f64> {
        match operation {
            StatisticalOperation::Mean => stats::mean(values),
            StatisticalOperation::Median => stats::median(values),
            StatisticalOperation::StdDev => stats::std_dev_with(values, self.config.variance),
        }
    }

    /// `b` is required by `multiply` and ignored otherwise.
    pub fn matrix(
        &self,
        operation: MatrixOperation,
        a: &Matrix,
        b: Option<&Matrix>,
    ) -> CalcResult<CalcResponse> {
        match operation {
            MatrixOperation::Multiply => {
                let b = b.ok_or(CalcError::MissingOperand {
                    operation: "matrix multiply",
                    operand: "matrix_b",
                })?;
                linalg::multiply(a, b).map(|result| CalcResponse::Matrix { result })
            }
            MatrixOperation::Transpose => Ok(CalcResponse::Matrix {
                result: linalg::transpose(a),
            }),
            MatrixOperation::Determinant => linalg::determinant_with(
                a,
                self.config.determinant,
                self.config.laplace_max_order,
            )
            .map(|result| CalcResponse::Scalar { result }),
        }
    }

    pub fn regression(&self, x: &[f64], y: &[f64]) -> CalcResult<RegressionResult> {
        linear_regression_with(x, y, self.config.r_squared)
    }

    /// Parse the operation name, validate the operands and run the kernel.
    pub fn evaluate(&self, request: &CalcRequest) -> CalcResult<CalcResponse> {
        match request {
            CalcRequest::Basic { operation, a, b } => {
                let op: BasicOperation = operation.parse()?;
                debug!("basic {} ({}, {})", op, a, b);
                self.basic(op, *a, *b)
                    .map(|result| CalcResponse::Scalar { result })
            }
            CalcRequest::Statistics { operation, values } => {
                let op: StatisticalOperation = operation.parse()?;
                debug!("statistics {} over {} values", op, values.len());
                self.statistics(op, values)
                    .map(|result| CalcResponse::Scalar { result })
            }
            CalcRequest::Matrix {
                operation,
                matrix_a,
                matrix_b,
            } => {
                let op: MatrixOperation = operation.parse()?;
                let a = Matrix::from_rows(matrix_a.clone())?;
                let b = match (op, matrix_b) {
                    (MatrixOperation::Multiply, Some(rows)) => Some(Matrix::from_rows(rows.clone())?),
                    _ => None,
                };
                debug!("matrix {} on {:?}", op, a.shape());
                self.matrix(op, &a, b.as_ref())
            }
            CalcRequest::Regression { x, y } => {
                debug!("linear regression over {} points", x.len());
                self.regression(x, y).map(CalcResponse::Regression)
            }
        }
    }

    /// Evaluate independent requests in parallel.
    ///
    /// Results come back in request order. A failing request does not affect
    /// the others.
    pub fn evaluate_batch(&self, requests: &[CalcRequest]) -> Vec<CalcResult<CalcResponse>> {
        requests
            .par_iter()
            .enumerate()
            .map(|(idx, request)| {
                let outcome = self.evaluate(request);
                if let Err(err) = &outcome {
                    warn!("request {} failed: {}", idx, err);
                }
                outcome
            })
            .collect()
    }
}
