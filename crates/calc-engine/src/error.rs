use std::error::Error;
use std::fmt;

/// Result alias used by every kernel in the crate.
pub type CalcResult<T> = Result<T, CalcError>;

/// Failure raised by a numeric kernel or by operation dispatch.
///
/// Every variant describes malformed input, so none of them is a server fault.
/// Variants carry the offending operands or shapes so that the rendered
/// message is useful on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    DivisionByZero {
        dividend: f64,
    },
    InvalidOperand {
        operation: &'static str,
        detail: String,
    },
    EmptyDataset {
        operation: &'static str,
    },
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    NotSquare {
        rows: usize,
        cols: usize,
    },
    EmptyMatrix {
        operation: &'static str,
    },
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },
    LengthMismatch {
        x_len: usize,
        y_len: usize,
    },
    DegenerateRegression {
        n: usize,
        x: f64,
    },
    UnsupportedOperation {
        family: &'static str,
        name: String,
    },
    MissingOperand {
        operation: &'static str,
        operand: &'static str,
    },
}

impl CalcError {
    /// Stable snake_case identifier of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::DivisionByZero { .. } => "division_by_zero",
            CalcError::InvalidOperand { .. } => "invalid_operand",
            CalcError::EmptyDataset { .. } => "empty_dataset",
            CalcError::DimensionMismatch { .. } => "dimension_mismatch",
            CalcError::NotSquare { .. } => "not_square",
            CalcError::EmptyMatrix { .. } => "empty_matrix",
            CalcError::RaggedMatrix { .. } => "ragged_matrix",
            CalcError::InsufficientData { .. } => "insufficient_data",
            CalcError::LengthMismatch { .. } => "length_mismatch",
            CalcError::DegenerateRegression { .. } => "degenerate_regression",
            CalcError::UnsupportedOperation { .. } => "unsupported_operation",
            CalcError::MissingOperand { .. } => "missing_operand",
        }
    }

    /// Whether a transport should report this failure as bad client input.
    ///
    /// Always `true`: the engine has no transient or internal failure modes.
    pub fn is_client_error(&self) -> bool {
        match self {
            CalcError::DivisionByZero { .. }
            | CalcError::InvalidOperand { .. }
            | CalcError::EmptyDataset { .. }
            | CalcError::DimensionMismatch { .. }
            | CalcError::NotSquare { .. }
            | CalcError::EmptyMatrix { .. }
            | CalcError::RaggedMatrix { .. }
            | CalcError::InsufficientData { .. }
            | CalcError::LengthMismatch { .. }
            | CalcError::DegenerateRegression { .. }
            | CalcError::UnsupportedOperation { .. }
            | CalcError::MissingOperand { .. } => true,
        }
    }

    pub(crate) fn invalid(operation: &'static str, detail: impl Into<String>) -> Self {
        CalcError::InvalidOperand {
            operation,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalcError::DivisionByZero { dividend } => {
                write!(f, "Division by zero: {} / 0", dividend)
            }
            CalcError::InvalidOperand { operation, detail } => {
                write!(f, "Invalid operand for {}: {}", operation, detail)
            }
            CalcError::EmptyDataset { operation } => {
                write!(f, "Input dataset for {} cannot be empty", operation)
            }
            CalcError::DimensionMismatch { left, right } => write!(
                f,
                "Matrix dimensions do not match: {}x{} cannot be multiplied by {}x{} \
                 (columns of the first must equal rows of the second)",
                left.0, left.1, right.0, right.1
            ),
            CalcError::NotSquare { rows, cols } => write!(
                f,
                "Determinant requires a square matrix, got {}x{}",
                rows, cols
            ),
            CalcError::EmptyMatrix { operation } => {
                write!(f, "Matrix for {} cannot be empty", operation)
            }
            CalcError::RaggedMatrix {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Matrix rows must have equal length: row {} has {} values, expected {}",
                row, actual, expected
            ),
            CalcError::InsufficientData {
                operation,
                required,
                actual,
            } => write!(
                f,
                "{} requires at least {} data points, got {}",
                operation, required, actual
            ),
            CalcError::LengthMismatch { x_len, y_len } => write!(
                f,
                "x and y must have equal length, got {} and {}",
                x_len, y_len
            ),
            CalcError::DegenerateRegression { n, x } => write!(
                f,
                "Regression is undefined: all {} x values are identical ({})",
                n, x
            ),
            CalcError::UnsupportedOperation { family, name } => {
                write!(f, "Unsupported {} operation: {}", family, name)
            }
            CalcError::MissingOperand { operation, operand } => {
                write!(f, "Operation {} requires operand {}", operation, operand)
            }
        }
    }
}

impl Error for CalcError {}
