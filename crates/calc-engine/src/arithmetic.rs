//! Scalar arithmetic on two operands.
//!
//! Every operation rejects non-finite operands and non-finite results with
//! [`CalcError::InvalidOperand`], so overflow never leaks out as infinity.

use crate::error::{CalcError, CalcResult};

fn check_operands(operation: &'static str, a: f64, b: f64) -> CalcResult<()> {
    for value in [a, b] {
        if !value.is_finite() {
            return Err(CalcError::invalid(
                operation,
                format!("operand {} is not a finite number", value),
            ));
        }
    }
    Ok(())
}

fn finite_result(operation: &'static str, a: f64, b: f64, result: f64) -> CalcResult<f64> {
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CalcError::invalid(
            operation,
            format!("{}({}, {}) is not a finite number ({})", operation, a, b, result),
        ))
    }
}

pub fn add(a: f64, b: f64) -> CalcResult<f64> {
    check_operands("add", a, b)?;
    finite_result("add", a, b, a + b)
}

pub fn subtract(a: f64, b: f64) -> CalcResult<f64> {
    check_operands("subtract", a, b)?;
    finite_result("subtract", a, b, a - b)
}

pub fn multiply(a: f64, b: f64) -> CalcResult<f64> {
    check_operands("multiply", a, b)?;
    finite_result("multiply", a, b, a * b)
}

/// Divide `a` by `b`. A zero divisor of either sign is rejected.
pub fn divide(a: f64, b: f64) -> CalcResult<f64> {
    check_operands("divide", a, b)?;
    if b == 0.0 {
        return Err(CalcError::DivisionByZero { dividend: a });
    }
    finite_result("divide", a, b, a / b)
}

/// Raise `base` to `exponent`.
///
/// Negative bases with fractional exponents, `0` raised to a negative power
/// and overflow all fail instead of producing NaN or infinity.
pub fn power(base: f64, exponent: f64) -> CalcResult<f64> {
    check_operands("power", base, exponent)?;
    finite_result("power", base, exponent, base.powf(exponent))
}
