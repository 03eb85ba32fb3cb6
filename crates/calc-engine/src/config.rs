use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::linalg::DEFAULT_LAPLACE_MAX_ORDER;

/// Divisor used for variance and standard deviation.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VarianceConvention {
    /// Divide by `n`.
    Population,
    /// Divide by `n - 1` (Bessel's correction). Needs at least two values.
    Sample,
}

impl Default for VarianceConvention {
    fn default() -> Self {
        VarianceConvention::Population
    }
}

impl FromStr for VarianceConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "population" | "pop" => Ok(VarianceConvention::Population),
            "sample" | "unbiased" => Ok(VarianceConvention::Sample),
            _ => Err(format!(
                "Unknown variance convention: {}. Expected `population` or `sample`",
                s
            )),
        }
    }
}

/// Value reported for r² when every y value is identical (`SS_total == 0`).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RSquaredPolicy {
    /// Always `0.0`.
    Zero,
    /// `1.0` when the fit also has zero residual, otherwise `0.0`.
    PerfectFit,
}

impl Default for RSquaredPolicy {
    fn default() -> Self {
        RSquaredPolicy::Zero
    }
}

impl FromStr for RSquaredPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "zero" => Ok(RSquaredPolicy::Zero),
            "perfect_fit" => Ok(RSquaredPolicy::PerfectFit),
            _ => Err(format!(
                "Unknown r-squared policy: {}. Expected `zero` or `perfect_fit`",
                s
            )),
        }
    }
}

/// Algorithm used for determinants.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeterminantMethod {
    /// Cofactor expansion up to `laplace_max_order`, LU above it.
    Auto,
    /// Cofactor expansion along the first row.
    Laplace,
    /// Gaussian elimination with partial pivoting.
    Lu,
}

impl Default for DeterminantMethod {
    fn default() -> Self {
        DeterminantMethod::Auto
    }
}

impl FromStr for DeterminantMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DeterminantMethod::Auto),
            "laplace" | "cofactor" => Ok(DeterminantMethod::Laplace),
            "lu" => Ok(DeterminantMethod::Lu),
            _ => Err(format!(
                "Unknown determinant method: {}. Expected `auto`, `laplace` or `lu`",
                s
            )),
        }
    }
}

/// Policy knobs for the kernels. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub variance: VarianceConvention,
    pub r_squared: RSquaredPolicy,
    pub determinant: DeterminantMethod,
    pub laplace_max_order: usize,
}

impl EngineConfig {
    pub fn new(
        variance: VarianceConvention,
        r_squared: RSquaredPolicy,
        determinant: DeterminantMethod,
        laplace_max_order: usize,
    ) -> Self {
        Self {
            variance,
            r_squared,
            determinant,
            laplace_max_order,
        }
    }

    pub fn with_variance(mut self, variance: VarianceConvention) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_r_squared(mut self, r_squared: RSquaredPolicy) -> Self {
        self.r_squared = r_squared;
        self
    }

    pub fn with_determinant(mut self, determinant: DeterminantMethod) -> Self {
        self.determinant = determinant;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variance: VarianceConvention::Population,
            r_squared: RSquaredPolicy::Zero,
            determinant: DeterminantMethod::Auto,
            laplace_max_order: DEFAULT_LAPLACE_MAX_ORDER,
        }
    }
}
