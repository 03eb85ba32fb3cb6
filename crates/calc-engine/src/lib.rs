//! calc-engine: numeric kernels behind a calculation service.
//!
//! The crate provides four independent kernel families (scalar arithmetic,
//! descriptive statistics, matrix algebra and least-squares line fitting),
//! the `Matrix`/`Vector` value types they share, a typed error enum, and a
//! small dispatch layer (`service`) that maps operation names to kernels.
//!
//! Every kernel is a pure function of its inputs. Transport concerns such as
//! HTTP, request size limits and serialisation formats belong to the caller.
pub mod arithmetic;
pub mod config;
pub mod error;
pub mod linalg;
pub mod math;
pub mod regression;
pub mod service;
pub mod stats;

pub use config::EngineConfig;
pub use error::{CalcError, CalcResult};
pub use math::{Matrix, Vector};
pub use regression::RegressionResult;
pub use service::{CalcRequest, CalcResponse, Calculator};
