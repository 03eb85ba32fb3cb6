//! Request evaluation for the `calc` binary.
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use calc_engine::service::{CalcRequest, CalcResponse, Calculator, ErrorBody};
use calc_engine::CalcResult;

use crate::config::CliConfig;
use crate::util::{validate_json_file, write_bytes_to_file};

/// One line of CLI output: either the engine response or an error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputEntry {
    Success(CalcResponse),
    Failure { error: ErrorBody },
}

impl OutputEntry {
    pub fn is_failure(&self) -> bool {
        matches!(self, OutputEntry::Failure { .. })
    }
}

impl From<CalcResult<CalcResponse>> for OutputEntry {
    fn from(outcome: CalcResult<CalcResponse>) -> Self {
        match outcome {
            Ok(response) => OutputEntry::Success(response),
            Err(err) => OutputEntry::Failure {
                error: ErrorBody::from(&err),
            },
        }
    }
}

/// Read a single request from a JSON file.
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<CalcRequest> {
    let path = path.as_ref();
    validate_json_file(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request: {}", path.display()))?;
    let request: CalcRequest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse request: {}", path.display()))?;
    Ok(request)
}

/// Read a JSON array of requests.
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<CalcRequest>> {
    let path = path.as_ref();
    validate_json_file(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read requests: {}", path.display()))?;
    let requests: Vec<CalcRequest> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse requests: {}", path.display()))?;
    Ok(requests)
}

/// Reject requests above the configured element limit before they reach the engine.
fn check_size(request: &CalcRequest, limit: Option<usize>) -> Option<ErrorBody> {
    let limit = limit?;
    let count = request.element_count();
    if count > limit {
        Some(ErrorBody {
            kind: "request_too_large".to_string(),
            message: format!("Request carries {} values, limit is {}", count, limit),
        })
    } else {
        None
    }
}

pub fn evaluate_one(request: &CalcRequest, config: &CliConfig) -> OutputEntry {
    if let Some(error) = check_size(request, config.max_elements) {
        return OutputEntry::Failure { error };
    }
    Calculator::new(config.engine.clone()).evaluate(request).into()
}

pub fn run_eval<P: AsRef<Path>>(request_path: P, config: &CliConfig) -> Result<OutputEntry> {
    let request = load_request(request_path)?;
    Ok(evaluate_one(&request, config))
}

/// Evaluate every request in the file; output order matches input order.
pub fn run_batch<P: AsRef<Path>>(requests_path: P, config: &CliConfig) -> Result<Vec<OutputEntry>> {
    let requests = load_requests(requests_path)?;
    log::info!("[Calc::Batch] Evaluating {} requests", requests.len());

    let rejected: Vec<Option<ErrorBody>> = requests
        .iter()
        .map(|r| check_size(r, config.max_elements))
        .collect();
    let admitted: Vec<CalcRequest> = requests
        .iter()
        .zip(rejected.iter())
        .filter(|(_, rejection)| rejection.is_none())
        .map(|(request, _)| request.clone())
        .collect();

    let calculator = Calculator::new(config.engine.clone());
    let mut outcomes = calculator
        .evaluate_batch(&admitted)
        .into_iter()
        .map(OutputEntry::from);

    // One outcome exists per admitted request, consumed in the same order.
    let entries: Vec<OutputEntry> = rejected
        .into_iter()
        .filter_map(|rejection| match rejection {
            Some(error) => Some(OutputEntry::Failure { error }),
            None => outcomes.next(),
        })
        .collect();

    let failures = entries.iter().filter(|e| e.is_failure()).count();
    log::info!(
        "[Calc::Batch] Completed {} requests ({} failed)",
        entries.len(),
        failures
    );
    Ok(entries)
}

pub fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// Write rendered output to `output`, or to stdout when no path is given.
pub fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => write_bytes_to_file(path, rendered.as_bytes())
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered)?;
            Ok(())
        }
    }
}
