use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use calc_engine::config::{DeterminantMethod, EngineConfig, RSquaredPolicy, VarianceConvention};

use crate::util::validate_json_file;

/// Settings for one CLI invocation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub pretty: bool,
    /// Upper bound on the scalars a single request may carry.
    pub max_elements: Option<usize>,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            engine: EngineConfig::default(),
            pretty: false,
            max_elements: None,
        }
    }
}

/// Load a CLI configuration from a JSON file.
///
/// Missing or invalid fields fall back to their defaults with a warning.
pub fn load_cli_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path = path.as_ref();
    validate_json_file(path)?;
    let config_json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let partial: serde_json::Value = serde_json::from_str(&config_json)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    let mut config = CliConfig::default();

    macro_rules! load_or_default {
        ($source:expr, $target:expr, $label:expr) => {
            if let Some(val) = $source {
                if let Ok(parsed) = serde_json::from_value(val.clone()) {
                    $target = parsed;
                } else {
                    log::warn!(
                        "Config Invalid value for '{}', using default: {:?}",
                        $label,
                        $target
                    );
                }
            }
        };
    }

    if let Some(engine) = partial.get("engine") {
        if !engine.is_object() {
            log::warn!(
                "Config Invalid value for 'engine', using default: {:?}",
                config.engine
            );
        }
        load_or_default!(engine.get("variance"), config.engine.variance, "engine.variance");
        load_or_default!(engine.get("r_squared"), config.engine.r_squared, "engine.r_squared");
        load_or_default!(
            engine.get("determinant"),
            config.engine.determinant,
            "engine.determinant"
        );
        load_or_default!(
            engine.get("laplace_max_order"),
            config.engine.laplace_max_order,
            "engine.laplace_max_order"
        );
    }
    load_or_default!(partial.get("pretty"), config.pretty, "pretty");
    load_or_default!(partial.get("max_elements"), config.max_elements, "max_elements");

    Ok(config)
}

impl CliConfig {
    /// Resolve the configuration from an optional file plus command-line overrides.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                log::info!("[Calc::Config] Using config: {:?}", path);
                load_cli_config(path)?
            }
            None => CliConfig::default(),
        };

        if let Some(variance) = matches.get_one::<String>("variance") {
            config.engine.variance =
                VarianceConvention::from_str(variance).map_err(anyhow::Error::msg)?;
        }
        if let Some(policy) = matches.get_one::<String>("r_squared") {
            config.engine.r_squared =
                RSquaredPolicy::from_str(policy).map_err(anyhow::Error::msg)?;
        }
        if let Some(method) = matches.get_one::<String>("determinant") {
            config.engine.determinant =
                DeterminantMethod::from_str(method).map_err(anyhow::Error::msg)?;
        }
        if let Some(limit) = matches.get_one::<usize>("max_elements") {
            config.max_elements = Some(*limit);
        }
        if matches.get_flag("pretty") {
            config.pretty = true;
        }

        Ok(config)
    }
}
