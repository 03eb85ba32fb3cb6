use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use calc_cli::config::CliConfig;
use calc_cli::evaluate::{render, run_batch, run_eval, write_output};

fn engine_args() -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Path to a JSON configuration file")
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
        Arg::new("output_file")
            .short('o')
            .long("output")
            .help("Path to write the JSON result. Defaults to stdout.")
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
        Arg::new("variance")
            .long("variance")
            .help("Variance convention for std_dev. Overrides the configuration file.")
            .value_parser(["population", "sample"])
            .value_hint(ValueHint::Other),
        Arg::new("r_squared")
            .long("r-squared")
            .help("r-squared reported when every y value is identical.")
            .value_parser(["zero", "perfect_fit"])
            .value_hint(ValueHint::Other),
        Arg::new("determinant")
            .long("determinant")
            .help("Determinant algorithm.")
            .value_parser(["auto", "laplace", "lu"])
            .value_hint(ValueHint::Other),
        Arg::new("max_elements")
            .long("max-elements")
            .help("Reject requests carrying more than this many values.")
            .value_parser(clap::value_parser!(usize)),
        Arg::new("pretty")
            .long("pretty")
            .help("Pretty-print JSON output.")
            .action(ArgAction::SetTrue),
    ]
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CALC_LOG", "error,calc=info"))
        .init();

    let matches = Command::new("calc")
        .version(clap::crate_version!())
        .about("Calculator CLI - arithmetic, statistics, matrix algebra and linear regression")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("eval")
                .about("Evaluate a single calculation request")
                .arg(
                    Arg::new("request")
                        .help("Path to the JSON request file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .args(engine_args()),
        )
        .subcommand(
            Command::new("batch")
                .about("Evaluate a JSON array of independent requests in parallel")
                .arg(
                    Arg::new("requests")
                        .help("Path to the JSON file holding an array of requests")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .args(engine_args()),
        )
        .subcommand(Command::new("config").about("Print the default configuration as JSON"))
        .get_matches();

    match matches.subcommand() {
        Some(("eval", sub_m)) => handle_eval(sub_m),
        Some(("batch", sub_m)) => handle_batch(sub_m),
        Some(("config", _)) => {
            let default_json = render(&CliConfig::default(), true)?;
            write_output(&default_json, None)
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_eval(matches: &ArgMatches) -> Result<()> {
    let request_path: &PathBuf = matches
        .get_one("request")
        .ok_or_else(|| anyhow::anyhow!("missing request path"))?;
    let output_path: Option<&PathBuf> = matches.get_one("output_file");
    log::info!("[Calc::Eval] Evaluating request: {:?}", request_path);

    let config = CliConfig::from_arguments(matches.get_one::<PathBuf>("config"), matches)?;
    let entry = run_eval(request_path, &config)?;
    write_output(&render(&entry, config.pretty)?, output_path.map(PathBuf::as_path))?;

    if entry.is_failure() {
        log::error!("[Calc::Eval] Request failed");
        std::process::exit(2);
    }
    Ok(())
}

fn handle_batch(matches: &ArgMatches) -> Result<()> {
    let requests_path: &PathBuf = matches
        .get_one("requests")
        .ok_or_else(|| anyhow::anyhow!("missing requests path"))?;
    let output_path: Option<&PathBuf> = matches.get_one("output_file");

    let config = CliConfig::from_arguments(matches.get_one::<PathBuf>("config"), matches)?;
    let entries = run_batch(requests_path, &config)?;
    write_output(&render(&entries, config.pretty)?, output_path.map(PathBuf::as_path))
}
