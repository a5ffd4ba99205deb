//! `estimate` - command-line front end for the design estimate engine

mod commands;
mod config;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use config::{CliConfig, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let json_flag = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON");

    Command::new("estimate")
        .version(estimate_core::VERSION)
        .about("Design task estimation: scoring, hints and vote aggregation")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("score")
                .about("Score a JSON factor selection")
                .arg(
                    Arg::new("factors")
                        .long("factors")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the selection, or - for stdin"),
                )
                .arg(json_flag.clone()),
        )
        .subcommand(
            Command::new("convert")
                .about("Hours bucket and T-shirt size for a point value")
                .arg(
                    Arg::new("points")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(json_flag.clone()),
        )
        .subcommand(
            Command::new("hints")
                .about("Points each option adds over the neutral selection")
                .arg(
                    Arg::new("kind")
                        .value_parser(commands::KIND_NAMES)
                        .help("Limit to one factor kind"),
                )
                .arg(json_flag.clone()),
        )
        .subcommand(
            Command::new("aggregate")
                .about("Summarize a JSON list of stored votes")
                .arg(
                    Arg::new("votes")
                        .long("votes")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the vote list, or - for stdin"),
                )
                .arg(json_flag.clone()),
        )
        .subcommand(
            Command::new("finalize")
                .about("Task total from a base estimate")
                .arg(
                    Arg::new("base")
                        .long("base")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("buffer")
                        .long("buffer")
                        .default_value("0")
                        .value_parser(value_parser!(f64))
                        .help("Meeting buffer fraction"),
                )
                .arg(
                    Arg::new("multiplier")
                        .long("multiplier")
                        .default_value("1")
                        .value_parser(value_parser!(f64))
                        .help("Iteration multiplier"),
                ),
        )
        .subcommand(
            Command::new("code").about("Generate session codes").arg(
                Arg::new("count")
                    .long("count")
                    .default_value("1")
                    .value_parser(value_parser!(usize)),
            ),
        )
        .subcommand(
            Command::new("catalog")
                .about("List every factor catalog")
                .arg(json_flag),
        )
        .subcommand(Command::new("demo").about("Run one estimation round in memory"))
}

fn format_for(args: &ArgMatches, config: &CliConfig) -> OutputFormat {
    if args.get_flag("json") {
        OutputFormat::Json
    } else {
        config.output
    }
}

async fn run(matches: &ArgMatches, config: CliConfig) -> anyhow::Result<String> {
    let output = match matches.subcommand() {
        Some(("score", args)) => {
            let path = args
                .get_one::<PathBuf>("factors")
                .ok_or_else(|| anyhow::anyhow!("--factors is required"))?;
            commands::estimate(&commands::read_input(path)?, format_for(args, &config))?
        }
        Some(("convert", args)) => {
            let points = args.get_one::<u32>("points").copied().unwrap_or_default();
            commands::convert(points, format_for(args, &config))?
        }
        Some(("hints", args)) => {
            let kind = args
                .get_one::<String>("kind")
                .and_then(|name| commands::parse_kind(name));
            commands::hints(kind, format_for(args, &config))?
        }
        Some(("aggregate", args)) => {
            let path = args
                .get_one::<PathBuf>("votes")
                .ok_or_else(|| anyhow::anyhow!("--votes is required"))?;
            commands::aggregate_votes(&commands::read_input(path)?, format_for(args, &config))?
        }
        Some(("finalize", args)) => {
            let base = args.get_one::<u32>("base").copied().unwrap_or_default();
            let buffer = args.get_one::<f64>("buffer").copied().unwrap_or(0.0);
            let multiplier = args.get_one::<f64>("multiplier").copied().unwrap_or(1.0);
            commands::finalize(base, buffer, multiplier)?
        }
        Some(("code", args)) => {
            commands::codes(args.get_one::<usize>("count").copied().unwrap_or(1))
        }
        Some(("catalog", args)) => commands::catalog(format_for(args, &config))?,
        Some(("demo", _)) => commands::demo(config.service).await?,
        _ => String::new(),
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => match CliConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err:#}");
                return ExitCode::FAILURE;
            }
        },
        None => CliConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&matches, config).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn json_flag_overrides_config() {
        let matches = cli().get_matches_from(["estimate", "convert", "7", "--json"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(format_for(args, &CliConfig::default()), OutputFormat::Json);
    }

    #[test]
    fn config_format_is_the_fallback() {
        let matches = cli().get_matches_from(["estimate", "catalog"]);
        let (_, args) = matches.subcommand().unwrap();
        let config = CliConfig {
            output: OutputFormat::Json,
            ..CliConfig::default()
        };
        assert_eq!(format_for(args, &config), OutputFormat::Json);
    }

    #[tokio::test]
    async fn finalize_defaults_to_no_adjustment() {
        let matches = cli().get_matches_from(["estimate", "finalize", "--base", "13"]);
        let out = run(&matches, CliConfig::default()).await.unwrap();
        assert_eq!(out, "13 pts (3-5 days, size M)");
    }
}
