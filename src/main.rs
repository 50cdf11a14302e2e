//! CIVIC-CORE command-line entry point.
//!
//! ## CLI Subcommands
//!
//! - `civic-core-cli analyze <file>` - Rehydrate from a JSON export and report
//! - `civic-core-cli config show|defaults|validate` - Inspect configuration
//! - `civic-core-cli version` - Print the version

use std::path::Path;
use std::process::ExitCode;

use civic_core::cli::{config_cmd, flag_value, get_config_path, run_analyze, AnalyzeOptions};
use civic_core::graph::TraversalMode;
use civic_core::telemetry::init_logging;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let config_path = flag_value(&args, "--config")
        .map(std::path::PathBuf::from)
        .or_else(get_config_path);

    match command {
        "analyze" => {
            let file = match args.get(2).filter(|a| !a.starts_with("--")) {
                Some(file) => file,
                None => {
                    eprintln!("analyze requires an input file");
                    print_command_help("analyze");
                    return ExitCode::FAILURE;
                }
            };
            let config = match config_cmd::resolve(config_path.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load configuration: {}", e);
                    return ExitCode::from(2u8);
                }
            };
            if let Err(e) = init_logging(&config.logging) {
                eprintln!("Logging disabled: {}", e);
            }
            let mode = match flag_value(&args, "--mode").map(str::parse::<TraversalMode>) {
                Some(Ok(mode)) => Some(mode),
                Some(Err(e)) => {
                    eprintln!("{}", e);
                    return ExitCode::from(2u8);
                }
                None => None,
            };
            let options = AnalyzeOptions {
                seed: flag_value(&args, "--seed").map(str::to_string),
                mode,
                path_to: flag_value(&args, "--to").map(str::to_string),
            };
            let code = run_analyze(Path::new(file), config, &options);
            ExitCode::from(code as u8)
        }
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => ExitCode::from(config_cmd::run_show(config_path.as_deref()) as u8),
                "defaults" => {
                    config_cmd::run_defaults();
                    ExitCode::SUCCESS
                }
                "validate" => ExitCode::from(config_cmd::run_validate(config_path.as_deref()) as u8),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    ExitCode::FAILURE
                }
            }
        }
        "help" | "--help" | "-h" => {
            if let Some(subcommand) = args.get(2) {
                print_command_help(subcommand);
            } else {
                print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("CIVIC-CORE {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "CIVIC-CORE - service request relationship engine v{}

USAGE:
    civic-core-cli [COMMAND] [OPTIONS]

COMMANDS:
    analyze      Build the relationship graph from a JSON export and report it
    config       Inspect configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

OPTIONS:
    --config FILE  Load configuration from a TOML file

ENVIRONMENT:
    CIVIC_CORE_CONFIG              TOML config file (same as --config)
    CIVIC_CORE_EDGE_THRESHOLD      Minimum relatedness score for an edge (default: 40)
    CIVIC_CORE_PROXIMITY_KM        Proximity radius in km (default: 1.0)
    CIVIC_CORE_TIME_WINDOW_HOURS   Submission time window (default: 24)
    CIVIC_CORE_PRIORITY_TOLERANCE  Priority gap for similarity (default: 1)
    CIVIC_CORE_LOG_LEVEL           Tracing filter (default: info)
    CIVIC_CORE_LOG_FORMAT          json or pretty (default: json)

EXIT CODES:
    0  Success
    1  Failure / configuration warnings
    2  Invalid input or configuration
",
        version
    );
}

/// Print detailed help for a specific command.
fn print_command_help(command: &str) {
    match command {
        "analyze" => {
            eprintln!(
                "civic-core-cli analyze - Report the relationship graph

USAGE:
    civic-core-cli analyze FILE [--seed ID] [--mode bfs|dfs|priority] [--to ID]

OPTIONS:
    --seed ID   Include related requests and the impact cluster for ID
    --mode M    Traversal order for related requests (default: bfs)
    --to ID     Include the shortest path from the seed to ID

DESCRIPTION:
    FILE is a JSON array of request records. Records are replayed in
    submission order, then nodes, edges and connected components are
    printed as JSON on stdout.
"
            );
        }
        "config" => {
            eprintln!(
                "civic-core-cli config - Inspect configuration

USAGE:
    civic-core-cli config [show|defaults|validate] [--config FILE]

SUBCOMMANDS:
    show      Print effective values (environment or FILE)
    defaults  Print built-in defaults
    validate  Exit 1 if the configuration produces a degenerate graph
"
            );
        }
        _ => print_usage(),
    }
}
