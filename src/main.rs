//! Occupancy synthesis entry point — CLI wiring and config-driven pipeline.

use std::path::Path;
use std::process;

use occ_synth::config::ScenarioConfig;
use occ_synth::io::export::{export_rules_csv, export_series_csv};
use occ_synth::schedule::aggregate::aggregate_occupancy;
use occ_synth::schedule::hours::spaces_hours_of_operation;
use occ_synth::schedule::synth::synthesize;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    series_out: Option<String>,
    rules_out: Option<String>,
}

fn print_help() {
    eprintln!("occ-synth — Multi-space occupancy schedule synthesizer");
    eprintln!();
    eprintln!("Usage: occ-synth [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>     Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --series-out <path> Export the aggregated hourly series to CSV");
    eprintln!("  --rules-out <path>  Export the synthesized calendar rules to CSV");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the office preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        series_out: None,
        rules_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--series-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --series-out requires a path argument");
                    process::exit(1);
                }
                cli.series_out = Some(args[i].clone());
            }
            "--rules-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --rules-out requires a path argument");
                    process::exit(1);
                }
                cli.rules_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    init_tracing();
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then office default
    let config = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::office()
    };

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build the store, spaces, and options
    let scenario = match config.build() {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    // Print the spaces' modal hours of operation
    match spaces_hours_of_operation(&scenario.spaces, &scenario.store, scenario.options.year) {
        Ok(Some(table)) => println!("{table}\n"),
        Ok(None) => println!("Hours of operation: indeterminate for every space\n"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    // Synthesize the occupancy schedule
    let schedule = match synthesize(&scenario.spaces, &scenario.store, &scenario.options) {
        Ok(schedule) => schedule,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    println!("{schedule}");

    // Export CSVs if requested
    if let Some(ref path) = cli.series_out {
        let aggregate =
            match aggregate_occupancy(&scenario.spaces, &scenario.store, scenario.options.year) {
                Ok(aggregate) => aggregate,
                Err(e) => {
                    eprintln!("error: {e}");
                    process::exit(1);
                }
            };
        if let Err(e) = export_series_csv(&aggregate.series, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Series written to {path}");
    }
    if let Some(ref path) = cli.rules_out {
        if let Err(e) = export_rules_csv(&schedule, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Rules written to {path}");
    }
}
