//! HVAC building simulator entry point: CLI wiring and config-driven runs.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use hvac_sim::config::ScenarioConfig;
use hvac_sim::io::export::{export_csv, export_samples_csv};
use hvac_sim::runner::run_scenario;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    telemetry_out: Option<String>,
    samples_out: Option<String>,
    quiet: bool,
}

fn print_help() {
    eprintln!("hvac-sim: single-zone building and HVAC simulator");
    eprintln!();
    eprintln!("Usage: hvac-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --telemetry-out <path>   Export step results to CSV");
    eprintln!("  --samples-out <path>     Export per-second samples to CSV");
    eprintln!("  --quiet                  Skip per-step output");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the winter_day preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

fn next_value(args: &[String], i: &mut usize, flag: &str, what: &str) -> String {
    *i += 1;
    if *i >= args.len() {
        eprintln!("error: {flag} requires a {what} argument");
        process::exit(1);
    }
    args[*i].clone()
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        telemetry_out: None,
        samples_out: None,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(next_value(&args, &mut i, "--scenario", "path"));
            }
            "--preset" => {
                cli.preset = Some(next_value(&args, &mut i, "--preset", "name"));
            }
            "--seed" => {
                let raw = next_value(&args, &mut i, "--seed", "u64");
                if let Ok(s) = raw.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                cli.telemetry_out = Some(next_value(&args, &mut i, "--telemetry-out", "path"));
            }
            "--samples-out" => {
                cli.samples_out = Some(next_value(&args, &mut i, "--samples-out", "path"));
            }
            "--quiet" | "-q" => cli.quiet = true,
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

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // --scenario takes priority, then --preset, then winter_day
    let mut scenario = if let Some(ref path) = cli.scenario_path {
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
        ScenarioConfig::winter_day()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let run = match run_scenario(&scenario) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if !cli.quiet {
        for r in &run.results {
            println!("{r}");
        }
    }

    println!("\n{}", run.summary);
    println!("\n{}", run.kpi);

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&run.results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    if let Some(ref path) = cli.samples_out {
        let Some(ref tracker) = run.samples else {
            eprintln!("error: --samples-out needs building.track_samples = true");
            process::exit(1);
        };
        if let Err(e) = export_samples_csv(tracker, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Samples written to {path}");
    }
}
