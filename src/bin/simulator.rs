//! MathQuest headless battle balance simulator
//!
//! Fights scripted battles with the real battle engine and reports win rate,
//! battle length, damage taken and leveling pace.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N          Campaigns to simulate (default: 100)
//!   --battles N       Battles per campaign (default: 20)
//!   --seed N          RNG seed (default: random)
//!   --grade N         Grade 1-12 (default: 3)
//!   --difficulty D    easy | medium | hard | nightmare (default: medium)
//!   --accuracy P      Chance of a correct answer, 0.0-1.0 (default: 0.8)
//!   --max-turns N     Player turns before a battle times out (default: 200)
//!   --verbose         Per-run logging
//!   --json            Print the report as JSON
//!   --quiet           Only final summary line

use mathquest::build_info::version_string;
use mathquest::simulator::{run_simulation, SimConfig};
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Summary,
}

struct CliArgs {
    config: SimConfig,
    format: OutputFormat,
}

enum Command {
    Run(CliArgs),
    Help,
    Version,
}

fn parse_value<T: FromStr>(flag: &str, value: Option<&String>) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse()
        .map_err(|e| format!("invalid value for {flag}: {value} ({e})"))
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut config = SimConfig::default();
    let mut format = OutputFormat::Text;
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--runs" => config.num_runs = parse_value(arg, iter.next())?,
            "--battles" => config.battles_per_run = parse_value(arg, iter.next())?,
            "--seed" => config.seed = Some(parse_value(arg, iter.next())?),
            "--grade" => config.grade = parse_value(arg, iter.next())?,
            "--difficulty" => config.difficulty = parse_value(arg, iter.next())?,
            "--accuracy" => {
                let accuracy: f64 = parse_value(arg, iter.next())?;
                if !(0.0..=1.0).contains(&accuracy) {
                    return Err(format!("--accuracy must be between 0 and 1, got {accuracy}"));
                }
                config.accuracy = accuracy;
            }
            "--max-turns" => config.max_turns_per_battle = parse_value(arg, iter.next())?,
            "--verbose" => config.verbosity = 2,
            "--json" => format = OutputFormat::Json,
            "--quiet" => {
                format = OutputFormat::Summary;
                config.verbosity = 0;
            }
            "--version" | "-V" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(Command::Run(CliArgs { config, format }))
}

fn print_usage() {
    eprintln!(
        "MathQuest Battle Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N          Campaigns to simulate (default: 100)\n\
         \x20 --battles N       Battles per campaign (default: 20)\n\
         \x20 --seed N          RNG seed (default: random)\n\
         \x20 --grade N         Grade 1-12 (default: 3)\n\
         \x20 --difficulty D    easy | medium | hard | nightmare (default: medium)\n\
         \x20 --accuracy P      Chance of a correct answer, 0.0-1.0 (default: 0.8)\n\
         \x20 --max-turns N     Player turns before a battle times out (default: 200)\n\
         \x20 --verbose         Per-run logging\n\
         \x20 --json            Print the report as JSON\n\
         \x20 --quiet           Only final summary line\n\
         \x20 --version, -V     Show build info\n\
         \x20 --help, -h        Show this help"
    );
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(Command::Run(cli)) => cli,
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("simulator {}", version_string());
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mathquest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let report = run_simulation(&cli.config);

    match cli.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Summary => println!("{}", report.summary_line()),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
