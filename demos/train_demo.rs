// Demonstration: train one agent on the grid world and print the learned policy.
//
// Build/run from this repo root:
//   cargo run --example train_demo -- --algorithm sarsa --episodes 300 --seed 7 --export runs/

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use gridlearn::agents::{Agent, AgentParams, Algorithm};
use gridlearn::environment::{Action, Cell, GridConfig};
use gridlearn::training::{export_csv, export_file_name, RunConfig, RunSnapshot, Trainer, TrainingError};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Used when `RUST_LOG` is unset; keeps per-episode `debug!` lines visible.
const DEFAULT_LOG_FILTER: &str = "gridlearn=debug,info";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let algorithm: Algorithm = match arg_value(&args, "--algorithm").unwrap_or("qlearning").parse() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}; expected one of qlearning, sarsa, montecarlo.");
            std::process::exit(2);
        }
    };
    let defaults = AgentParams::default();
    let config = RunConfig {
        algorithm,
        episodes: parsed(&args, "--episodes").unwrap_or(500),
        grid: GridConfig {
            size: parsed(&args, "--size").unwrap_or(5),
            ..GridConfig::default()
        },
        params: AgentParams {
            alpha: parsed(&args, "--alpha").unwrap_or(defaults.alpha),
            gamma: parsed(&args, "--gamma").unwrap_or(defaults.gamma),
            epsilon: parsed(&args, "--epsilon").unwrap_or(defaults.epsilon),
        },
        seed: parsed(&args, "--seed"),
        step_delay: parsed::<u64>(&args, "--pace-ms").map(Duration::from_millis),
        ..RunConfig::default()
    };
    let verbose = args.iter().any(|a| a == "--verbose");

    let mut runner = gridlearn::training::EpisodeRunner::new(config);
    Trainer::new().drive(&mut runner, |report| {
        if verbose || report.record.episode % 50 == 0 {
            println!("{report}");
        }
    })?;

    let snapshot = RunSnapshot::capture(&runner);
    println!();
    println!("Learned policy ({}):", runner.agent().algorithm().label());
    print_policy(&snapshot);

    let history = runner.history();
    println!();
    println!(
        "Success rate (last 20): {:.2} | mean reward (last 20): {:.2} | converged at: {}",
        history.success_rate_last(20),
        history.moving_average(20),
        history
            .first_converged
            .map_or_else(|| "never".to_string(), |e| e.to_string())
    );

    if let Some(dir) = arg_value(&args, "--export") {
        let path = Path::new(dir).join(export_file_name(history));
        match export_csv(history, BufWriter::new(File::create(&path)?)) {
            Ok(rows) => println!("Exported {rows} episodes to {}", path.display()),
            Err(TrainingError::NoRunData) => println!("{}", TrainingError::NoRunData),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn print_policy(snapshot: &RunSnapshot) {
    let policy = snapshot.policy();
    let size = snapshot.grid.size();
    for (row, cells) in snapshot.grid.rows().enumerate() {
        let line: String = cells
            .iter()
            .enumerate()
            .map(|(col, &blocked)| {
                let cell = Cell::new(row, col);
                if blocked {
                    '#'
                } else if cell == snapshot.goal {
                    'G'
                } else {
                    match policy.get(row * size + col).and_then(|&a| Action::try_from(a).ok()) {
                        Some(Action::Up) => '^',
                        Some(Action::Right) => '>',
                        Some(Action::Down) => 'v',
                        Some(Action::Left) => '<',
                        None => '?',
                    }
                }
            })
            .flat_map(|c| [c, ' '])
            .collect();
        println!("  {}", line.trim_end());
    }
}

fn parsed<T: std::str::FromStr>(args: &[String], key: &str) -> Option<T> {
    arg_value(args, key).and_then(|s| s.parse().ok())
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
