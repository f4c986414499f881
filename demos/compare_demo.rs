// Demonstration: head-to-head comparison of two algorithms over repeated trials.
//
// Build/run from this repo root:
//   cargo run --release --features parallel --example compare_demo -- --algorithms qlearning,sarsa --repeats 10

use std::env;

use gridlearn::agents::{AgentParams, Algorithm};
use gridlearn::training::{compare, AlgorithmSummary, ComparisonConfig};
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
    let algorithms = match parse_pair(arg_value(&args, "--algorithms").unwrap_or("qlearning,sarsa")) {
        Some(pair) => pair,
        None => {
            eprintln!("--algorithms expects two names separated by a comma, e.g. 'qlearning,montecarlo'.");
            std::process::exit(2);
        }
    };
    let defaults = ComparisonConfig::default();
    let config = ComparisonConfig {
        algorithms,
        repeats: parsed(&args, "--repeats").unwrap_or(defaults.repeats),
        episodes: parsed(&args, "--episodes").unwrap_or(defaults.episodes),
        size: parsed(&args, "--size").unwrap_or(defaults.size),
        params: AgentParams {
            epsilon: parsed(&args, "--epsilon").unwrap_or(defaults.params.epsilon),
            ..defaults.params
        },
        seed: parsed(&args, "--seed").unwrap_or(defaults.seed),
        ..defaults
    };

    let report = compare(&config)?;
    println!(
        "{} repeats x {} episodes on a {}x{} grid",
        report.repeats, report.episodes, config.size, config.size
    );
    for summary in &report.summaries {
        print_summary(summary);
    }
    Ok(())
}

fn print_summary(s: &AlgorithmSummary) {
    let last = s.rewards_per_episode.len().saturating_sub(20);
    let tail_success = &s.success_per_episode[last..];
    let tail_rate = tail_success.iter().sum::<f64>() / tail_success.len().max(1) as f64;
    println!();
    println!("{}", s.algorithm.label());
    println!("  converged at (per trial): {:?}", s.converge_episodes);
    match s.avg_converge {
        Some(avg) => println!("  mean convergence episode: {avg:.1}"),
        None => println!("  mean convergence episode: n/a"),
    }
    match s.avg_steps_when_success {
        Some(steps) => println!("  mean steps when successful (final window): {steps:.2}"),
        None => println!("  mean steps when successful (final window): n/a"),
    }
    println!("  success rate over last 20 episodes: {tail_rate:.2}");
}

fn parse_pair(value: &str) -> Option<[Algorithm; 2]> {
    let mut names = value.split(',');
    let first = names.next()?.parse().ok()?;
    let second = names.next()?.parse().ok()?;
    names.next().is_none().then_some([first, second])
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_shows_crate_debug() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::DEBUG)
        );
    }
}
