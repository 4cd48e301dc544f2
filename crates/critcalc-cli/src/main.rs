// ABOUTME: Command-line interface for the critcalc damage simulator.
// ABOUTME: Layers defaults, an optional JSON scenario file and flags, then prints statistics.

use clap::Parser;
use critcalc::{AdvantageMode, SimConfig, Simulation, StatsBundle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "critcalc")]
#[command(about = "Estimate hit rates and expected damage for d20 attacks")]
#[command(version)]
struct Cli {
    /// Damage expression (e.g., "2D8+10+4+1D6")
    #[arg(short, long, allow_hyphen_values = true)]
    damage: Option<String>,

    /// Attack bonus on top of the d20 (e.g., "-5+1D4+4")
    #[arg(short, long, allow_hyphen_values = true)]
    attack: Option<String>,

    /// Target defense (armor class)
    #[arg(short = 't', long = "ac")]
    target_defense: Option<i64>,

    /// Advantage mode: none, advantage or disadvantage
    #[arg(long)]
    advantage: Option<AdvantageMode>,

    /// Lowest natural roll that counts as a critical
    #[arg(short, long)]
    crit: Option<u32>,

    /// Number of trials to run
    #[arg(short, long)]
    n: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// JSON scenario file; flags override its fields
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Split the run into chunks of this many trials across threads
    #[arg(long)]
    chunk: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = Simulation::new(config).and_then(|sim| {
        let stats = match cli.chunk {
            Some(chunk) => sim.run_parallel(chunk)?,
            None => sim.run(),
        };
        Ok((sim, stats))
    });

    match result {
        Ok((sim, stats)) => {
            if cli.json {
                print_json(sim.config(), &stats);
            } else {
                print_report(&sim, &stats);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` wins when it is set and valid; otherwise `-v` picks the level.
fn env_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "warn" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

fn build_config(cli: &Cli) -> Result<SimConfig, String> {
    let mut config = match &cli.scenario {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {}", path.display(), e))?;
            serde_json::from_str(&text).map_err(|e| format!("parsing {}: {}", path.display(), e))?
        }
        None => SimConfig::default(),
    };

    if let Some(damage) = &cli.damage {
        config.damage_expression = damage.clone();
    }
    if let Some(attack) = &cli.attack {
        config.attack_expression = attack.clone();
    }
    if let Some(target_defense) = cli.target_defense {
        config.target_defense = target_defense;
    }
    if let Some(advantage) = cli.advantage {
        config.advantage = advantage;
    }
    if let Some(crit) = cli.crit {
        config.crit_threshold = crit;
    }
    if let Some(n) = cli.n {
        config.trials = n;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn print_json(config: &SimConfig, stats: &StatsBundle) {
    use serde_json::json;

    let output = json!({
        "config": config,
        "stats": stats,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(sim: &Simulation, stats: &StatsBundle) {
    let config = sim.config();
    println!(
        "1D20 + {} ({}) vs AC {}, crit on {}+, n={}",
        sim.attack(),
        config.advantage,
        config.target_defense,
        config.crit_threshold,
        stats.trials
    );
    println!("damage: {}", sim.damage());
    println!();
    println!("hit rate:            {:6.2}%", stats.hit_rate * 100.0);
    println!("crit rate:           {:6.2}%", stats.crit_rate * 100.0);
    println!("fumble rate:         {:6.2}%", stats.fumble_rate * 100.0);
    println!();
    println!("mean damage (all):   {:8.2}", stats.mean_damage_all);
    println!("mean damage (hit):   {:8.2}", stats.mean_damage_on_hit);
    println!("mean damage (crit):  {:8.2}", stats.mean_damage_on_crit);
    println!("expected damage:     {:8.2}", stats.expected_damage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_hyphenated_expressions() {
        let cli = Cli::try_parse_from(["critcalc", "-d", "-2+1D6", "-a", "-5+1D4+4"]).unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.damage_expression, "-2+1D6");
        assert_eq!(config.attack_expression, "-5+1D4+4");
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "critcalc", "--ac", "18", "--advantage", "adv", "-c", "19", "-n", "500", "--seed", "3",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.target_defense, 18);
        assert_eq!(config.advantage, AdvantageMode::Advantage);
        assert_eq!(config.crit_threshold, 19);
        assert_eq!(config.trials, 500);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_rust_log_takes_precedence() {
        let filter = env_filter(Some("debug"), false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(env_filter(None, false).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(env_filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            env_filter(Some("critcalc=verbose"), false).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
