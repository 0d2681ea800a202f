//! Main entry point for the Swiss Room tournament runner
//!
//! Signs up a roster, plays a number of Swiss rounds with random outcomes
//! against in-memory storage, and prints each round's pairings and the final
//! standings.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use swiss_room::config::AppConfig;
use swiss_room::service::{simulate_rounds, RandomResults, RoundReport, Roster};
use swiss_room::utils::{format_pairings, format_standings};
use swiss_room::{InMemoryTournamentStorage, Standing, TournamentDirector};
use tracing::{error, info};

/// Swiss Room - Swiss-system tournament pairing
#[derive(Parser)]
#[command(
    name = "swiss-room",
    version,
    about = "Run Swiss-system tournament rounds with standings-ordered pairing",
    long_about = "Swiss Room registers a roster of players, pairs each round by standings \
                 without rematches, hands out at most one bye per player, and records \
                 simulated results until the requested rounds are played or no full round \
                 can be formed."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Roster file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to roster file (TOML, [[players]] tables); a demo roster is used when absent"
    )]
    roster: Option<PathBuf>,

    /// Tournament override
    #[arg(short, long, value_name = "CODE", help = "Override tournament code")]
    tournament: Option<String>,

    /// Round count override
    #[arg(long, value_name = "N", help = "Override number of rounds to play")]
    rounds: Option<u32>,

    /// Seed override
    #[arg(long, value_name = "SEED", help = "Seed for simulated match outcomes")]
    seed: Option<u64>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Emit JSON instead of text
    #[arg(long, help = "Print round reports and standings as JSON")]
    json: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without playing")]
    dry_run: bool,
}

#[derive(Serialize)]
struct TournamentSummary<'a> {
    tournament: &'a str,
    rounds: &'a [RoundReport],
    standings: &'a [Standing],
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(tournament) = &args.tournament {
        config.simulation.tournament = tournament.clone();
    }
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }

    swiss_room::config::validate_config(&config)?;
    Ok(config)
}

fn print_round(number: usize, report: &RoundReport) {
    println!("<::: Round {} pairings :::>", number);
    print!("{}", format_pairings(&report.pairing.pairings));
    if !report.pairing.is_complete() {
        println!(
            "Round could not be completed ({}).",
            if report.committed {
                "partial results recorded"
            } else {
                "nothing recorded"
            }
        );
    }
    println!();
}

async fn run(config: &AppConfig, args: &Args) -> Result<()> {
    let tournament = config.simulation.tournament.as_str();
    let storage = Arc::new(InMemoryTournamentStorage::with_rematches(
        config.pairing.allow_rematches,
    ));
    let director = TournamentDirector::new(storage, config);

    let roster = match &args.roster {
        Some(path) => {
            info!("Loading roster from: {}", path.display());
            Roster::from_file(path)?
        }
        None => Roster::demo(tournament),
    };
    roster.sign_up(&director, tournament).await?;
    info!(
        "{} players are registered for tournament {}",
        director.count_players(Some(tournament)).await?,
        tournament
    );

    let mut results = RandomResults::new(config.simulation.seed);
    let reports = simulate_rounds(
        &director,
        tournament,
        config.simulation.rounds,
        &mut results,
    )
    .await?;
    let standings = director.standings(tournament).await?;

    if args.json {
        let summary = TournamentSummary {
            tournament,
            rounds: &reports,
            standings: &standings,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for (i, report) in reports.iter().enumerate() {
            print_round(i + 1, report);
        }
        println!("<::: Standings for {} :::>", tournament);
        print!("{}", format_standings(&standings));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Swiss Room tournament runner");
    info!("   Service: {}", config.service.name);
    info!("   Tournament: {}", config.simulation.tournament);
    info!("   Rounds: {}", config.simulation.rounds);
    info!("   Tie break: {:?}", config.pairing.tie_break);

    if args.dry_run {
        info!("Dry run completed - exiting without playing");
        return Ok(());
    }

    if let Err(e) = run(&config, &args).await {
        error!("Tournament run failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
