use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use towercash_simulator::{Report, Simulator};
use towercash_types::Settings;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to play.
    #[arg(short, long, default_value_t = 100)]
    games: u32,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Play with the event layout and minigames.
    #[arg(short, long)]
    event_mode: bool,

    /// YAML settings file. Built-in layouts are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chance of starting another round after each round ends.
    #[arg(long, default_value_t = 0.6)]
    continue_chance: f64,

    /// Distinct players sharing the games.
    #[arg(short, long, default_value_t = 4)]
    players: u32,

    #[arg(long, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn print_text(report: &Report) {
    println!("games:        {}", report.games);
    println!("wins:         {}", report.wins);
    println!("days:         {}", report.days);
    println!("average:      ${}", report.average_score());
    println!("best:         ${}", report.best_score);
    println!("floors:       {}", report.floors_completed);
    for (reason, count) in &report.end_reasons {
        println!("  {reason:<12} {count}");
    }
    println!("leaderboard:");
    for entry in &report.leaderboard {
        println!(
            "  #{:<3} {:<12} ${:<10} {} wins",
            entry.rank, entry.username, entry.highest_score, entry.total_wins
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    // Load settings
    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let mut simulator = Simulator::new(settings, args.seed, args.continue_chance)
        .context("invalid simulator arguments")?;
    if args.event_mode {
        simulator.set_event_mode(true).await;
    }
    info!(games = args.games, seed = args.seed, "simulating");
    let report = simulator
        .run(args.games, args.players)
        .await
        .context("simulation failed")?;

    match args.format {
        Format::Text => print_text(&report),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        ),
        Format::Yaml => print!(
            "{}",
            serde_yaml::to_string(&report).context("failed to encode report")?
        ),
    }
    Ok(())
}
