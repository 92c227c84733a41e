use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use holdem_engine::agents::{AgentTable, PassiveAgent, RandomAgent};
use holdem_engine::config::TableConfig;
use holdem_engine::deck::SeededDeckSource;
use holdem_engine::game::{HandOutcome, Table};
use holdem_engine::player::PlayerId;
use holdem_engine::stats::StatTracker;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// Nine-handed 1/2 with a 1 chip ante
    Low,
    /// Heads-up 10/20 with a 1 chip ante
    HeadsUp,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Random,
    Passive,
}

#[derive(Parser)]
#[command(name = "holdem-sim")]
#[command(about = "Play seeded no-limit hold'em cash game hands between bots", version)]
struct Cli {
    /// Players to seat (capped by the table's seat count)
    #[arg(short, long, default_value_t = 6)]
    players: usize,
    /// Maximum number of hands to play
    #[arg(short = 'n', long, default_value_t = 100)]
    hands: usize,
    /// Seed for the deck and the bots
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// TOML table config; overrides --preset
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Built-in stakes
    #[arg(long, value_enum)]
    preset: Option<Preset>,
    /// Buy-in in chips (defaults to the table maximum)
    #[arg(long)]
    buy_in: Option<u64>,
    #[arg(long, value_enum, default_value = "random")]
    strategy: Strategy,
    /// Print every hand history line
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match (&cli.config, cli.preset) {
        (Some(path), _) => TableConfig::load(path)?,
        (None, Some(Preset::Low)) => TableConfig::low(),
        (None, Some(Preset::HeadsUp)) => TableConfig::heads_up(),
        (None, None) => TableConfig::default(),
    };
    let buy_in = cli.buy_in.unwrap_or_else(|| config.max_buy_in_chips());
    let seats = cli.players.min(config.max_seats);

    let mut table = Table::new(config, SeededDeckSource::new(cli.seed))?;
    let mut agents = AgentTable::for_seats(seats);
    for i in 0..seats {
        let id = table.seat_player(format!("bot{i}"), buy_in)?;
        match cli.strategy {
            Strategy::Random => agents.set_agent(id, Some(Box::new(RandomAgent::new(cli.seed ^ (i as u64 + 1))))),
            Strategy::Passive => agents.set_agent(id, Some(Box::new(PassiveAgent))),
        }
    }

    println!("holdem-sim {} | {} players | seed {}", holdem_engine::VERSION, seats, cli.seed);
    let summaries = table.run(&mut agents, cli.hands)?;
    let mut stats = StatTracker::new();
    for summary in &summaries {
        stats.observe(summary);
        let how = match summary.outcome {
            HandOutcome::Showdown => "showdown",
            HandOutcome::HiddenEnd => "uncontested",
        };
        let winners: Vec<String> = summary.winners().iter().map(PlayerId::to_string).collect();
        println!(
            "hand #{:<4} {:<11} board {:<16} won by {}",
            summary.hand_number,
            how,
            summary.board.to_string(),
            winners.join(", ")
        );
        if cli.verbose {
            for entry in summary.history.entries() {
                println!("    {entry}");
            }
        }
        for seat in &summary.busted {
            println!("    {seat} is out");
        }
    }

    println!("\nafter {} hands:", summaries.len());
    for p in table.players() {
        println!("  {:<6} {:>6}", p.name(), p.stack());
    }
    println!("\nstats:");
    for (name, s) in stats.players() {
        println!("  {name:<6} {s}");
    }
    Ok(())
}
