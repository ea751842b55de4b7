use clap::Parser;
use mcts::games::othello::OthelloState;
use mcts::games::tictactoe::TicTacToeState;
use mcts::games::GameKind;
use mcts::{GameState, MonteCarloEngine, SearchConfig, SearchStatistics};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game to search from its opening position
    #[arg(short, long, value_enum, default_value_t = GameKind::Othello)]
    game: GameKind,

    /// Search duration in seconds (default: 5)
    #[arg(long, default_value_t = 5)]
    duration: u64,

    /// Exploration constant of the UCB1 weight
    #[arg(long, default_value_t = std::f64::consts::SQRT_2)]
    exploration_parameter: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Monte Carlo Games - Benchmark Tool");
    println!("==================================");
    println!("Game: {}", args.game);
    println!("Duration: {} seconds", args.duration);
    println!("Exploration: {:.3}", args.exploration_parameter);
    println!("----------------------------------");

    #[cfg(debug_assertions)]
    println!("WARNING: Running in debug mode. Performance will be significantly lower.\nUse --release for accurate benchmarks.\n");

    let mut config = SearchConfig::default()
        .with_decision_time(Duration::from_secs(args.duration))
        .with_exploration(args.exploration_parameter);
    config.seed = args.seed;

    match args.game {
        GameKind::TicTacToe => bench(TicTacToeState::new(), config),
        GameKind::Othello => bench(OthelloState::new(), config),
    }
}

fn bench<S: GameState>(state: S, config: SearchConfig) -> anyhow::Result<()> {
    let mut engine = MonteCarloEngine::new(state, config);
    let best = engine.get_move()?;

    match engine.last_search() {
        Some(stats) => print_stats(&stats, engine.root().subtree_size()),
        None => println!("No search was needed from this position."),
    }
    if let Some(best) = best {
        println!("  Best Move: {}", best);
    }
    Ok(())
}

fn print_stats(stats: &SearchStatistics, nodes: usize) {
    let secs = stats.elapsed.as_secs_f64();
    let sps = if secs > 0.0 { stats.iterations as f64 / secs } else { 0.0 };

    println!("Results:");
    println!("  Tree Nodes: {}", nodes);
    println!("  Time: {:.3}s", secs);
    println!("  SPS: {:.0} sims/sec", sps);
    println!("  Root Visits: {}", stats.root_trials);
}
