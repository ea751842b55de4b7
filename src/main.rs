//! # Monte Carlo Games
//!
//! This is the main entry point for playing tic-tac-toe and Othello against a
//! Monte Carlo Tree Search (MCTS) opponent, watching two engines play each
//! other, or running a batch of engine-vs-engine games.
//!
//! ## Features
//! - Human or AI control for each side
//! - Configurable thinking time and exploration constant
//! - Saving and replaying game transcripts
//! - Parallel AI-vs-AI arena
//!
//! ## Usage
//! Run with `cargo run --release -- --game othello --mode human-vs-ai` for best performance.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use mcts::arena::{run_arena, ArenaConfig};
use mcts::game_controller::{play_game, GameController, GameStatus};
use mcts::games::othello::OthelloState;
use mcts::games::tictactoe::TicTacToeState;
use mcts::games::GameKind;
use mcts::player::{HumanPlayer, MonteCarloPlayer, Player};
use mcts::transcript::Transcript;
use mcts::{GameState, Outcome, SearchConfig, FIRST_PLAYER, SECOND_PLAYER};

/// Who controls each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    AiVsAi,
    HumanVsAi,
    AiVsHuman,
    HumanVsHuman,
}

impl Mode {
    fn is_human(self, side: i32) -> bool {
        match self {
            Mode::AiVsAi => false,
            Mode::HumanVsAi => side == FIRST_PLAYER,
            Mode::AiVsHuman => side == SECOND_PLAYER,
            Mode::HumanVsHuman => true,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game to play
    #[arg(short, long, value_enum, default_value_t = GameKind::TicTacToe)]
    game: GameKind,

    /// Who controls each side; the first named side moves first
    #[arg(short, long, value_enum, default_value_t = Mode::HumanVsAi)]
    mode: Mode,

    /// Thinking time per AI move in milliseconds
    #[arg(short = 't', long, default_value_t = 2000)]
    decision_time_ms: u64,

    /// Exploration constant of the UCB1 weight
    #[arg(short = 'e', long, default_value_t = std::f64::consts::SQRT_2)]
    exploration_parameter: f64,

    /// Stop each AI search after this many simulations
    #[arg(short = 'i', long)]
    max_iterations: Option<u64>,

    /// Seed for the AI's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Write the finished game as a JSON transcript
    #[arg(long)]
    save: Option<PathBuf>,

    /// Replay a saved transcript instead of playing
    #[arg(long, conflicts_with_all = ["save", "arena"])]
    replay: Option<PathBuf>,

    /// Play this many AI-vs-AI games in parallel and report the tally
    #[arg(long)]
    arena: Option<usize>,

    /// Worker threads for the arena (0 = one per CPU)
    #[arg(short = 'n', long, default_value_t = 0)]
    num_threads: usize,

    /// Log search statistics
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

impl Args {
    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default()
            .with_decision_time(Duration::from_millis(self.decision_time_ms))
            .with_exploration(self.exploration_parameter);
        config.max_iterations = self.max_iterations;
        config.seed = self.seed;
        config
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(path) = &args.replay {
        return replay(path);
    }

    if let Some(games) = args.arena {
        return arena(&args, games);
    }

    match args.game {
        GameKind::TicTacToe => play(&args, TicTacToeState::new()),
        GameKind::Othello => play(&args, OthelloState::new()),
    }
}

fn play<S>(args: &Args, initial: S) -> anyhow::Result<()>
where
    S: GameState + 'static,
    S::Move: FromStr,
{
    let kind = args.game;
    let config = args.search_config();

    let mut seats: Vec<Box<dyn Player<S>>> = Vec::new();
    for side in [FIRST_PLAYER, SECOND_PLAYER] {
        if args.mode.is_human(side) {
            let name = kind.player_name(side);
            seats.push(Box::new(HumanPlayer::new(side, name, io::stdin(), io::stdout())));
        } else {
            seats.push(Box::new(MonteCarloPlayer::new(side, initial.clone(), config.clone())));
        }
    }
    let mut players: Vec<&mut dyn Player<S>> = Vec::with_capacity(seats.len());
    for seat in seats.iter_mut() {
        players.push(seat.as_mut());
    }

    println!("{}", format!("=== {} ===", kind).bold());
    println!("{}", initial);
    let controller = play_game(kind, initial, &mut players, |controller| {
        if let Some(last) = controller.history().last() {
            println!(
                "{} plays {}",
                kind.player_name(last.player).cyan(),
                last.move_made.to_string().bold()
            );
        }
        println!("{}", controller.state());
    })?;

    announce(&controller);
    println!("{}", controller.format_history());

    if let Some(path) = &args.save {
        Transcript::from_controller(&controller)
            .save(path)
            .with_context(|| format!("saving transcript to {}", path.display()))?;
    }
    Ok(())
}

fn announce<S: GameState>(controller: &GameController<S>) {
    let kind = controller.kind();
    match controller.status() {
        GameStatus::Finished(Outcome::Win(winner)) => {
            println!("{}", format!("{} wins!", kind.player_name(winner)).green().bold());
        }
        GameStatus::Finished(Outcome::Draw) => println!("{}", "The game is a draw!".yellow().bold()),
        GameStatus::InProgress => println!("{}", "The game was not finished.".red()),
    }
}

fn replay(path: &Path) -> anyhow::Result<()> {
    let transcript = Transcript::load(path)?;
    let kind = transcript.kind()?;
    println!("{}", format!("=== replaying {} ({} moves) ===", kind, transcript.moves.len()).bold());

    match kind {
        GameKind::TicTacToe => println!("{}", transcript.replay(TicTacToeState::new())?),
        GameKind::Othello => println!("{}", transcript.replay(OthelloState::new())?),
    }
    match transcript.outcome {
        Some(outcome) => println!("Recorded result: {:?}", outcome),
        None => println!("The recorded game was not finished."),
    }
    Ok(())
}

fn arena(args: &Args, games: usize) -> anyhow::Result<()> {
    let mut config = ArenaConfig::new(games, args.search_config());
    config.threads = args.num_threads;

    let summary = match args.game {
        GameKind::TicTacToe => run_arena(args.game, TicTacToeState::new, &config)?,
        GameKind::Othello => run_arena(args.game, OthelloState::new, &config)?,
    };

    let kind = args.game;
    println!("{}", format!("=== {} arena: {} games ===", kind, summary.games).bold());
    println!("{:>8} wins: {}", kind.player_name(FIRST_PLAYER), summary.first_player_wins.to_string().green());
    println!("{:>8} wins: {}", kind.player_name(SECOND_PLAYER), summary.second_player_wins.to_string().green());
    println!("{:>8}: {}", "draws", summary.draws.to_string().yellow());
    if summary.games > 0 {
        println!(
            "average game length: {:.1} moves",
            summary.total_moves as f64 / summary.games as f64
        );
    }
    Ok(())
}
