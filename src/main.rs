//! Headless Replay Tetris runner (default binary).
//!
//! Drives a session at a fixed frame step without a window: live games fall
//! under gravity (optionally with soft drop held), replays run to their end.
//! Saves and replays go to the same files the interactive game uses.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use replay_tetris::core::SimulationEngine;
use replay_tetris::engine::{SessionConfig, SessionContext};
use replay_tetris::persist::{FsStorage, Storage};
use replay_tetris::types::{EngineEvent, EngineState, GameAction, TileType};

#[derive(Parser)]
#[command(name = "replay-tetris")]
#[command(about = "Deterministic falling-block simulation with record and replay")]
struct Args {
    /// Save directory (overrides REPLAY_TETRIS_SAVE_DIR)
    #[arg(long, global = true)]
    save_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Start a new live game
    Play {
        /// Piece seed; derived from the clock when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many frames (the game is then autosaved)
        #[arg(long, default_value = "36000")]
        max_frames: u64,

        /// Hold soft drop for the whole run
        #[arg(long)]
        soft_drop: bool,
    },
    /// Resume the autosaved game, or start a fresh one
    Resume {
        #[arg(long, default_value = "36000")]
        max_frames: u64,

        #[arg(long)]
        soft_drop: bool,
    },
    /// Play back a stored replay to its end
    Replay {
        /// Replay file index
        index: usize,

        #[arg(long, default_value = "1000000")]
        max_frames: u64,
    },
    /// List stored replays, best score first
    List,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Silent by default; RUST_LOG wins over --verbose.
    let default_filter = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = SessionConfig::from_env();
    if let Some(dir) = args.save_dir {
        config.persist.save_dir = dir;
    }
    let storage = FsStorage::new(config.persist.save_dir.clone());
    let mut session = SessionContext::new(storage, config);

    match args.command {
        Cmd::Play {
            seed,
            max_frames,
            soft_drop,
        } => {
            let seed = session.start_new_game(seed);
            println!("seed: {seed}");
            run(&mut session, max_frames, soft_drop)
        }
        Cmd::Resume {
            max_frames,
            soft_drop,
        } => {
            if session.resume_or_start() {
                println!("resumed saved game");
            } else {
                println!("no usable save, started a new game");
            }
            run(&mut session, max_frames, soft_drop)
        }
        Cmd::Replay { index, max_frames } => {
            session
                .load_replay(index)
                .with_context(|| format!("loading replay {index}"))?;
            run(&mut session, max_frames, false)
        }
        Cmd::List => {
            list(&session);
            Ok(())
        }
    }
}

fn run<S: Storage>(session: &mut SessionContext<S>, max_frames: u64, soft_drop: bool) -> Result<()> {
    let fps = session.config().engine.fps.max(1);
    let frame_ms = 1000 / fps;
    if soft_drop {
        session.press(GameAction::SoftDrop);
    }

    let mut frames = 0;
    while frames < max_frames {
        let running = session.state().is_some_and(|state| state.is_running());
        if !running {
            break;
        }
        for event in session.tick(frame_ms) {
            match event {
                EngineEvent::PieceLocked {
                    kind,
                    lines_cleared,
                    ..
                } if lines_cleared > 0 => {
                    info!(kind = kind.as_str(), lines_cleared, "lines cleared");
                }
                EngineEvent::GameOver { score } => println!("game over, score {score}"),
                EngineEvent::ReplayFinished { score } => println!("replay finished, score {score}"),
                _ => {}
            }
        }
        frames += 1;
    }

    let Some(engine) = session.engine() else {
        bail!("no game is running");
    };
    print_summary(engine);

    if engine.state() == EngineState::LiveRunning {
        if session.save_game() {
            println!("frame limit reached, game saved");
        } else {
            println!("frame limit reached, game could not be saved");
        }
    }
    Ok(())
}

fn print_summary(engine: &SimulationEngine) {
    println!(
        "state: {}  score: {}  time: {}  frames: {}  events: {}",
        engine.state().as_str(),
        engine.score(),
        engine.clock(),
        engine.frame_count(),
        engine.log().len()
    );
    println!("{}", render_board(engine));
}

/// Walls `#`, locked blocks by kind letter, the falling piece in lowercase
fn render_board(engine: &SimulationEngine) -> String {
    let board = engine.board();
    let piece = engine.current_piece();
    let cells = piece.cells();
    let mut out = String::new();
    for y in 0..i32::from(board.height()) {
        for x in 0..i32::from(board.width()) {
            let ch = if !engine.state().is_over() && cells.contains(&(x, y)) {
                piece.kind().as_str().to_ascii_lowercase().chars().next().unwrap_or('*')
            } else {
                match board.get_tile(x, y).map(|t| t.tile_type()) {
                    Some(TileType::Wall) => '#',
                    Some(TileType::Empty) | None => '.',
                    Some(kind) => kind.as_str().chars().next().unwrap_or('?'),
                }
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn list<S: Storage>(session: &SessionContext<S>) {
    let replays = session.store().list_replays();
    if replays.is_empty() {
        println!("no replays stored");
        return;
    }
    println!("{:>4}  {:>5}  {:>8}  {:>9}  started", "rank", "index", "score", "time");
    for (rank, record) in replays.iter().enumerate() {
        println!(
            "{:>4}  {:>5}  {:>8}  {:>9}  {}",
            rank + 1,
            record.file_index,
            record.score,
            record.finished_time,
            record.start_date
        );
    }
}
