//! Kifu: read, replay and edit Go game records.
//!
//! ## Usage
//!
//! - `kifu show <file> [--move N | --last]` - Game info and the board at a move
//! - `kifu score <file>` - Score the end of the main line
//! - `kifu normalize <file>` - Re-serialize a record
//! - `kifu console [file] [--size N]` - Interactive command loop
//! - `kifu demo [--size N] [--moves N] [--seed S]` - Random legal game
//!
//! Set `RUST_LOG=debug` to see parsing and replay details.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kifu::board::StoneType;
use kifu::console::Console;
use kifu::constants::DEFAULT_SIZE;
use kifu::info::GameInfo;
use kifu::player::Player;
use kifu::playout::random_game;

/// Kifu: Go game record tool
#[derive(Parser)]
#[command(name = "kifu")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print game info and the board at a move of the main line
    Show {
        file: PathBuf,
        /// Number of moves to replay from the root
        #[arg(long, conflicts_with = "last")]
        r#move: Option<usize>,
        /// Replay the whole main line
        #[arg(long)]
        last: bool,
    },
    /// Score the final position of the main line
    Score { file: PathBuf },
    /// Parse a record and write it back out
    Normalize { file: PathBuf },
    /// Edit a record interactively on stdin/stdout
    Console {
        file: Option<PathBuf>,
        /// Board size for a new record
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
    },
    /// Generate a random legal game
    Demo {
        #[arg(long, default_value_t = 9)]
        size: usize,
        /// Maximum number of moves
        #[arg(long, default_value_t = 120)]
        moves: usize,
        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { file, r#move, last } => {
            let mut player = load(&file)?;
            match (r#move, last) {
                (Some(n), _) => {
                    player.forward_n(n);
                }
                (None, true) => {
                    player.forward_to_tail();
                }
                (None, false) => {}
            }
            print!("{}", GameInfo::from_tree(player.tree()));
            println!("{player}");
        }
        Commands::Score { file } => {
            let mut player = load(&file)?;
            player.forward_to_tail();
            println!("{player}");
            println!(
                "black {} white {}",
                player.score(StoneType::Black),
                player.score(StoneType::White)
            );
        }
        Commands::Normalize { file } => {
            let player = load(&file)?;
            println!("{}", player.to_sgf());
        }
        Commands::Console { file, size } => {
            let player = match file {
                Some(file) => load(&file)?,
                None => Player::with_size(size)?,
            };
            let mut console = Console::new(player);
            console
                .run(io::stdin().lock(), io::stdout())
                .context("console I/O failed")?;
        }
        Commands::Demo { size, moves, seed } => {
            let mut rng = match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            let mut player = Player::with_size(size)?;
            let played = random_game(&mut player, moves, &mut rng);
            log::info!("generated {played} moves on {size}x{size}");
            println!("{}", player.to_sgf());
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<Player> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Player::from_sgf(&text).with_context(|| format!("cannot load {}", path.display()))
}
