//! Command-line interface for quoridor.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_quoridor::{Difficulty, Orientation};

/// Quoridor - rules engine front end
#[derive(Parser, Debug)]
#[command(name = "quoridor")]
#[command(about = "Play, inspect and validate Quoridor games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Let two AIs play a full game
    Selfplay {
        /// Difficulty preset for player 1
        #[arg(long, default_value = "normal")]
        p1: Difficulty,

        /// Difficulty preset for player 2
        #[arg(long, default_value = "normal")]
        p2: Difficulty,

        /// TOML AI config used for both players, overriding the presets
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many actions
        #[arg(long, default_value = "400")]
        max_actions: u32,

        /// Write the final snapshot here
        #[arg(long)]
        save: Option<PathBuf>,

        /// Write the action log here
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Print a summary of a saved game
    Show {
        /// Snapshot file
        file: PathBuf,
    },

    /// List the legal actions for the player on turn
    Moves {
        /// Snapshot file
        file: PathBuf,
    },

    /// Apply one action to a saved game and write it back
    Play {
        /// Snapshot file
        file: PathBuf,

        /// Target row (pawn) or anchor row (wall)
        #[arg(long, allow_negative_numbers = true)]
        row: i32,

        /// Target column (pawn) or anchor column (wall)
        #[arg(long, allow_negative_numbers = true)]
        col: i32,

        /// Place a wall with this orientation instead of moving
        #[arg(long)]
        wall: Option<Orientation>,
    },

    /// Print the JSON Schema of the snapshot format
    Schema,
}
