//! Quoridor - command-line front end
//!
//! Self-play, snapshot inspection and single-action play on saved games.

#![warn(missing_docs)]

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use commands::SelfplayOptions;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Selfplay {
            p1,
            p2,
            config,
            seed,
            max_actions,
            save,
            history,
        } => commands::selfplay(SelfplayOptions {
            p1,
            p2,
            config,
            seed,
            max_actions,
            save,
            history,
        }),
        Command::Show { file } => commands::show(&file),
        Command::Moves { file } => commands::moves(&file),
        Command::Play { file, row, col, wall } => commands::play(&file, row, col, wall),
        Command::Schema => commands::schema(),
    }
}
