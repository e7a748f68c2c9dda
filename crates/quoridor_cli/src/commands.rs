//! Subcommand handlers.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use strictly_quoridor::{
    Action, AiConfig, Difficulty, GameHistory, GameMode, GameSerializer, GameSnapshot, GameState,
    Orientation, Player, PlayerId, SimpleAi, ValidMoves, action_report,
};
use tracing::{debug, info, instrument, warn};

/// Per-player line of a game summary.
#[derive(Debug, Serialize)]
struct PlayerSummary {
    name: String,
    position: (i32, i32),
    walls_remaining: u8,
    distance_to_goal: Option<usize>,
}

impl PlayerSummary {
    fn new(game: &GameState, player: &Player) -> Self {
        Self {
            name: player.name().to_string(),
            position: player.position().to_tuple(),
            walls_remaining: player.walls_remaining(),
            distance_to_goal: game.distance_to_goal(player.id()),
        }
    }
}

/// What `show` and `selfplay` print.
#[derive(Debug, Serialize)]
struct GameSummary {
    game_id: String,
    status: String,
    current_turn: PlayerId,
    turn_count: u32,
    winner: Option<PlayerId>,
    walls_placed: usize,
    player1: PlayerSummary,
    player2: PlayerSummary,
}

impl From<&GameState> for GameSummary {
    fn from(game: &GameState) -> Self {
        Self {
            game_id: game.game_id().to_string(),
            status: game.status().to_string(),
            current_turn: game.current_turn(),
            turn_count: game.turn_count(),
            winner: game.winner(),
            walls_placed: game.wall_manager().len(),
            player1: PlayerSummary::new(game, game.player1()),
            player2: PlayerSummary::new(game, game.player2()),
        }
    }
}

/// Result line of `play`.
#[derive(Debug, Serialize)]
struct PlayReport {
    success: bool,
    message: String,
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(file: &Path) -> Result<GameState> {
    GameSerializer::load_from_file(file).with_context(|| format!("Failed to load {}", file.display()))
}

fn build_ai(config: AiConfig, seed: Option<u64>) -> SimpleAi {
    match seed {
        Some(seed) => SimpleAi::with_seed(config, seed),
        None => SimpleAi::new(config),
    }
}

/// Options for [`selfplay`].
#[derive(Debug)]
pub struct SelfplayOptions {
    /// Preset for player 1.
    pub p1: Difficulty,
    /// Preset for player 2.
    pub p2: Difficulty,
    /// Shared TOML config, overriding both presets.
    pub config: Option<PathBuf>,
    /// Seed for player 1; player 2 uses the next value.
    pub seed: Option<u64>,
    /// Upper bound on actions played.
    pub max_actions: u32,
    /// Snapshot destination.
    pub save: Option<PathBuf>,
    /// Action log destination.
    pub history: Option<PathBuf>,
}

/// Plays two AIs against each other and prints the outcome.
#[instrument(skip_all, fields(p1 = %options.p1, p2 = %options.p2, seed = ?options.seed))]
pub fn selfplay(options: SelfplayOptions) -> Result<()> {
    let (config1, config2) = match &options.config {
        Some(path) => {
            let shared = AiConfig::from_file(path)?;
            (shared, shared)
        }
        None => (AiConfig::from(options.p1), AiConfig::from(options.p2)),
    };
    let mut ais = [
        build_ai(config1, options.seed),
        build_ai(config2, options.seed.map(|seed| seed.wrapping_add(1))),
    ];

    let mut game = GameState::new(
        None,
        format!("AI ({})", config1.difficulty()),
        format!("AI ({})", config2.difficulty()),
        GameMode::Local2p,
    );
    let mut history = GameHistory::new(&game);
    info!(game_id = %game.game_id(), "Self-play started");

    for _ in 0..options.max_actions {
        let player = game.current_turn();
        let ai = &mut ais[usize::from(player.number() - 1)];
        let Some(action) = ai.choose_action(&game) else {
            break;
        };
        let outcome = game.apply(action)?;
        debug!(%player, %action, "Played");
        history.record(player, action, outcome);
    }

    if !game.is_finished() {
        warn!(max_actions = options.max_actions, "Action limit reached before a winner");
    }
    if let Some(path) = &options.save {
        GameSerializer::save_to_file(&game, path)?;
        info!(path = %path.display(), "Saved final snapshot");
    }
    if let Some(path) = &options.history {
        std::fs::write(path, serde_json::to_string_pretty(&history)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), entries = history.total_moves(), "Saved action log");
    }

    print_json(&GameSummary::from(&game))
}

/// Prints a summary of a saved game.
#[instrument(skip_all, fields(file = %file.display()))]
pub fn show(file: &Path) -> Result<()> {
    let game = load(file)?;
    print_json(&GameSummary::from(&game))
}

/// Prints the legal pawn moves and walls for the player on turn.
#[instrument(skip_all, fields(file = %file.display()))]
pub fn moves(file: &Path) -> Result<()> {
    let game = load(file)?;
    let (pawn_moves, walls) = if game.is_finished() {
        (Vec::new(), Vec::new())
    } else {
        (game.valid_pawn_moves(), game.valid_wall_placements())
    };
    print_json(&ValidMoves {
        player: game.current_turn(),
        pawn_moves,
        walls,
    })
}

/// Applies one action to a saved game, writing the file back on success.
#[instrument(skip(file), fields(file = %file.display()))]
pub fn play(file: &Path, row: i32, col: i32, wall: Option<Orientation>) -> Result<()> {
    let mut game = load(file)?;
    let action = match wall {
        Some(orientation) => Action::Wall { row, col, orientation },
        None => Action::Move { row, col },
    };

    let result = game.apply(action);
    let (success, message) = action_report(&result);
    if success {
        GameSerializer::save_to_file(&game, file)?;
    }
    print_json(&PlayReport { success, message })
}

/// Prints the snapshot JSON Schema.
pub fn schema() -> Result<()> {
    print_json(&GameSnapshot::json_schema())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(save: PathBuf, history: PathBuf) -> SelfplayOptions {
        SelfplayOptions {
            p1: Difficulty::Hard,
            p2: Difficulty::Easy,
            config: None,
            seed: Some(4),
            max_actions: 400,
            save: Some(save),
            history: Some(history),
        }
    }

    #[test]
    fn test_selfplay_writes_loadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let save = dir.path().join("game.json");
        let log = dir.path().join("history.json");
        selfplay(options(save.clone(), log.clone())).unwrap();

        let game = GameSerializer::load_from_file(&save).unwrap();
        let history: GameHistory = serde_json::from_str(&std::fs::read_to_string(&log).unwrap()).unwrap();
        // A winning move is logged but does not pass the turn.
        let expected = game.turn_count() as usize + usize::from(game.winner().is_some());
        assert_eq!(history.total_moves(), expected);

        let replayed = history.replay_all().unwrap();
        assert_eq!(replayed.turn_count(), game.turn_count());
        assert_eq!(replayed.status(), game.status());
        assert_eq!(replayed.winner(), game.winner());
        assert_eq!(replayed.current_turn(), game.current_turn());
        assert_eq!(replayed.player1().position(), game.player1().position());
        assert_eq!(replayed.player2().position(), game.player2().position());
        assert_eq!(replayed.wall_manager(), game.wall_manager());
    }

    #[test]
    fn test_play_saves_only_accepted_actions() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("game.json");
        let game = GameState::new(None, "A", "B", GameMode::Local2p);
        GameSerializer::save_to_file(&game, &file).unwrap();

        play(&file, 6, 4, None).unwrap();
        assert_eq!(load(&file).unwrap().turn_count(), 0);

        play(&file, 7, 4, None).unwrap();
        play(&file, 2, 2, Some(Orientation::Vertical)).unwrap();
        let saved = load(&file).unwrap();
        assert_eq!(saved.turn_count(), 2);
        assert_eq!(saved.player1().position().to_tuple(), (7, 4));
        assert_eq!(saved.wall_manager().len(), 1);
    }

    #[test]
    fn test_load_reports_path() {
        let err = load(Path::new("/nonexistent/game.json")).unwrap_err();
        assert!(err.to_string().contains("game.json"));
    }
}
