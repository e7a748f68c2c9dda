//! Serialized game state.
//!
//! [`GameSnapshot`] is the nested JSON document persistence layers store
//! and exchange. It is deliberately loose (plain strings and integers) so
//! that old documents still parse; [`GameState::from_snapshot`] is where
//! everything is checked and converted into the live types.

use crate::board::Board;
use crate::error::SnapshotError;
use crate::game_state::{GameMode, GameState, GameStatus};
use crate::player::{Player, PlayerId};
use crate::position::{Position, PositionRecord};
use crate::wall::{Wall, WallRecord};
use crate::wall_manager::WallManager;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Status string written by older versions for any won game.
pub const LEGACY_FINISHED_STATUS: &str = "finished";

/// Full state of one game as a JSON-compatible document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GameSnapshot {
    /// Game identifier.
    pub game_id: String,
    /// `in_progress`, `player1_win`, `player2_win`, `abandoned`, or the
    /// legacy `finished`.
    pub status: String,
    /// `vs_ai` when absent.
    #[serde(default)]
    pub game_mode: GameMode,
    /// 1 or 2.
    pub current_turn: u8,
    /// Turn switches so far.
    pub turn_count: u32,
    /// Both players.
    pub players: PlayersSnapshot,
    /// Placed walls, oldest first.
    #[serde(default)]
    pub walls: Vec<WallRecord>,
    /// 1 or 2 once the game is won.
    #[serde(default)]
    pub winner: Option<u8>,
    /// ISO-8601 UTC, trailing `Z`.
    pub created_at: String,
    /// ISO-8601 UTC, trailing `Z`.
    pub updated_at: String,
}

/// The `players` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlayersSnapshot {
    /// Bottom player.
    pub player1: PlayerSnapshot,
    /// Top player.
    pub player2: PlayerSnapshot,
}

/// One player's entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerSnapshot {
    /// Display name.
    pub name: String,
    /// Pawn cell.
    pub position: PositionRecord,
    /// Walls in hand.
    pub walls_remaining: u8,
    /// Informational; recomputed from the player id on load.
    pub goal_row: i32,
}

impl PlayerSnapshot {
    fn from_player(player: &Player) -> Self {
        Self {
            name: player.name().to_string(),
            position: player.position().to_record(),
            walls_remaining: player.walls_remaining(),
            goal_row: player.goal_row(),
        }
    }

    fn into_player(self, id: PlayerId) -> Result<Player, SnapshotError> {
        let position = Position::try_from(self.position)?;
        if self.walls_remaining > Board::WALLS_PER_PLAYER {
            return Err(SnapshotError::new(format!(
                "{} holds {} walls, at most {} allowed",
                id,
                self.walls_remaining,
                Board::WALLS_PER_PLAYER
            )));
        }
        if self.goal_row != id.goal_row() {
            debug!(%id, stored = self.goal_row, "Ignoring stored goal row");
        }
        Ok(Player::with_walls(id, self.name, position, self.walls_remaining))
    }
}

impl GameSnapshot {
    /// JSON Schema describing the document.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(GameSnapshot)
    }
}

impl GameState {
    /// Captures the full state as a snapshot.
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.game_id.clone(),
            status: self.status.to_string(),
            game_mode: self.game_mode,
            current_turn: self.current_turn.number(),
            turn_count: self.turn_count,
            players: PlayersSnapshot {
                player1: PlayerSnapshot::from_player(&self.player1),
                player2: PlayerSnapshot::from_player(&self.player2),
            },
            walls: self.wall_manager.walls().iter().map(Wall::to_record).collect(),
            winner: self.winner.map(PlayerId::number),
            created_at: format_timestamp(self.created_at),
            updated_at: format_timestamp(self.updated_at),
        }
    }

    /// Rebuilds a game from a snapshot.
    ///
    /// Accepts the legacy `finished` status. Rejects unknown statuses,
    /// turns other than 1 or 2, coordinates off the board, overlapping
    /// walls, stacked pawns, a sealed-in player and wall counts that do
    /// not add up.
    #[instrument(skip(snapshot), fields(game_id = %snapshot.game_id))]
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        let winner = snapshot
            .winner
            .map(|number| {
                PlayerId::from_number(number)
                    .ok_or_else(|| SnapshotError::new(format!("Invalid winner: {}", number)))
            })
            .transpose()?;
        let status = parse_status(&snapshot.status, winner)?;
        let winner = match (status, winner) {
            (GameStatus::Player1Win, None) => Some(PlayerId::One),
            (GameStatus::Player2Win, None) => Some(PlayerId::Two),
            (GameStatus::Player1Win | GameStatus::Player2Win, Some(id))
                if GameStatus::won_by(id) != status =>
            {
                return Err(SnapshotError::new(format!(
                    "Status {} contradicts winner {}",
                    status, id
                )));
            }
            (GameStatus::InProgress | GameStatus::Abandoned, Some(id)) => {
                return Err(SnapshotError::new(format!(
                    "Status {} cannot have winner {}",
                    status, id
                )));
            }
            (_, winner) => winner,
        };

        let current_turn = PlayerId::from_number(snapshot.current_turn).ok_or_else(|| {
            SnapshotError::new(format!("Invalid current turn: {}", snapshot.current_turn))
        })?;

        let player1 = snapshot.players.player1.into_player(PlayerId::One)?;
        let player2 = snapshot.players.player2.into_player(PlayerId::Two)?;
        if player1.position() == player2.position() {
            return Err(SnapshotError::new(format!(
                "Both pawns stand on {}",
                player1.position()
            )));
        }

        let walls = snapshot
            .walls
            .into_iter()
            .map(Wall::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let wall_manager = WallManager::from_walls(walls)
            .map_err(|wall| SnapshotError::new(format!("{} overlaps an earlier wall", wall)))?;

        let game = GameState {
            game_id: snapshot.game_id,
            status,
            game_mode: snapshot.game_mode,
            current_turn,
            turn_count: snapshot.turn_count,
            winner,
            player1,
            player2,
            wall_manager,
            created_at: parse_timestamp(&snapshot.created_at)?,
            updated_at: parse_timestamp(&snapshot.updated_at)?,
        };

        if let Err(violations) = crate::invariants::check_game(&game) {
            let descriptions: Vec<String> = violations.into_iter().map(|v| v.description).collect();
            warn!(?descriptions, "Restored game violates invariants");
            return Err(SnapshotError::new(format!(
                "Snapshot violates invariants: {}",
                descriptions.join("; ")
            )));
        }
        Ok(game)
    }

    /// The snapshot as a `serde_json::Value`.
    pub fn to_value(&self) -> Result<serde_json::Value, SnapshotError> {
        Ok(serde_json::to_value(self.to_snapshot())?)
    }

    /// Rebuilds a game from a `serde_json::Value`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        let snapshot: GameSnapshot = serde_json::from_value(value)?;
        Self::from_snapshot(snapshot)
    }
}

fn parse_status(status: &str, winner: Option<PlayerId>) -> Result<GameStatus, SnapshotError> {
    if status == LEGACY_FINISHED_STATUS {
        let migrated = match winner {
            Some(PlayerId::One) => GameStatus::Player1Win,
            _ => GameStatus::Player2Win,
        };
        debug!(%migrated, "Migrated legacy status");
        return Ok(migrated);
    }
    GameStatus::from_str(status).map_err(|_| SnapshotError::new(format!("Unknown status: {}", status)))
}

/// Formats a timestamp as ISO-8601 UTC with microseconds and a trailing `Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses RFC 3339, or a naive ISO-8601 timestamp taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, SnapshotError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| SnapshotError::new(format!("Invalid timestamp '{}': {}", raw, err)))
}

/// JSON text and file helpers around [`GameSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct GameSerializer;

impl GameSerializer {
    /// Serializes `game` to JSON, indented when `pretty`.
    pub fn to_json(game: &GameState, pretty: bool) -> Result<String, SnapshotError> {
        let snapshot = game.to_snapshot();
        let json = if pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(json)
    }

    /// Parses a game from JSON text.
    pub fn from_json(json: &str) -> Result<GameState, SnapshotError> {
        let snapshot: GameSnapshot = serde_json::from_str(json)?;
        GameState::from_snapshot(snapshot)
    }

    /// Writes `game` to `path` as indented JSON.
    #[instrument(skip_all, fields(game_id = %game.game_id(), path = %path.as_ref().display()))]
    pub fn save_to_file(game: &GameState, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json = Self::to_json(game, true)?;
        std::fs::write(path.as_ref(), json)?;
        info!("Saved game");
        Ok(())
    }

    /// Reads a game from a JSON file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<GameState, SnapshotError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let game = Self::from_json(&json)?;
        info!(game_id = %game.game_id(), "Loaded game");
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format_has_trailing_z() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01T12:30:05.000000Z");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:05Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T12:30:05.000000Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T12:30:05").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T14:30:05+02:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_legacy_status_mapping() {
        assert_eq!(
            parse_status("finished", Some(PlayerId::One)).unwrap(),
            GameStatus::Player1Win
        );
        assert_eq!(
            parse_status("finished", Some(PlayerId::Two)).unwrap(),
            GameStatus::Player2Win
        );
        assert_eq!(parse_status("finished", None).unwrap(), GameStatus::Player2Win);
        assert!(parse_status("paused", None).is_err());
    }

    #[test]
    fn test_schema_names_top_level_keys() {
        let schema = serde_json::to_value(GameSnapshot::json_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for key in [
            "game_id",
            "status",
            "game_mode",
            "current_turn",
            "turn_count",
            "players",
            "walls",
            "winner",
            "created_at",
            "updated_at",
        ] {
            assert!(properties.contains_key(key), "missing {}", key);
        }
    }
}
