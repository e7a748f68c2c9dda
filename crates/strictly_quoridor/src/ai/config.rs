//! AI tuning parameters.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info, instrument};

/// Named strength presets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Rarely walls, often random.
    Easy,
    /// The default.
    #[default]
    Normal,
    /// Walls often, almost never random.
    Hard,
}

impl Difficulty {
    /// `(wall_probability, randomness)` for this preset.
    pub fn preset(self) -> (f64, f64) {
        match self {
            Difficulty::Easy => (0.10, 0.30),
            Difficulty::Normal => (0.25, 0.15),
            Difficulty::Hard => (0.40, 0.05),
        }
    }
}

fn default_wall_sample_size() -> usize {
    50
}

fn default_random_wall_pool() -> usize {
    20
}

/// Parameters handed to [`SimpleAi`](super::SimpleAi).
///
/// Each AI owns its config, so differently tuned AIs can play side by side.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize)]
pub struct AiConfig {
    /// Preset the probabilities came from.
    difficulty: Difficulty,
    /// Chance of trying a blocking wall on a quiet turn.
    wall_probability: f64,
    /// Chance of playing a uniformly random action.
    randomness: f64,
    /// Legal walls evaluated when looking for a block.
    wall_sample_size: usize,
    /// Walls offered alongside pawn moves for a random action.
    random_wall_pool: usize,
}

/// On-disk form. Absent probabilities fall back to the difficulty preset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AiConfigFile {
    #[serde(default)]
    difficulty: Difficulty,
    wall_probability: Option<f64>,
    randomness: Option<f64>,
    #[serde(default = "default_wall_sample_size")]
    wall_sample_size: usize,
    #[serde(default = "default_random_wall_pool")]
    random_wall_pool: usize,
}

impl AiConfig {
    /// The preset for `difficulty` with default sampling sizes.
    #[instrument]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (wall_probability, randomness) = difficulty.preset();
        Self {
            difficulty,
            wall_probability,
            randomness,
            wall_sample_size: default_wall_sample_size(),
            random_wall_pool: default_random_wall_pool(),
        }
    }

    /// Overrides the two probabilities, rejecting values outside `[0, 1]`.
    pub fn with_probabilities(mut self, wall_probability: f64, randomness: f64) -> Result<Self, ConfigError> {
        self.wall_probability = wall_probability;
        self.randomness = randomness;
        self.validate()?;
        Ok(self)
    }

    /// Overrides how many legal walls are sampled per blocking search.
    pub fn with_wall_sample_size(mut self, wall_sample_size: usize) -> Self {
        self.wall_sample_size = wall_sample_size;
        self
    }

    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: AiConfigFile = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        let (preset_wall, preset_random) = file.difficulty.preset();
        let config = Self {
            difficulty: file.difficulty,
            wall_probability: file.wall_probability.unwrap_or(preset_wall),
            randomness: file.randomness.unwrap_or(preset_random),
            wall_sample_size: file.wall_sample_size,
            random_wall_pool: file.random_wall_pool,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading AI config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml_str(&content)?;
        info!(difficulty = %config.difficulty, "AI config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("wall_probability", self.wall_probability),
            ("randomness", self.randomness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::new(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Normal)
    }
}

impl From<Difficulty> for AiConfig {
    fn from(difficulty: Difficulty) -> Self {
        Self::for_difficulty(difficulty)
    }
}
