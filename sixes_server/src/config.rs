//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use sixes::table::{BotDifficulty, TableConfig, config::MAX_DELAY_MS};

/// Values given on the command line; each one wins over its environment variable.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub rooms: Option<usize>,
    pub difficulty: Option<BotDifficulty>,
    pub seed: Option<u64>,
    pub fast: bool,
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Number of rooms to host
    pub rooms: usize,
    /// Template for every room; names and seeds are filled in per room
    pub table: TableConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values parsed from the command line
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but cannot be parsed
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    fn from_lookup<F>(lookup: F, overrides: CliOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TableConfig::default();

        let bot_difficulty = match overrides.difficulty {
            Some(difficulty) => difficulty,
            None => parse_var(&lookup, "SIXES_BOT_DIFFICULTY")?.unwrap_or(defaults.bot_difficulty),
        };
        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => parse_var(&lookup, "SIXES_SEED")?,
        };

        let mut table = TableConfig {
            name: "Room".to_string(),
            bot_difficulty,
            bot_think_delay_ms: parse_var(&lookup, "SIXES_BOT_THINK_DELAY_MS")?
                .unwrap_or(defaults.bot_think_delay_ms),
            trick_reveal_delay_ms: parse_var(&lookup, "SIXES_TRICK_REVEAL_DELAY_MS")?
                .unwrap_or(defaults.trick_reveal_delay_ms),
            next_round_delay_ms: parse_var(&lookup, "SIXES_NEXT_ROUND_DELAY_MS")?
                .unwrap_or(defaults.next_round_delay_ms),
            challenge_decline_delay_ms: parse_var(&lookup, "SIXES_CHALLENGE_DECLINE_DELAY_MS")?
                .unwrap_or(defaults.challenge_decline_delay_ms),
            seed,
        };
        let fast = overrides.fast || parse_var(&lookup, "SIXES_FAST")?.unwrap_or(false);
        if fast {
            table = table.without_delays();
        }

        let rooms = match overrides.rooms {
            Some(rooms) => rooms,
            None => parse_var(&lookup, "SIXES_ROOMS")?.unwrap_or(1),
        };

        Ok(ServerConfig { rooms, table })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rooms == 0 {
            return Err(ConfigError::Invalid {
                var: "SIXES_ROOMS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let delays = [
            ("SIXES_BOT_THINK_DELAY_MS", self.table.bot_think_delay_ms),
            ("SIXES_TRICK_REVEAL_DELAY_MS", self.table.trick_reveal_delay_ms),
            ("SIXES_NEXT_ROUND_DELAY_MS", self.table.next_round_delay_ms),
            (
                "SIXES_CHALLENGE_DECLINE_DELAY_MS",
                self.table.challenge_decline_delay_ms,
            ),
        ];
        for (var, delay) in delays {
            if delay > MAX_DELAY_MS {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: format!("Must be at most {MAX_DELAY_MS} ms"),
                });
            }
        }

        Ok(())
    }

    /// Configuration for the room at `index`. Seeded rooms get distinct,
    /// reproducible seeds.
    pub fn room_config(&self, index: usize) -> TableConfig {
        TableConfig {
            name: format!("Room {}", index + 1),
            seed: self.table.seed.map(|seed| seed.wrapping_add(index as u64)),
            ..self.table.clone()
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an optional variable, failing loudly on a malformed value.
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            }),
    }
}
