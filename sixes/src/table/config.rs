//! Table configuration models.

use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};

/// Longest delay a table accepts for any of its timers.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Bot difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    Easy,   // Mostly random bids, random legal cards
    Medium, // Honour counting, selective ruffing
    Hard,   // Weighted hand strength, always ruffs
}

impl std::fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotDifficulty::Easy => write!(f, "easy"),
            BotDifficulty::Medium => write!(f, "medium"),
            BotDifficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for BotDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(BotDifficulty::Easy),
            "medium" => Ok(BotDifficulty::Medium),
            "hard" => Ok(BotDifficulty::Hard),
            other => Err(format!("unknown bot difficulty `{other}`")),
        }
    }
}

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table name
    pub name: String,

    /// Difficulty preset for every bot at the table
    pub bot_difficulty: BotDifficulty,

    /// How long a bot "thinks" before acting (default: 1000 ms)
    pub bot_think_delay_ms: u64,

    /// How long a complete trick stays visible before it is cleared (default: 3000 ms)
    pub trick_reveal_delay_ms: u64,

    /// Pause between a scored round and the next deal (default: 5000 ms)
    pub next_round_delay_ms: u64,

    /// Delay before a bot declines the challenge (default: 1000 ms)
    pub challenge_decline_delay_ms: u64,

    /// Seed for shuffling and bot decisions; random when unset
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Default Table".to_string(),
            bot_difficulty: BotDifficulty::Medium,
            bot_think_delay_ms: 1000,
            trick_reveal_delay_ms: 3000,
            next_round_delay_ms: 5000,
            challenge_decline_delay_ms: 1000,
            seed: None,
        }
    }
}

impl TableConfig {
    /// Same table with every timer set to zero.
    pub fn without_delays(self) -> Self {
        Self {
            bot_think_delay_ms: 0,
            trick_reveal_delay_ms: 0,
            next_round_delay_ms: 0,
            challenge_decline_delay_ms: 0,
            ..self
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Table name must not be empty".to_string());
        }

        let delays = [
            ("bot think delay", self.bot_think_delay_ms),
            ("trick reveal delay", self.trick_reveal_delay_ms),
            ("next round delay", self.next_round_delay_ms),
            ("challenge decline delay", self.challenge_decline_delay_ms),
        ];
        for (label, delay) in delays {
            if delay > MAX_DELAY_MS {
                return Err(format!(
                    "{label} must be at most {MAX_DELAY_MS} ms, got {delay}"
                ));
            }
        }

        Ok(())
    }

    pub fn bot_think_delay(&self) -> Duration {
        Duration::from_millis(self.bot_think_delay_ms)
    }

    pub fn trick_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.trick_reveal_delay_ms)
    }

    pub fn next_round_delay(&self) -> Duration {
        Duration::from_millis(self.next_round_delay_ms)
    }

    pub fn challenge_decline_delay(&self) -> Duration {
        Duration::from_millis(self.challenge_decline_delay_ms)
    }
}
