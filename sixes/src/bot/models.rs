//! Bot player models and difficulty presets.

use serde::{Deserialize, Serialize};

use crate::game::{
    Command,
    entities::{Bid, SeatIndex},
};
use crate::table::config::BotDifficulty;

/// Tuning knobs for one difficulty preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Chance of passing outright, regardless of hand (casual bidding).
    pub pass_probability: f64,

    /// Chance of naming a uniformly random trump suit.
    pub random_trump_probability: f64,

    /// Whether every card is a uniformly random legal card.
    pub plays_randomly: bool,

    /// Weight of a jack when scoring hand strength (aces, kings and queens weigh 1).
    pub jack_weight: f32,

    /// Weight of a ten when scoring hand strength.
    pub ten_weight: f32,

    /// Hand strength at or above which the bot makes a real call.
    pub strong_threshold: f32,

    /// A strong hand calls `4 + floor(strength / strength_divisor)`.
    pub strength_divisor: f32,

    /// Hand strength at or above which the bot may still open at the minimum.
    pub speculative_threshold: f32,

    /// Chance of that minimum speculative call.
    pub speculative_probability: f64,

    /// Whether the bot ruffs whenever it cannot follow and holds trump.
    pub always_trumps: bool,

    /// Ruff anyway when holding this many trumps or fewer.
    pub short_trump_count: usize,
}

impl DifficultyParams {
    /// Mostly random: passes half the time and plays any legal card.
    pub fn easy() -> Self {
        Self {
            pass_probability: 0.5,
            random_trump_probability: 0.2,
            plays_randomly: true,
            jack_weight: 0.0,
            ten_weight: 0.0,
            strong_threshold: 0.0,
            strength_divisor: 1.0,
            speculative_threshold: 0.0,
            speculative_probability: 0.0,
            always_trumps: false,
            short_trump_count: 0,
        }
    }

    /// Counts honours only and trumps selectively.
    pub fn medium() -> Self {
        Self {
            pass_probability: 0.0,
            random_trump_probability: 0.0,
            plays_randomly: false,
            jack_weight: 0.0,
            ten_weight: 0.0,
            strong_threshold: 3.0,
            strength_divisor: 1.5,
            speculative_threshold: 1.0,
            speculative_probability: 0.5,
            always_trumps: false,
            short_trump_count: 2,
        }
    }

    /// Weighs jacks and tens too and ruffs at every chance.
    pub fn hard() -> Self {
        Self {
            pass_probability: 0.0,
            random_trump_probability: 0.0,
            plays_randomly: false,
            jack_weight: 0.5,
            ten_weight: 0.25,
            strong_threshold: 3.5,
            strength_divisor: 1.0,
            speculative_threshold: 2.0,
            speculative_probability: 0.7,
            always_trumps: true,
            short_trump_count: 2,
        }
    }

    pub fn from_difficulty(difficulty: BotDifficulty) -> Self {
        match difficulty {
            BotDifficulty::Easy => Self::easy(),
            BotDifficulty::Medium => Self::medium(),
            BotDifficulty::Hard => Self::hard(),
        }
    }
}

/// Bot statistics tracker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStats {
    /// Commands produced by the decision maker
    pub decisions: u32,

    /// Times the driver had to substitute the safe default
    pub fallbacks: u32,

    pub bids_called: u32,
    pub passes: u32,
    pub cards_played: u32,
}

impl BotStats {
    /// Share of decisions that had to be replaced by a fallback.
    pub fn fallback_rate(&self) -> f32 {
        let total = self.decisions + self.fallbacks;
        if total == 0 {
            0.0
        } else {
            self.fallbacks as f32 / total as f32
        }
    }
}

/// An automated participant seated at a table.
#[derive(Debug, Clone)]
pub struct BotPlayer {
    pub seat: SeatIndex,
    pub name: String,
    pub difficulty: BotDifficulty,
    pub params: DifficultyParams,
    pub stats: BotStats,
}

impl BotPlayer {
    pub fn new(seat: SeatIndex, name: &str, difficulty: BotDifficulty) -> Self {
        Self {
            seat,
            name: name.to_string(),
            difficulty,
            params: DifficultyParams::from_difficulty(difficulty),
            stats: BotStats::default(),
        }
    }

    /// Record a command the bot decided on by itself
    pub fn record_decision(&mut self, command: &Command) {
        self.stats.decisions += 1;
        self.record_command(command);
    }

    /// Record a command substituted by the driver
    pub fn record_fallback(&mut self, command: &Command) {
        self.stats.fallbacks += 1;
        self.record_command(command);
    }

    fn record_command(&mut self, command: &Command) {
        match command {
            Command::SubmitBid(Bid::Call(_)) => self.stats.bids_called += 1,
            Command::SubmitBid(Bid::Pass) => self.stats.passes += 1,
            Command::PlayCard(_) => self.stats.cards_played += 1,
            Command::SelectTrump(_) | Command::DecideSpecialRule(_) => {}
        }
    }
}
