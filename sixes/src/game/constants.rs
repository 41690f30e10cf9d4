//! Fixed table dimensions and scoring thresholds.

pub const NUM_SEATS: usize = 6;
pub const CARDS_PER_HAND: usize = 8;
pub const DECK_SIZE: usize = NUM_SEATS * CARDS_PER_HAND;
pub const TRICKS_PER_ROUND: u8 = 8;

pub const MIN_BID: u8 = 5;
pub const MAX_BID: u8 = 8;
/// Bid the dealer is forced into when every seat passes.
pub const FORCED_BID: u8 = MIN_BID;

/// Consecutive tricks the calling team needs to unlock the challenge.
pub const CHALLENGE_STREAK: u8 = 5;
/// Smallest winning bid for which the challenge can be offered.
pub const CHALLENGE_MIN_BID: u8 = 6;
pub const CHALLENGE_REWARD: i32 = 16;
pub const CHALLENGE_PENALTY: i32 = 32;

pub const WINNING_SCORE: i32 = 52;
pub const LOSING_SCORE: i32 = -52;

/// Number of game-log lines included in views.
pub const VIEW_LOG_LINES: usize = 10;
