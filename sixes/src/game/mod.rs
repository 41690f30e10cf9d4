//! Six-seat trick-taking game engine.
//!
//! - [`entities`]: cards, deck, teams, bids and seats
//! - [`state_machine`]: the round state machine and its commands
//! - [`views`]: public and per-participant snapshots
//! - [`errors`]: validation failures

pub mod constants;
pub mod entities;
pub mod errors;
pub mod state_machine;
pub mod views;

pub use errors::{GameError, IllegalReason};
pub use state_machine::{Challenge, Command, PerTeam, Phase, Round, RoundEvent, Scores, match_winner};
pub use views::{ChallengeView, PrivateView, PublicView, SeatView};
