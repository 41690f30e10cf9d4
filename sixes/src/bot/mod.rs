//! Automated participants.
//!
//! Bots see exactly what a human at their seat would see (a
//! [`PrivateView`](crate::game::PrivateView)) and answer with the same
//! [`Command`](crate::game::Command) values a human client sends, so the
//! round validates them like any other move.
//!
//! ## Difficulty Presets
//!
//! ### Easy
//! - Passes half the time, otherwise calls `honours + 3`
//! - Picks a random trump one time in five
//! - Plays a random legal card
//!
//! ### Medium
//! - Calls `4 + honours / 1.5` with three or more aces, kings and queens
//! - Leads its strongest plain card, wins tricks as cheaply as possible
//! - Ruffs when its team called and the trick holds an honour, when its
//!   trumps are strong, or when it is short in trumps
//!
//! ### Hard
//! - Also counts jacks (half) and tens (quarter) towards hand strength
//! - Ruffs whenever it cannot follow suit
//!
//! No preset ever activates the challenge.

pub mod decision;
pub mod errors;
pub mod models;
pub mod strategy;

pub use decision::{BotDecisionMaker, fallback_command};
pub use errors::BotError;
pub use models::{BotPlayer, BotStats, DifficultyParams};
pub use strategy::{BotStrategy, Strategy};
