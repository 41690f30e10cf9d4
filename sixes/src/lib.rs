//! # Sixes
//!
//! Engine for a six-player, two-team trick-taking card game with bidding,
//! a trump suit, and a high-stakes "challenge" rule.
//!
//! ## Rules in brief
//!
//! - 48 cards (no twos), eight per seat; even seats form team A, odd seats team B
//! - **Bidding**: starting left of the dealer, each seat passes or calls 5-8
//!   tricks, strictly above the current bid; if all pass the dealer must call 5
//! - **Trump selection**: the bid winner names trump
//! - **Play**: eight tricks; follow the lead suit if you can; trump beats
//!   everything else
//! - **Challenge**: when the calling team (bid of 6+) takes five tricks in a
//!   row, it may stake the round on winning all eight: +16 or -32
//! - **Scoring**: the calling team scores its bid if it made it, or loses
//!   twice its bid; the first team to 52 wins, a team falling to -52 loses
//!
//! ## Core Modules
//!
//! - [`game`]: cards, the round state machine, and views
//! - [`bot`]: automated participants at three difficulty levels
//! - [`table`]: per-room actors, timers and the room registry
//!
//! ## Example
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use sixes::game::{Command, Phase, Round, entities::{Bid, Participant}};
//!
//! let participants = (0..6)
//!     .map(|i| Participant::human(&format!("p{i}"), &format!("Player {i}")))
//!     .collect();
//! let mut round = Round::new(participants).unwrap();
//! round.begin(&mut StdRng::seed_from_u64(7)).unwrap();
//!
//! // Seat 1 opens the bidding.
//! round.apply(1, Command::SubmitBid(Bid::Call(6))).unwrap();
//! assert_eq!(round.phase(), Phase::Bidding);
//! assert_eq!(round.current_turn(), 2);
//! ```

/// Automated participants.
pub mod bot;

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    Command, GameError, Phase, PrivateView, PublicView, Round,
    constants::{self, NUM_SEATS},
    entities::{self, Bid, Card, Participant, ParticipantId, Rank, Suit, Team},
};

/// Rooms, timers and the room registry.
pub mod table;
