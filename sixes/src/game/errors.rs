//! Validation failures reported back to the acting participant.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a command was refused as an illegal action.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum IllegalReason {
    WrongPhase,
    NotYourTurn,
    NotBidWinner,
    NotOwningTeam,
    UnknownParticipant,
    TrickPending,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::WrongPhase => "wrong phase",
            Self::NotYourTurn => "not your turn",
            Self::NotBidWinner => "only the bid winner can pick trump",
            Self::NotOwningTeam => "only the calling team can decide the challenge",
            Self::UnknownParticipant => "not seated at this table",
            Self::TrickPending => "trick is still being revealed",
        };
        write!(f, "{repr}")
    }
}

/// Errors that can occur when applying a command to a round.
///
/// None of these mutate state: re-submitting the same rejected command
/// yields the same error.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("illegal action: {0}")]
    IllegalAction(IllegalReason),
    #[error("invalid bid")]
    InvalidBid,
    #[error("must follow the lead suit")]
    MustFollowSuit,
    #[error("card not in hand")]
    CardNotHeld,
    #[error("invalid roster: {0}")]
    InvalidRoster(String),
    #[error("malformed card `{0}`")]
    MalformedCard(String),
}

impl From<IllegalReason> for GameError {
    fn from(reason: IllegalReason) -> Self {
        Self::IllegalAction(reason)
    }
}
