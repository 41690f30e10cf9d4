use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::Phase;

/// Reasons a bot could not come up with a command.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum BotError {
    #[error("nothing to decide in {0}")]
    NotActionable(Phase),
    #[error("not this bot's turn")]
    NotYourTurn,
    #[error("no legal card to play")]
    EmptyHand,
}
