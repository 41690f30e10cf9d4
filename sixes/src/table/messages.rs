//! Table actor message types.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::game::{
    Command, GameError, Phase, PrivateView, PublicView, Scores,
    entities::{ParticipantId, Team},
};

/// Room identifier handed out by the table manager
pub type RoomId = u64;

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Command from a seated participant
    SubmitCommand {
        participant: ParticipantId,
        command: Command,
        response: oneshot::Sender<TableResponse>,
    },

    /// Get the public view of the round
    GetPublicView {
        response: oneshot::Sender<PublicView>,
    },

    /// Get the private view for a seated participant
    GetPrivateView {
        participant: ParticipantId,
        response: oneshot::Sender<Option<PrivateView>>,
    },

    /// Get room summary
    GetState {
        response: oneshot::Sender<TableStateResponse>,
    },

    /// Close table
    Close {
        response: oneshot::Sender<TableResponse>,
    },

    /// Subscribe to state change notifications
    Subscribe {
        subscriber: ParticipantId,
        sender: mpsc::Sender<StateChangeNotification>,
    },

    /// Unsubscribe from state change notifications
    Unsubscribe { subscriber: ParticipantId },

    /// Internal: a timer armed at state `version` fired
    Scheduled { step: ScheduledStep, version: u64 },
}

/// Automatic steps the actor arms after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledStep {
    /// An automated seat is due to act
    BotTurn,
    /// A complete trick has been on display long enough
    ResolveTrick,
    /// An automated seat declines the offered challenge
    DeclineChallenge,
    /// Deal the next round after scoring
    NextRound,
}

/// Notification sent when table state changes
#[derive(Debug, Clone)]
pub enum StateChangeNotification {
    /// Snapshot after a mutation
    StateChanged { version: u64, view: Box<PublicView> },
    /// The room was closed; no more notifications follow
    Closed,
}

/// Response from table operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableResponse {
    /// Operation succeeded
    Success,

    /// The round refused the command; nothing changed
    Rejected(GameError),
}

/// Table state response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStateResponse {
    pub room_id: RoomId,
    pub name: String,
    pub phase: Phase,
    pub scores: Scores,
    pub winner: Option<Team>,
    /// Rounds dealt so far, including the current one
    pub round_number: u32,
    pub bot_count: usize,
}

impl TableResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(self, TableResponse::Success)
    }

    /// Get error message if the command was rejected
    pub fn error_message(&self) -> Option<String> {
        match self {
            TableResponse::Success => None,
            TableResponse::Rejected(error) => Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::IllegalReason;

    #[test]
    fn test_response_messages() {
        assert!(TableResponse::Success.is_success());
        assert_eq!(TableResponse::Success.error_message(), None);
        let rejected = TableResponse::Rejected(GameError::IllegalAction(IllegalReason::NotYourTurn));
        assert!(!rejected.is_success());
        assert_eq!(
            rejected.error_message().as_deref(),
            Some("illegal action: not your turn")
        );
    }
}
