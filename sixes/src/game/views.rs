//! Read-only snapshots of a [`Round`] handed to renderers, transports and bots.

use serde::{Deserialize, Serialize};

use super::constants::VIEW_LOG_LINES;
use super::entities::{Bid, Card, ParticipantId, Play, SeatIndex, Suit, Team};
use super::state_machine::{PerTeam, Phase, Round, Scores};

/// What everyone at the table can see about a seat.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatView {
    pub seat: SeatIndex,
    pub id: ParticipantId,
    pub display_name: String,
    pub team: Team,
    pub hand_size: usize,
    pub tricks_won: u8,
    pub bid: Option<Bid>,
    pub is_automated: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChallengeView {
    pub eligible: bool,
    pub activated: bool,
    pub team_owner: Option<Team>,
    pub awaiting_decision: bool,
}

/// Full table view with every hand hidden.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PublicView {
    pub phase: Phase,
    pub seats: Vec<SeatView>,
    pub dealer: SeatIndex,
    pub current_turn: SeatIndex,
    pub trick_leader: SeatIndex,
    pub current_bid: u8,
    /// Highest caller so far while bidding is open.
    pub leading_bidder: Option<SeatIndex>,
    pub bid_winner: Option<SeatIndex>,
    pub trump: Option<Suit>,
    pub trick: Vec<Play>,
    pub scores: Scores,
    pub consecutive_tricks: PerTeam<u8>,
    pub challenge: ChallengeView,
    /// The most recent lines of the round log, oldest first.
    pub log: Vec<String>,
    pub winner: Option<Team>,
}

impl PublicView {
    #[must_use]
    pub fn calling_team(&self) -> Option<Team> {
        self.bid_winner.map(Team::for_seat)
    }

    /// Seat currently winning the trick on the table.
    #[must_use]
    pub fn winning_play(&self) -> Option<Play> {
        super::entities::trick_winner(&self.trick, self.trump).map(|index| self.trick[index])
    }
}

/// The public view plus one participant's own hand.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PrivateView {
    pub seat: SeatIndex,
    pub hand: Vec<Card>,
    pub public: PublicView,
}

impl PrivateView {
    #[must_use]
    pub fn team(&self) -> Team {
        Team::for_seat(self.seat)
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.public.current_turn == self.seat
    }

    #[must_use]
    pub fn legal_cards(&self) -> Vec<Card> {
        super::entities::legal_cards(&self.hand, &self.public.trick)
    }
}

impl Round {
    #[must_use]
    pub fn public_view(&self) -> PublicView {
        let seats = self
            .seats()
            .iter()
            .enumerate()
            .map(|(index, seat)| SeatView {
                seat: index,
                id: seat.id.clone(),
                display_name: seat.display_name.clone(),
                team: seat.team,
                hand_size: seat.hand.len(),
                tricks_won: seat.tricks_won,
                bid: seat.bid,
                is_automated: seat.is_automated,
            })
            .collect();
        let challenge = self.challenge();
        let log = self.log();
        PublicView {
            phase: self.phase(),
            seats,
            dealer: self.dealer(),
            current_turn: self.current_turn(),
            trick_leader: self.trick_leader(),
            current_bid: self.current_bid(),
            leading_bidder: self.leading_bidder(),
            bid_winner: self.bid_winner(),
            trump: self.trump(),
            trick: self.trick().to_vec(),
            scores: self.scores(),
            consecutive_tricks: self.streaks(),
            challenge: ChallengeView {
                eligible: challenge.eligible,
                activated: challenge.activated,
                team_owner: challenge.team_owner,
                awaiting_decision: challenge.awaiting_decision,
            },
            log: log[log.len().saturating_sub(VIEW_LOG_LINES)..].to_vec(),
            winner: self.winner(),
        }
    }

    /// `None` if `seat` is out of range.
    #[must_use]
    pub fn private_view(&self, seat: SeatIndex) -> Option<PrivateView> {
        let hand = self.seats().get(seat)?.hand.clone();
        Some(PrivateView {
            seat,
            hand,
            public: self.public_view(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Participant;
    use rand::{SeedableRng, rngs::StdRng};

    fn dealt_round() -> Round {
        let participants = (0..6)
            .map(|i| Participant::human(&format!("p{i}"), &format!("Player {i}")))
            .collect();
        let mut round = Round::new(participants).unwrap();
        round.begin(&mut StdRng::seed_from_u64(5)).unwrap();
        round
    }

    #[test]
    fn test_public_view_hides_hands() {
        let view = dealt_round().public_view();
        assert_eq!(view.phase, Phase::Bidding);
        assert!(view.seats.iter().all(|s| s.hand_size == 8));
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("\"hand\""));
    }

    #[test]
    fn test_private_view_has_own_hand() {
        let round = dealt_round();
        let view = round.private_view(4).unwrap();
        assert_eq!(view.hand, round.seats()[4].hand);
        assert_eq!(view.team(), Team::A);
        assert!(round.private_view(6).is_none());
    }

    #[test]
    fn test_log_is_truncated_to_recent_lines() {
        let mut round = dealt_round();
        for seat in [1, 2, 3, 4, 5, 0] {
            round.submit_bid(seat, Bid::Pass).unwrap();
        }
        let winner = round.bid_winner().unwrap();
        round.select_trump(winner, Suit::Hearts).unwrap();
        for _ in 0..6 {
            let seat = round.current_turn();
            let card = round.legal_cards(seat)[0];
            round.play_card(seat, card).unwrap();
        }
        let view = round.public_view();
        assert!(round.log().len() > VIEW_LOG_LINES);
        assert_eq!(view.log.len(), VIEW_LOG_LINES);
        assert_eq!(view.log.last(), round.log().last());
        assert!(view.winning_play().is_some());
    }
}
