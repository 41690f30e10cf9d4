//! Round state machine.
//!
//! A [`Round`] owns one deal of the match: the six seats and their hands,
//! the bidding, the trump suit, the trick in progress, the challenge
//! sub-rule and the cumulative scores carried in from earlier rounds. Every
//! mutation goes through [`Round::apply`] (or one of the typed entry points
//! it dispatches to), which validates phase and actor before touching any
//! state. A rejected command leaves the round exactly as it was.
//!
//! Trick resolution is a separate step ([`Round::resolve_trick`]) so a
//! driver can keep a complete trick visible for a while before clearing it.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fmt,
    ops::{Index, IndexMut},
};

use super::constants::{
    CARDS_PER_HAND, CHALLENGE_MIN_BID, CHALLENGE_PENALTY, CHALLENGE_REWARD, CHALLENGE_STREAK,
    DECK_SIZE, FORCED_BID, LOSING_SCORE, NUM_SEATS, TRICKS_PER_ROUND, WINNING_SCORE,
};
use super::entities::{
    Bid, Card, Deck, Participant, ParticipantId, Play, Seat, SeatIndex, Suit, Team, legal_cards,
    next_seat, trick_winner,
};
use super::errors::{GameError, IllegalReason};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Waiting,
    Bidding,
    TrumpSelection,
    Playing,
    SpecialRuleDecision,
    Scoring,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "WAITING",
            Self::Bidding => "BIDDING",
            Self::TrumpSelection => "TRUMP_SELECTION",
            Self::Playing => "PLAYING",
            Self::SpecialRuleDecision => "SPECIAL_RULE_DECISION",
            Self::Scoring => "SCORING",
            Self::GameOver => "GAME_OVER",
        };
        write!(f, "{repr}")
    }
}

/// A value kept per team.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PerTeam<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerTeam<T> {
    pub const fn new(a: T, b: T) -> Self {
        Self { a, b }
    }
}

impl<T> Index<Team> for PerTeam<T> {
    type Output = T;

    fn index(&self, team: Team) -> &T {
        match team {
            Team::A => &self.a,
            Team::B => &self.b,
        }
    }
}

impl<T> IndexMut<Team> for PerTeam<T> {
    fn index_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::A => &mut self.a,
            Team::B => &mut self.b,
        }
    }
}

pub type Scores = PerTeam<i32>;

/// State of the challenge ("streak") sub-rule for the current round.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Challenge {
    pub eligible: bool,
    pub activated: bool,
    pub team_owner: Option<Team>,
    pub awaiting_decision: bool,
}

/// Everything a participant (or a bot on their behalf) can ask the round
/// to do.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Command {
    SubmitBid(Bid),
    SelectTrump(Suit),
    PlayCard(Card),
    DecideSpecialRule(bool),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubmitBid(bid) => write!(f, "bid {bid}"),
            Self::SelectTrump(suit) => write!(f, "select trump {suit}"),
            Self::PlayCard(card) => write!(f, "play {card}"),
            Self::DecideSpecialRule(true) => write!(f, "activate challenge"),
            Self::DecideSpecialRule(false) => write!(f, "decline challenge"),
        }
    }
}

/// Entries of the human-readable round log.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum RoundEvent {
    Dealt { dealer: String },
    Passed(String),
    Called(String, u8),
    ForcedBid(String),
    WonBidding(String, u8),
    TrumpSelected(String, Suit),
    CardPlayed(String, Card),
    TrickWon(String, Team),
    ChallengeOffered(Team),
    ChallengeActivated(Team),
    ChallengeDeclined(Team),
    ChallengeBroken(Team),
    Scored(Team, i32),
    MatchWon(Team),
}

impl fmt::Display for RoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Dealt { dealer } => format!("cards dealt, {dealer} deals"),
            Self::Passed(name) => format!("{name} passes"),
            Self::Called(name, value) => format!("{name} bids {value}"),
            Self::ForcedBid(name) => format!("everyone passed, {name} is forced to bid 5"),
            Self::WonBidding(name, value) => format!("{name} wins the bidding at {value}"),
            Self::TrumpSelected(name, suit) => format!("{name} picks {suit} as trump"),
            Self::CardPlayed(name, card) => format!("{name} plays {card}"),
            Self::TrickWon(name, team) => format!("{name} (team {team}) wins the trick"),
            Self::ChallengeOffered(team) => format!("team {team} may activate the challenge"),
            Self::ChallengeActivated(team) => format!("team {team} activates the challenge"),
            Self::ChallengeDeclined(team) => format!("team {team} declines the challenge"),
            Self::ChallengeBroken(team) => format!("team {team} loses a trick under the challenge"),
            Self::Scored(team, delta) => format!("team {team} scores {delta:+}"),
            Self::MatchWon(team) => format!("team {team} wins the match"),
        };
        write!(f, "{repr}")
    }
}

/// One deal of the match, from bidding through scoring.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Round {
    phase: Phase,
    seats: [Seat; NUM_SEATS],
    dealer: SeatIndex,
    current_turn: SeatIndex,
    current_bid: u8,
    /// Highest caller while bidding is still open.
    leading_bidder: Option<SeatIndex>,
    bid_winner: Option<SeatIndex>,
    trump: Option<Suit>,
    trick: Vec<Play>,
    trick_leader: SeatIndex,
    completed_tricks: usize,
    streaks: PerTeam<u8>,
    challenge: Challenge,
    scores: Scores,
    log: Vec<String>,
    winner: Option<Team>,
}

impl Round {
    /// Seats a fresh match: dealer at seat 0 and both scores at zero.
    pub fn new(participants: Vec<Participant>) -> Result<Self, GameError> {
        Self::resume(participants, 0, Scores::default())
    }

    /// Seats a round of an ongoing match with the given dealer and scores.
    pub fn resume(
        participants: Vec<Participant>,
        dealer: SeatIndex,
        scores: Scores,
    ) -> Result<Self, GameError> {
        let participants: [Participant; NUM_SEATS] =
            participants.try_into().map_err(|rejected: Vec<Participant>| {
                GameError::InvalidRoster(format!(
                    "need exactly {NUM_SEATS} participants, got {}",
                    rejected.len()
                ))
            })?;
        let mut ids = HashSet::new();
        for participant in &participants {
            if !ids.insert(participant.id.clone()) {
                return Err(GameError::InvalidRoster(format!(
                    "{} is seated twice",
                    participant.id
                )));
            }
        }
        if dealer >= NUM_SEATS {
            return Err(GameError::InvalidRoster(format!(
                "dealer seat {dealer} out of range"
            )));
        }

        let mut index = 0;
        let seats = participants.map(|participant| {
            let seat = Seat::new(index, participant);
            index += 1;
            seat
        });
        Ok(Self {
            phase: Phase::Waiting,
            seats,
            dealer,
            current_turn: next_seat(dealer),
            current_bid: 0,
            leading_bidder: None,
            bid_winner: None,
            trump: None,
            trick: Vec::with_capacity(NUM_SEATS),
            trick_leader: next_seat(dealer),
            completed_tricks: 0,
            streaks: PerTeam::default(),
            challenge: Challenge::default(),
            scores,
            log: Vec::new(),
            winner: None,
        })
    }

    /// Shuffles a fresh deck and deals it, opening the bidding.
    pub fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        let mut deck = Deck::new();
        deck.shuffle(rng);
        self.begin_with_hands(deck.deal())
    }

    /// Deals the given hands, opening the bidding. The hands must partition
    /// the 48-card deck into six hands of eight.
    pub fn begin_with_hands(&mut self, hands: [Vec<Card>; NUM_SEATS]) -> Result<(), GameError> {
        if self.phase != Phase::Waiting {
            return Err(IllegalReason::WrongPhase.into());
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for hand in &hands {
            if hand.len() != CARDS_PER_HAND || !hand.iter().all(|card| seen.insert(*card)) {
                return Err(GameError::InvalidRoster(
                    "hands must split the deck into six hands of eight".to_string(),
                ));
            }
        }

        for (seat, mut hand) in self.seats.iter_mut().zip(hands) {
            hand.sort();
            seat.hand = hand;
            seat.tricks_won = 0;
            seat.bid = None;
        }
        self.phase = Phase::Bidding;
        self.current_turn = next_seat(self.dealer);
        let dealer = self.seats[self.dealer].display_name.clone();
        self.record(RoundEvent::Dealt { dealer });
        Ok(())
    }

    /// Builds the next round of the match: dealer moves one seat, scores
    /// carry over, and a freshly shuffled deck is dealt.
    pub fn next_round<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Round, GameError> {
        if self.phase != Phase::Scoring {
            return Err(IllegalReason::WrongPhase.into());
        }
        let mut round = Self::resume(self.participants(), next_seat(self.dealer), self.scores)?;
        round.begin(rng)?;
        Ok(round)
    }

    /// Applies a command on behalf of the participant with the given identity.
    pub fn apply_as(&mut self, id: &ParticipantId, command: Command) -> Result<(), GameError> {
        let seat = self
            .seat_of(id)
            .ok_or(GameError::IllegalAction(IllegalReason::UnknownParticipant))?;
        self.apply(seat, command)
    }

    /// Applies a command on behalf of the given seat.
    pub fn apply(&mut self, seat: SeatIndex, command: Command) -> Result<(), GameError> {
        if seat >= NUM_SEATS {
            return Err(IllegalReason::UnknownParticipant.into());
        }
        match command {
            Command::SubmitBid(bid) => self.submit_bid(seat, bid),
            Command::SelectTrump(suit) => self.select_trump(seat, suit),
            Command::PlayCard(card) => self.play_card(seat, card),
            Command::DecideSpecialRule(activate) => self.decide_special_rule(seat, activate),
        }
    }

    pub fn submit_bid(&mut self, seat: SeatIndex, bid: Bid) -> Result<(), GameError> {
        self.ensure_phase(Phase::Bidding)?;
        self.ensure_turn(seat)?;

        let bid = match bid {
            Bid::Call(_) if bid.is_valid_call(self.current_bid) => bid,
            Bid::Call(value) if self.seats[seat].is_automated => {
                debug!("downgrading automated bid {value} at seat {seat} to a pass");
                Bid::Pass
            }
            Bid::Call(_) => return Err(GameError::InvalidBid),
            Bid::Pass => Bid::Pass,
        };

        let name = self.seats[seat].display_name.clone();
        self.seats[seat].bid = Some(bid);
        match bid {
            Bid::Call(value) => {
                self.current_bid = value;
                self.leading_bidder = Some(seat);
                self.record(RoundEvent::Called(name, value));
            }
            Bid::Pass => self.record(RoundEvent::Passed(name)),
        }

        let next = next_seat(seat);
        if next == next_seat(self.dealer) {
            self.close_bidding();
        } else {
            self.current_turn = next;
        }
        Ok(())
    }

    fn close_bidding(&mut self) {
        let winner = match self.leading_bidder {
            Some(seat) => seat,
            None => {
                self.current_bid = FORCED_BID;
                let name = self.seats[self.dealer].display_name.clone();
                self.record(RoundEvent::ForcedBid(name));
                self.dealer
            }
        };
        let name = self.seats[winner].display_name.clone();
        self.record(RoundEvent::WonBidding(name, self.current_bid));
        self.bid_winner = Some(winner);
        self.current_turn = winner;
        self.phase = Phase::TrumpSelection;
    }

    pub fn select_trump(&mut self, seat: SeatIndex, suit: Suit) -> Result<(), GameError> {
        self.ensure_phase(Phase::TrumpSelection)?;
        if self.bid_winner != Some(seat) {
            return Err(IllegalReason::NotBidWinner.into());
        }

        self.trump = Some(suit);
        let name = self.seats[seat].display_name.clone();
        self.record(RoundEvent::TrumpSelected(name, suit));
        self.trick_leader = next_seat(self.dealer);
        self.current_turn = self.trick_leader;
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Plays a card into the current trick. A sixth card completes the
    /// trick; it then stays on the table until [`Round::resolve_trick`].
    pub fn play_card(&mut self, seat: SeatIndex, card: Card) -> Result<(), GameError> {
        self.ensure_phase(Phase::Playing)?;
        if self.is_trick_complete() {
            return Err(IllegalReason::TrickPending.into());
        }
        self.ensure_turn(seat)?;

        let hand = &self.seats[seat].hand;
        let position = hand
            .iter()
            .position(|held| *held == card)
            .ok_or(GameError::CardNotHeld)?;
        if let Some(lead) = self.lead_suit() {
            if card.suit != lead && self.seats[seat].holds_suit(lead) {
                return Err(GameError::MustFollowSuit);
            }
        }

        self.seats[seat].hand.remove(position);
        self.trick.push(Play { seat, card });
        let name = self.seats[seat].display_name.clone();
        self.record(RoundEvent::CardPlayed(name, card));
        if !self.is_trick_complete() {
            self.current_turn = next_seat(seat);
        }
        Ok(())
    }

    /// Resolves a complete trick and returns the winning seat.
    ///
    /// The winner leads next. Afterwards the challenge rule is checked and
    /// the round is scored if it is over, so the phase may move to
    /// `SpecialRuleDecision`, `Scoring` or `GameOver`.
    pub fn resolve_trick(&mut self) -> Result<SeatIndex, GameError> {
        self.ensure_phase(Phase::Playing)?;
        if !self.is_trick_complete() {
            return Err(IllegalReason::WrongPhase.into());
        }
        let winner = trick_winner(&self.trick, self.trump)
            .map(|index| self.trick[index].seat)
            .ok_or(GameError::IllegalAction(IllegalReason::WrongPhase))?;

        let team = Team::for_seat(winner);
        self.seats[winner].tricks_won += 1;
        self.completed_tricks += 1;
        self.trick.clear();
        self.trick_leader = winner;
        self.current_turn = winner;
        self.streaks[team] += 1;
        self.streaks[team.opponent()] = 0;
        let name = self.seats[winner].display_name.clone();
        self.record(RoundEvent::TrickWon(name, team));

        if self.challenge.activated {
            if self.challenge.team_owner != Some(team) {
                self.record(RoundEvent::ChallengeBroken(team.opponent()));
                self.score_round();
                return Ok(winner);
            }
        } else if !self.challenge.eligible
            && self.calling_team() == Some(team)
            && self.streaks[team] == CHALLENGE_STREAK
            && self.current_bid >= CHALLENGE_MIN_BID
        {
            self.challenge.eligible = true;
            self.challenge.awaiting_decision = true;
            self.phase = Phase::SpecialRuleDecision;
            self.record(RoundEvent::ChallengeOffered(team));
            return Ok(winner);
        }

        if self.hands_empty() {
            self.score_round();
        }
        Ok(winner)
    }

    /// Any member of the calling team may accept or decline the challenge.
    pub fn decide_special_rule(&mut self, seat: SeatIndex, activate: bool) -> Result<(), GameError> {
        self.ensure_phase(Phase::SpecialRuleDecision)?;
        if !self.challenge.awaiting_decision {
            return Err(IllegalReason::WrongPhase.into());
        }
        let team = Team::for_seat(seat);
        if self.calling_team() != Some(team) {
            return Err(IllegalReason::NotOwningTeam.into());
        }

        self.challenge.awaiting_decision = false;
        if activate {
            self.challenge.activated = true;
            self.challenge.team_owner = Some(team);
            self.record(RoundEvent::ChallengeActivated(team));
        } else {
            self.challenge.eligible = false;
            self.record(RoundEvent::ChallengeDeclined(team));
        }

        if self.hands_empty() {
            self.score_round();
        } else {
            self.phase = Phase::Playing;
        }
        Ok(())
    }

    fn score_round(&mut self) {
        let Some(caller) = self.calling_team() else {
            return;
        };
        let (team, delta) = if self.challenge.activated {
            let owner = self.challenge.team_owner.unwrap_or(caller);
            if self.tricks_won_by(owner) == TRICKS_PER_ROUND {
                (owner, CHALLENGE_REWARD)
            } else {
                (owner, -CHALLENGE_PENALTY)
            }
        } else {
            let bid = i32::from(self.current_bid);
            if self.tricks_won_by(caller) >= self.current_bid {
                (caller, bid)
            } else {
                (caller, -2 * bid)
            }
        };
        self.scores[team] += delta;
        self.record(RoundEvent::Scored(team, delta));

        self.winner = match_winner(self.scores);
        match self.winner {
            Some(winner) => {
                self.record(RoundEvent::MatchWon(winner));
                self.phase = Phase::GameOver;
            }
            None => self.phase = Phase::Scoring,
        }
    }

    fn record(&mut self, event: RoundEvent) {
        debug!("{event}");
        self.log.push(event.to_string());
    }

    fn ensure_phase(&self, phase: Phase) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(IllegalReason::WrongPhase.into())
        }
    }

    fn ensure_turn(&self, seat: SeatIndex) -> Result<(), GameError> {
        if self.current_turn == seat {
            Ok(())
        } else {
            Err(IllegalReason::NotYourTurn.into())
        }
    }

    fn hands_empty(&self) -> bool {
        self.seats.iter().all(|seat| seat.hand.is_empty())
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn seats(&self) -> &[Seat; NUM_SEATS] {
        &self.seats
    }

    #[must_use]
    pub fn seat_of(&self, id: &ParticipantId) -> Option<SeatIndex> {
        self.seats.iter().position(|seat| &seat.id == id)
    }

    /// The roster in seat order, as it would be handed to a new round.
    #[must_use]
    pub fn participants(&self) -> Vec<Participant> {
        self.seats
            .iter()
            .map(|seat| Participant {
                id: seat.id.clone(),
                display_name: seat.display_name.clone(),
                is_automated: seat.is_automated,
            })
            .collect()
    }

    /// Seat expected to act next, if any. While the challenge is offered
    /// this is the seat that won the offering trick, though any member of
    /// the calling team may decide.
    #[must_use]
    pub fn acting_seat(&self) -> Option<SeatIndex> {
        match self.phase {
            Phase::Bidding | Phase::SpecialRuleDecision => Some(self.current_turn),
            Phase::Playing if !self.is_trick_complete() => Some(self.current_turn),
            Phase::TrumpSelection => self.bid_winner,
            _ => None,
        }
    }

    #[must_use]
    pub fn dealer(&self) -> SeatIndex {
        self.dealer
    }

    #[must_use]
    pub fn current_turn(&self) -> SeatIndex {
        self.current_turn
    }

    #[must_use]
    pub fn current_bid(&self) -> u8 {
        self.current_bid
    }

    #[must_use]
    pub fn leading_bidder(&self) -> Option<SeatIndex> {
        self.leading_bidder
    }

    #[must_use]
    pub fn bid_winner(&self) -> Option<SeatIndex> {
        self.bid_winner
    }

    #[must_use]
    pub fn calling_team(&self) -> Option<Team> {
        self.bid_winner.map(Team::for_seat)
    }

    #[must_use]
    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    #[must_use]
    pub fn trick(&self) -> &[Play] {
        &self.trick
    }

    #[must_use]
    pub fn lead_suit(&self) -> Option<Suit> {
        self.trick.first().map(|play| play.card.suit)
    }

    #[must_use]
    pub fn is_trick_complete(&self) -> bool {
        self.trick.len() == NUM_SEATS
    }

    #[must_use]
    pub fn trick_leader(&self) -> SeatIndex {
        self.trick_leader
    }

    #[must_use]
    pub fn streaks(&self) -> PerTeam<u8> {
        self.streaks
    }

    #[must_use]
    pub fn challenge(&self) -> Challenge {
        self.challenge
    }

    #[must_use]
    pub fn scores(&self) -> Scores {
        self.scores
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    #[must_use]
    pub fn tricks_won_by(&self, team: Team) -> u8 {
        self.seats
            .iter()
            .filter(|seat| seat.team == team)
            .map(|seat| seat.tricks_won)
            .sum()
    }

    /// Cards the given seat may play right now.
    #[must_use]
    pub fn legal_cards(&self, seat: SeatIndex) -> Vec<Card> {
        match self.seats.get(seat) {
            Some(seat) => legal_cards(&seat.hand, &self.trick),
            None => Vec::new(),
        }
    }

    /// Cards in hands, in the current trick and in completed tricks. Always
    /// the full deck once the round has been dealt.
    #[must_use]
    pub fn cards_accounted_for(&self) -> usize {
        let in_hands: usize = self.seats.iter().map(|seat| seat.hand.len()).sum();
        in_hands + self.trick.len() + self.completed_tricks * NUM_SEATS
    }
}

/// Reaching the target wins outright; collapsing below the floor hands the
/// match to the other team. Checked in that order.
#[must_use]
pub fn match_winner(scores: Scores) -> Option<Team> {
    if scores.a >= WINNING_SCORE {
        Some(Team::A)
    } else if scores.b >= WINNING_SCORE {
        Some(Team::B)
    } else if scores.a <= LOSING_SCORE {
        Some(Team::B)
    } else if scores.b <= LOSING_SCORE {
        Some(Team::A)
    } else {
        None
    }
}
