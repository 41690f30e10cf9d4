use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::constants::{CARDS_PER_HAND, DECK_SIZE, MAX_BID, MIN_BID, NUM_SEATS};
use super::errors::GameError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All suits in enumeration order. Bots break ties in this order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    fn letter(self) -> char {
        match self {
            Self::Spades => 'S',
            Self::Hearts => 'H',
            Self::Diamonds => 'D',
            Self::Clubs => 'C',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Suit {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::Spades),
            "H" => Ok(Self::Hearts),
            "D" => Ok(Self::Diamonds),
            "C" => Ok(Self::Clubs),
            _ => Err(GameError::MalformedCard(s.to_string())),
        }
    }
}

/// Card ranks from weakest to strongest. There are no 2s in the deck.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 12] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Rank value used for comparisons within a suit (3=3 ... A=14).
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten => 10,
            Self::Jack => 11,
            Self::Queen => 12,
            Self::King => 13,
            Self::Ace => 14,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Jack => "J".to_string(),
            Self::Queen => "Q".to_string(),
            Self::King => "K".to_string(),
            Self::Ace => "A".to_string(),
            other => other.value().to_string(),
        };
        write!(f, "{repr}")
    }
}

impl FromStr for Rank {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "J" => Self::Jack,
            "Q" => Self::Queen,
            "K" => Self::King,
            "A" => Self::Ace,
            digits => {
                let value: u8 = digits
                    .parse()
                    .map_err(|_| GameError::MalformedCard(s.to_string()))?;
                Self::ALL
                    .into_iter()
                    .find(|rank| rank.value() == value)
                    .ok_or_else(|| GameError::MalformedCard(s.to_string()))?
            }
        };
        Ok(rank)
    }
}

/// Immutable playing card. Ordering sorts by suit, then rank, which is only
/// meant for arranging hands; trick resolution goes through [`trick_winner`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Aces, kings and queens.
    #[must_use]
    pub fn is_high(&self) -> bool {
        matches!(self.rank, Rank::Ace | Rank::King | Rank::Queen)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = GameError;

    /// Parses the short form used in logs, e.g. `10H` or `as`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(idx, _)| idx)
            .filter(|idx| *idx > 0)
            .ok_or_else(|| GameError::MalformedCard(s.to_string()))?;
        let rank = s[..split].parse()?;
        let suit = s[split..].parse()?;
        Ok(Self { suit, rank })
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds the ordered 48-card deck (4 suits x 12 ranks).
    #[must_use]
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card { suit, rank });
            }
        }
        Self { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Deals consecutive runs of 8 cards to the six seats. Each hand comes
    /// back sorted by suit, then rank.
    #[must_use]
    pub fn deal(&self) -> [Vec<Card>; NUM_SEATS] {
        std::array::from_fn(|seat| {
            let mut hand = self.cards[seat * CARDS_PER_HAND..(seat + 1) * CARDS_PER_HAND].to_vec();
            hand.sort();
            hand
        })
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// Even seats play for team A, odd seats for team B.
    #[must_use]
    pub const fn for_seat(seat: SeatIndex) -> Self {
        if seat % 2 == 0 { Self::A } else { Self::B }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::A => "A",
            Self::B => "B",
        };
        write!(f, "{repr}")
    }
}

/// A bidding decision: pass, or call a number of tricks.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Bid {
    Pass,
    Call(u8),
}

impl Bid {
    /// Whether this is a numeric call that may follow `current_bid`.
    #[must_use]
    pub fn is_valid_call(&self, current_bid: u8) -> bool {
        match self {
            Self::Pass => false,
            Self::Call(value) => (MIN_BID..=MAX_BID).contains(value) && *value > current_bid,
        }
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Call(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for Bid {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") {
            return Ok(Self::Pass);
        }
        s.parse().map(Self::Call).map_err(|_| GameError::InvalidBid)
    }
}

/// Type alias for seat positions (0..6) during a round.
pub type SeatIndex = usize;

/// Next seat in turn order.
#[must_use]
pub const fn next_seat(seat: SeatIndex) -> SeatIndex {
    (seat + 1) % NUM_SEATS
}

/// Identity of a participant as known to the transport layer.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Roster entry handed to the engine by the lobby layer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub is_automated: bool,
}

impl Participant {
    pub fn human(id: &str, display_name: &str) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.to_string(),
            is_automated: false,
        }
    }

    pub fn bot(id: &str, display_name: &str) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.to_string(),
            is_automated: true,
        }
    }
}

/// A participant sitting at a fixed seat for the round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seat {
    pub id: ParticipantId,
    pub display_name: String,
    pub team: Team,
    pub hand: Vec<Card>,
    pub tricks_won: u8,
    /// Last bid made this round, if the seat has bid yet.
    pub bid: Option<Bid>,
    pub is_automated: bool,
}

impl Seat {
    pub fn new(index: SeatIndex, participant: Participant) -> Self {
        Self {
            id: participant.id,
            display_name: participant.display_name,
            team: Team::for_seat(index),
            hand: Vec::with_capacity(CARDS_PER_HAND),
            tricks_won: 0,
            bid: None,
            is_automated: participant.is_automated,
        }
    }

    #[must_use]
    pub fn holds_suit(&self, suit: Suit) -> bool {
        self.hand.iter().any(|card| card.suit == suit)
    }
}

/// One card played into a trick.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Play {
    pub seat: SeatIndex,
    pub card: Card,
}

/// Index into `plays` of the play currently winning the trick.
///
/// Trump beats any non-trump card; among cards of one suit the higher rank
/// wins; a card that is neither the lead suit nor trump never wins.
#[must_use]
pub fn trick_winner(plays: &[Play], trump: Option<Suit>) -> Option<usize> {
    let (first, rest) = plays.split_first()?;
    let mut winner = 0;
    let mut winning_card = first.card;
    for (i, play) in rest.iter().enumerate() {
        let card = play.card;
        let beats = if Some(card.suit) == trump && Some(winning_card.suit) != trump {
            true
        } else {
            card.suit == winning_card.suit && card.rank.value() > winning_card.rank.value()
        };
        if beats {
            winner = i + 1;
            winning_card = card;
        }
    }
    Some(winner)
}

/// Cards of `hand` that may legally be played into `trick`.
#[must_use]
pub fn legal_cards(hand: &[Card], trick: &[Play]) -> Vec<Card> {
    if let Some(lead) = trick.first().map(|play| play.card.suit) {
        let following: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead).collect();
        if !following.is_empty() {
            return following;
        }
    }
    hand.to_vec()
}
