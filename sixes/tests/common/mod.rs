//! Shared fixtures for integration tests.
#![allow(dead_code)]

use sixes::game::{
    Round, Scores,
    constants::{NUM_SEATS, TRICKS_PER_ROUND},
    entities::{Bid, Card, Participant, Rank, SeatIndex, Suit},
};

/// Lead suit of each scripted trick. Every seat holds exactly one card of
/// that suit for the trick, so following suit is always possible.
pub const TRICK_SUITS: [Suit; 8] = [
    Suit::Spades,
    Suit::Spades,
    Suit::Hearts,
    Suit::Hearts,
    Suit::Diamonds,
    Suit::Diamonds,
    Suit::Clubs,
    Suit::Clubs,
];

pub fn humans() -> Vec<Participant> {
    (0..NUM_SEATS)
        .map(|i| Participant::human(&format!("p{i}"), &format!("Player {i}")))
        .collect()
}

pub fn bots() -> Vec<Participant> {
    (0..NUM_SEATS)
        .map(|i| Participant::bot(&format!("bot-{i}"), &format!("Bot {i}")))
        .collect()
}

/// Card the given seat plays in the given trick. The scripted winner holds
/// the top rank of the trick's half of the suit.
pub fn scripted_card(winners: &[SeatIndex; 8], trick: usize, seat: SeatIndex) -> Card {
    let ranks = if trick % 2 == 0 {
        &Rank::ALL[..6]
    } else {
        &Rank::ALL[6..]
    };
    let rank = if seat == winners[trick] {
        ranks[5]
    } else {
        let position = (0..NUM_SEATS)
            .filter(|other| *other != winners[trick])
            .position(|other| other == seat)
            .unwrap_or(0);
        ranks[position]
    };
    Card::new(rank, TRICK_SUITS[trick])
}

pub fn scripted_hands(winners: &[SeatIndex; 8]) -> [Vec<Card>; NUM_SEATS] {
    std::array::from_fn(|seat| {
        (0..usize::from(TRICKS_PER_ROUND))
            .map(|trick| scripted_card(winners, trick, seat))
            .collect()
    })
}

/// Round dealt from the scripted hands, with seat 3 calling `bid` and
/// picking hearts. Dealer is seat 0.
pub fn round_in_play(winners: &[SeatIndex; 8], bid: u8, scores: Scores) -> Round {
    let mut round = Round::resume(humans(), 0, scores).unwrap();
    round.begin_with_hands(scripted_hands(winners)).unwrap();
    for seat in [1, 2, 3, 4, 5, 0] {
        let choice = if seat == 3 { Bid::Call(bid) } else { Bid::Pass };
        round.submit_bid(seat, choice).unwrap();
    }
    round.select_trump(3, Suit::Hearts).unwrap();
    round
}

/// Plays the scripted trick starting from the current leader and resolves it.
pub fn play_trick(round: &mut Round, winners: &[SeatIndex; 8], trick: usize) -> SeatIndex {
    let leader = round.trick_leader();
    for offset in 0..NUM_SEATS {
        let seat = (leader + offset) % NUM_SEATS;
        round
            .play_card(seat, scripted_card(winners, trick, seat))
            .unwrap();
    }
    round.resolve_trick().unwrap()
}
