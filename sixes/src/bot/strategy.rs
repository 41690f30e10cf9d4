//! Bidding, trump and card-play strategies.
//!
//! Strategies are pure functions of the bot's private view and an RNG; the
//! decision maker turns their picks into commands.

use enum_dispatch::enum_dispatch;
use rand::{Rng, RngCore, seq::IndexedRandom};

use super::models::DifficultyParams;
use crate::game::{
    PrivateView,
    constants::{MAX_BID, MIN_BID},
    entities::{Bid, Card, Play, Rank, Suit, Team},
};

#[enum_dispatch]
pub trait BotStrategy {
    fn choose_bid(&self, view: &PrivateView, rng: &mut dyn RngCore) -> Bid;

    fn choose_trump(&self, hand: &[Card], rng: &mut dyn RngCore) -> Suit;

    /// `None` only when the bot has no legal card.
    fn choose_card(&self, view: &PrivateView, rng: &mut dyn RngCore) -> Option<Card>;
}

/// Strategy picked for a difficulty preset.
#[enum_dispatch(BotStrategy)]
#[derive(Debug, Clone)]
pub enum Strategy {
    Casual(CasualStrategy),
    Heuristic(HeuristicStrategy),
}

impl Strategy {
    pub fn from_params(params: DifficultyParams) -> Self {
        if params.plays_randomly {
            CasualStrategy { params }.into()
        } else {
            HeuristicStrategy { params }.into()
        }
    }
}

/// Easy bots: coin-flip bidding and random legal cards.
#[derive(Debug, Clone)]
pub struct CasualStrategy {
    params: DifficultyParams,
}

impl BotStrategy for CasualStrategy {
    fn choose_bid(&self, view: &PrivateView, rng: &mut dyn RngCore) -> Bid {
        if rng.random_bool(self.params.pass_probability) {
            return Bid::Pass;
        }
        let value = (high_card_count(&view.hand) as u8 + 3).clamp(MIN_BID, MAX_BID);
        outbid_or_pass(value, view.public.current_bid)
    }

    fn choose_trump(&self, hand: &[Card], rng: &mut dyn RngCore) -> Suit {
        if rng.random_bool(self.params.random_trump_probability) {
            Suit::ALL[rng.random_range(0..Suit::ALL.len())]
        } else {
            longest_suit(hand)
        }
    }

    fn choose_card(&self, view: &PrivateView, rng: &mut dyn RngCore) -> Option<Card> {
        view.legal_cards().choose(rng).copied()
    }
}

/// Medium and hard bots: hand-strength bidding and trick-aware play.
#[derive(Debug, Clone)]
pub struct HeuristicStrategy {
    params: DifficultyParams,
}

impl HeuristicStrategy {
    fn hand_strength(&self, hand: &[Card]) -> f32 {
        hand.iter()
            .map(|card| match card.rank {
                Rank::Ace | Rank::King | Rank::Queen => 1.0,
                Rank::Jack => self.params.jack_weight,
                Rank::Ten => self.params.ten_weight,
                _ => 0.0,
            })
            .sum()
    }

    fn should_trump(&self, view: &PrivateView, trump: Suit) -> bool {
        let trumps: Vec<&Card> = view.hand.iter().filter(|c| c.suit == trump).collect();
        if trumps.is_empty() {
            return false;
        }
        if self.params.always_trumps {
            return true;
        }
        let trick_has_value = view.public.trick.iter().any(|play| play.card.is_high());
        let strong_trumps = trumps.iter().any(|card| card.is_high());
        (view.public.calling_team() == Some(view.team()) && trick_has_value)
            || (strong_trumps && trick_has_value)
            || trumps.len() <= self.params.short_trump_count
    }
}

impl BotStrategy for HeuristicStrategy {
    fn choose_bid(&self, view: &PrivateView, rng: &mut dyn RngCore) -> Bid {
        let strength = self.hand_strength(&view.hand);
        let value = if strength >= self.params.strong_threshold {
            let extra = (strength / self.params.strength_divisor).floor() as u8;
            (4 + extra).min(MAX_BID)
        } else if strength >= self.params.speculative_threshold
            && rng.random_bool(self.params.speculative_probability)
        {
            MIN_BID
        } else {
            return Bid::Pass;
        };
        outbid_or_pass(value, view.public.current_bid)
    }

    fn choose_trump(&self, hand: &[Card], _rng: &mut dyn RngCore) -> Suit {
        longest_suit(hand)
    }

    fn choose_card(&self, view: &PrivateView, _rng: &mut dyn RngCore) -> Option<Card> {
        let trump = view.public.trump;
        let trick = &view.public.trick;

        let Some(lead) = trick.first().map(|play| play.card.suit) else {
            let strongest_plain = view
                .hand
                .iter()
                .filter(|card| Some(card.suit) != trump)
                .max_by_key(|card| card.rank);
            return strongest_plain.or(view.hand.first()).copied();
        };

        let winning = view.public.winning_play()?;
        let partner_winning = Team::for_seat(winning.seat) == view.team();

        let following: Vec<Card> = view.hand.iter().copied().filter(|c| c.suit == lead).collect();
        if !following.is_empty() {
            if partner_winning {
                return lowest(&following);
            }
            let winners: Vec<Card> = following
                .iter()
                .copied()
                .filter(|card| beats(*card, winning, trump))
                .collect();
            return lowest(&winners).or_else(|| lowest(&following));
        }

        if !partner_winning {
            if let Some(trump) = trump {
                if self.should_trump(view, trump) {
                    let ruffs: Vec<Card> = view
                        .hand
                        .iter()
                        .copied()
                        .filter(|card| card.suit == trump && beats(*card, winning, Some(trump)))
                        .collect();
                    if let Some(card) = lowest(&ruffs) {
                        return Some(card);
                    }
                }
            }
        }
        discard(&view.hand, trump)
    }
}

/// Number of aces, kings and queens.
pub fn high_card_count(hand: &[Card]) -> usize {
    hand.iter().filter(|card| card.is_high()).count()
}

/// Suit with the most cards; ties go to the earlier suit in S, H, D, C order.
pub fn longest_suit(hand: &[Card]) -> Suit {
    let mut best = Suit::ALL[0];
    let mut best_count = 0;
    for suit in Suit::ALL {
        let count = hand.iter().filter(|card| card.suit == suit).count();
        if count > best_count {
            best = suit;
            best_count = count;
        }
    }
    best
}

/// Whether `card` would take the trick from the current winning play.
pub fn beats(card: Card, winning: Play, trump: Option<Suit>) -> bool {
    let current = winning.card;
    if Some(card.suit) == trump && Some(current.suit) != trump {
        return true;
    }
    card.suit == current.suit && card.rank > current.rank
}

fn lowest(cards: &[Card]) -> Option<Card> {
    cards.iter().min_by_key(|card| card.rank).copied()
}

/// Lowest non-trump card, or the lowest trump when only trumps remain.
fn discard(hand: &[Card], trump: Option<Suit>) -> Option<Card> {
    let plain: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|card| Some(card.suit) != trump)
        .collect();
    lowest(&plain).or_else(|| lowest(hand))
}

/// Bots never under-bid; they pass instead.
fn outbid_or_pass(value: u8, current_bid: u8) -> Bid {
    let bid = Bid::Call(value);
    if bid.is_valid_call(current_bid) {
        bid
    } else {
        Bid::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        Round,
        entities::{Participant, SeatIndex},
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn cards(list: &[&str]) -> Vec<Card> {
        list.iter().map(|c| c.parse().unwrap()).collect()
    }

    fn heuristic(params: DifficultyParams) -> Strategy {
        Strategy::from_params(params)
    }

    /// Private view for `seat` with a hand and an in-progress trick led by seat 0.
    fn view(seat: SeatIndex, hand: &[&str], trick: &[&str], trump: Suit, bid_winner: SeatIndex) -> PrivateView {
        let participants = (0..6)
            .map(|i| Participant::bot(&format!("b{i}"), &format!("Bot {i}")))
            .collect();
        let round = Round::new(participants).unwrap();
        let mut view = round.private_view(seat).unwrap();
        view.hand = cards(hand);
        view.public.trump = Some(trump);
        view.public.bid_winner = Some(bid_winner);
        view.public.current_turn = seat;
        view.public.trick = cards(trick)
            .into_iter()
            .enumerate()
            .map(|(i, card)| Play { seat: i, card })
            .collect();
        view
    }

    #[test]
    fn test_longest_suit_breaks_ties_in_suit_order() {
        assert_eq!(longest_suit(&cards(&["3C", "4C", "5D", "6D"])), Suit::Diamonds);
        assert_eq!(longest_suit(&cards(&["3C", "4H", "5D", "6S"])), Suit::Spades);
        assert_eq!(longest_suit(&cards(&["3C", "4C", "5C", "AH"])), Suit::Clubs);
    }

    #[test]
    fn test_heuristic_bidding() {
        let mut rng = StdRng::seed_from_u64(1);
        let medium = heuristic(DifficultyParams::medium());
        let mut strong = view(1, &["AS", "KS", "QS", "AH", "KH", "3C", "4C", "5D"], &[], Suit::Spades, 0);
        strong.public.bid_winner = None;
        // 5 honours: 4 + floor(5 / 1.5) = 7
        assert_eq!(medium.choose_bid(&strong, &mut rng), Bid::Call(7));

        let hard = heuristic(DifficultyParams::hard());
        // 5 honours, no jacks or tens: 4 + 5 = 9, capped at 8
        assert_eq!(hard.choose_bid(&strong, &mut rng), Bid::Call(8));

        strong.public.current_bid = 8;
        assert_eq!(medium.choose_bid(&strong, &mut rng), Bid::Pass);

        let weak = view(1, &["3S", "4S", "5S", "6H", "7H", "8C", "9C", "3D"], &[], Suit::Spades, 0);
        assert_eq!(medium.choose_bid(&weak, &mut rng), Bid::Pass);
        assert_eq!(hard.choose_bid(&weak, &mut rng), Bid::Pass);
    }

    #[test]
    fn test_lead_with_strongest_plain_card() {
        let strategy = heuristic(DifficultyParams::medium());
        let mut rng = StdRng::seed_from_u64(2);
        let mut v = view(0, &["3S", "AH", "KD", "9C"], &[], Suit::Hearts, 0);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("KD".parse().unwrap()));
        v.hand = cards(&["3H", "AH"]);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("3H".parse().unwrap()));
    }

    #[test]
    fn test_follow_suit_cheapest_winner() {
        let strategy = heuristic(DifficultyParams::medium());
        let mut rng = StdRng::seed_from_u64(3);
        // Seat 1 (team B) is winning with the 9S; seat 2 (team A) to play.
        let v = view(2, &["3S", "10S", "KS", "AH"], &["5S", "9S"], Suit::Hearts, 1);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("10S".parse().unwrap()));

        // Partner (seat 0) is winning: play low.
        let v = view(2, &["3S", "10S", "KS"], &["AS", "9S"], Suit::Hearts, 1);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("3S".parse().unwrap()));

        // Nothing beats the ace: play the lowest of the suit.
        let v = view(3, &["4S", "10S"], &["AS", "9S", "5S"], Suit::Hearts, 1);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("4S".parse().unwrap()));
    }

    #[test]
    fn test_void_discards_when_partner_winning() {
        let strategy = heuristic(DifficultyParams::hard());
        let mut rng = StdRng::seed_from_u64(4);
        let v = view(2, &["3H", "QD", "4C"], &["AS", "9S"], Suit::Hearts, 1);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("4C".parse().unwrap()));
    }

    #[test]
    fn test_hard_always_ruffs() {
        let strategy = heuristic(DifficultyParams::hard());
        let mut rng = StdRng::seed_from_u64(5);
        let v = view(2, &["3H", "9H", "JH", "10H", "QD", "4C"], &["5S", "9S"], Suit::Hearts, 0);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("3H".parse().unwrap()));
    }

    #[test]
    fn test_medium_ruff_rules() {
        let strategy = heuristic(DifficultyParams::medium());
        let mut rng = StdRng::seed_from_u64(6);
        // Long weak trump holding, low trick, opponents calling: discard.
        let v = view(2, &["3H", "4H", "5H", "6H", "QD", "4C"], &["5S", "9S"], Suit::Hearts, 1);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("4C".parse().unwrap()));

        // Same hand, but the trick holds a king and our team called.
        let v = view(2, &["3H", "4H", "5H", "6H", "QD", "4C"], &["5S", "KS"], Suit::Hearts, 0);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("3H".parse().unwrap()));

        // Short in trumps: ruff anyway.
        let v = view(2, &["7H", "QD", "4C"], &["5S", "9S"], Suit::Hearts, 1);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("7H".parse().unwrap()));
    }

    #[test]
    fn test_overruff_only_with_a_higher_trump() {
        let strategy = heuristic(DifficultyParams::hard());
        let mut rng = StdRng::seed_from_u64(7);
        let v = view(2, &["3H", "QD"], &["5S", "KH"], Suit::Hearts, 0);
        assert_eq!(strategy.choose_card(&v, &mut rng), Some("QD".parse().unwrap()));
    }

    #[test]
    fn test_casual_plays_legal_cards() {
        let strategy = Strategy::from_params(DifficultyParams::easy());
        let mut rng = StdRng::seed_from_u64(8);
        let v = view(2, &["3S", "10S", "AH", "4C"], &["5S", "9S"], Suit::Hearts, 1);
        for _ in 0..50 {
            let card = strategy.choose_card(&v, &mut rng).unwrap();
            assert_eq!(card.suit, Suit::Spades);
        }
    }

    #[test]
    fn test_casual_bids_are_valid_or_pass() {
        let strategy = Strategy::from_params(DifficultyParams::easy());
        let mut rng = StdRng::seed_from_u64(9);
        let mut v = view(1, &["AS", "KS", "QS", "AH", "KH", "QH", "AC", "KC"], &[], Suit::Spades, 0);
        v.public.current_bid = 6;
        let mut calls = 0;
        for _ in 0..200 {
            match strategy.choose_bid(&v, &mut rng) {
                Bid::Pass => {}
                Bid::Call(value) => {
                    assert!(value > 6 && value <= MAX_BID);
                    calls += 1;
                }
            }
        }
        assert!(calls > 50, "casual bot called {calls} times out of 200");
    }

    #[test]
    fn test_casual_trump_mostly_longest_suit() {
        let strategy = Strategy::from_params(DifficultyParams::easy());
        let mut rng = StdRng::seed_from_u64(10);
        let hand = cards(&["3C", "4C", "5C", "6C", "7C", "AH", "KD", "QS"]);
        let clubs = (0..500)
            .filter(|_| strategy.choose_trump(&hand, &mut rng) == Suit::Clubs)
            .count();
        assert!(clubs > 350, "picked clubs {clubs} times out of 500");
    }
}
