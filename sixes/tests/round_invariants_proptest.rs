//! Property-based checks of round invariants over randomly dealt and
//! bot-played rounds.

mod common;

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use sixes::bot::BotDecisionMaker;
use sixes::game::{
    Command, Phase, Round,
    constants::{CHALLENGE_PENALTY, CHALLENGE_REWARD, DECK_SIZE, NUM_SEATS},
    entities::{Bid, Card, Deck, Play, Suit, legal_cards, trick_winner},
};
use sixes::table::BotDifficulty;

fn difficulty(index: u8) -> BotDifficulty {
    match index % 3 {
        0 => BotDifficulty::Easy,
        1 => BotDifficulty::Medium,
        _ => BotDifficulty::Hard,
    }
}

fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut deck = Deck::new();
    deck.shuffle(&mut StdRng::seed_from_u64(seed));
    deck.cards().to_vec()
}

fn suit_strategy() -> impl Strategy<Value = Option<Suit>> {
    prop_oneof![
        Just(None),
        Just(Some(Suit::Spades)),
        Just(Some(Suit::Hearts)),
        Just(Some(Suit::Diamonds)),
        Just(Some(Suit::Clubs)),
    ]
}

proptest! {
    #[test]
    fn bot_rounds_conserve_cards_and_score_once(seed in any::<u64>(), level in 0u8..3) {
        let mut round = Round::new(common::bots()).unwrap();
        round.begin(&mut StdRng::seed_from_u64(seed)).unwrap();
        let mut maker = BotDecisionMaker::with_seed(difficulty(level), seed);

        let mut last_bid = 0;
        let mut steps = 0;
        while round.phase() != Phase::Scoring && round.phase() != Phase::GameOver {
            prop_assert_eq!(round.cards_accounted_for(), DECK_SIZE);
            if round.is_trick_complete() {
                round.resolve_trick().unwrap();
            } else {
                let seat = round.acting_seat().unwrap();
                let view = round.private_view(seat).unwrap();
                let command = maker.decide(&view).unwrap();
                round.apply(seat, command).unwrap();
            }
            if round.phase() == Phase::Bidding {
                prop_assert!(round.current_bid() >= last_bid);
                last_bid = round.current_bid();
            }
            steps += 1;
            prop_assert!(steps < 200);
        }

        let scores = round.scores();
        let delta = scores.a + scores.b;
        let bid = i32::from(round.current_bid());
        prop_assert!(
            [bid, -2 * bid, CHALLENGE_REWARD, -CHALLENGE_PENALTY].contains(&delta),
            "unexpected score change {}", delta
        );
        prop_assert!(scores.a == 0 || scores.b == 0);
        prop_assert_eq!(round.cards_accounted_for(), DECK_SIZE);
    }

    #[test]
    fn bids_only_go_up(seed in any::<u64>(), calls in prop::collection::vec(4u8..10, 6)) {
        let mut round = Round::new(common::humans()).unwrap();
        round.begin(&mut StdRng::seed_from_u64(seed)).unwrap();

        for value in calls {
            let seat = round.current_turn();
            let before = round.current_bid();
            let accepted = round.submit_bid(seat, Bid::Call(value)).is_ok();
            prop_assert_eq!(accepted, (5..=8).contains(&value) && value > before);
            if !accepted {
                round.submit_bid(seat, Bid::Pass).unwrap();
            }
            prop_assert!(round.current_bid() >= before);
        }
        prop_assert_eq!(round.phase(), Phase::TrumpSelection);
        prop_assert!((5..=8).contains(&round.current_bid()));
    }

    #[test]
    fn trick_winner_is_highest_trump_or_lead(seed in any::<u64>(), trump in suit_strategy()) {
        let deck = shuffled_deck(seed);
        let plays: Vec<Play> = deck
            .iter()
            .take(NUM_SEATS)
            .enumerate()
            .map(|(seat, card)| Play { seat, card: *card })
            .collect();

        let winner = plays[trick_winner(&plays, trump).unwrap()].card;
        let lead = plays[0].card.suit;
        let deciding_suit = match trump {
            Some(suit) if plays.iter().any(|play| play.card.suit == suit) => suit,
            _ => lead,
        };
        prop_assert_eq!(winner.suit, deciding_suit);
        for play in &plays {
            if play.card.suit == deciding_suit {
                prop_assert!(play.card.rank <= winner.rank);
            }
        }
    }

    #[test]
    fn legal_cards_follow_suit(seed in any::<u64>(), lead_index in 8usize..48) {
        let deck = shuffled_deck(seed);
        let hand = &deck[..8];
        let lead = Play { seat: 0, card: deck[lead_index] };

        let legal = legal_cards(hand, &[lead]);
        prop_assert!(!legal.is_empty());
        prop_assert!(legal.iter().all(|card| hand.contains(card)));
        if hand.iter().any(|card| card.suit == lead.card.suit) {
            prop_assert!(legal.iter().all(|card| card.suit == lead.card.suit));
        } else {
            prop_assert_eq!(legal.len(), hand.len());
        }
        prop_assert_eq!(legal_cards(hand, &[]).len(), hand.len());
    }
}

#[test]
fn test_bot_commands_target_acting_seat() {
    let mut round = Round::new(common::bots()).unwrap();
    round.begin(&mut StdRng::seed_from_u64(21)).unwrap();
    let mut maker = BotDecisionMaker::with_seed(BotDifficulty::Hard, 21);
    let seat = round.acting_seat().unwrap();
    let command = maker.decide(&round.private_view(seat).unwrap()).unwrap();
    assert!(matches!(command, Command::SubmitBid(_)));
}
