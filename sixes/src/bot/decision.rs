//! Bot decision making: turns a private view into a command.

use rand::{SeedableRng, rngs::StdRng};

use super::errors::BotError;
use super::models::DifficultyParams;
use super::strategy::{BotStrategy, Strategy, longest_suit};
use crate::game::{Command, Phase, PrivateView, constants::NUM_SEATS, entities::Bid};
use crate::table::config::BotDifficulty;

/// Bot decision maker
///
/// Produces exactly the commands a human's client would send, so every bot
/// move goes through the same validation as a human one.
#[derive(Debug)]
pub struct BotDecisionMaker {
    rng: StdRng,
    strategy: Strategy,
}

impl BotDecisionMaker {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_os_rng())
    }

    /// Reproducible decisions for a given seed.
    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: BotDifficulty, rng: StdRng) -> Self {
        Self {
            rng,
            strategy: Strategy::from_params(DifficultyParams::from_difficulty(difficulty)),
        }
    }

    /// Decide the next command for the seat the view belongs to.
    ///
    /// # Arguments
    ///
    /// * `view` - The bot's private view of the round
    ///
    /// # Returns
    ///
    /// * `Result<Command, BotError>` - The command, or why none applies
    pub fn decide(&mut self, view: &PrivateView) -> Result<Command, BotError> {
        let public = &view.public;
        match public.phase {
            Phase::Bidding => {
                if !view.is_my_turn() {
                    return Err(BotError::NotYourTurn);
                }
                let bid = match self.strategy.choose_bid(view, &mut self.rng) {
                    Bid::Call(value) if !Bid::Call(value).is_valid_call(public.current_bid) => {
                        Bid::Pass
                    }
                    bid => bid,
                };
                Ok(Command::SubmitBid(bid))
            }
            Phase::TrumpSelection => {
                if public.bid_winner != Some(view.seat) {
                    return Err(BotError::NotYourTurn);
                }
                let suit = self.strategy.choose_trump(&view.hand, &mut self.rng);
                Ok(Command::SelectTrump(suit))
            }
            Phase::Playing => {
                if !view.is_my_turn() || public.trick.len() == NUM_SEATS {
                    return Err(BotError::NotYourTurn);
                }
                self.strategy
                    .choose_card(view, &mut self.rng)
                    .map(Command::PlayCard)
                    .ok_or(BotError::EmptyHand)
            }
            // Bots never take on the challenge.
            Phase::SpecialRuleDecision => {
                if public.calling_team() != Some(view.team()) {
                    return Err(BotError::NotYourTurn);
                }
                Ok(Command::DecideSpecialRule(false))
            }
            phase => Err(BotError::NotActionable(phase)),
        }
    }
}

/// Safe default used when a bot's own decision fails or is rejected.
#[must_use]
pub fn fallback_command(view: &PrivateView) -> Option<Command> {
    match view.public.phase {
        Phase::Bidding => Some(Command::SubmitBid(Bid::Pass)),
        Phase::TrumpSelection => Some(Command::SelectTrump(longest_suit(&view.hand))),
        Phase::Playing => view.legal_cards().first().copied().map(Command::PlayCard),
        Phase::SpecialRuleDecision => Some(Command::DecideSpecialRule(false)),
        Phase::Waiting | Phase::Scoring | Phase::GameOver => None,
    }
}
