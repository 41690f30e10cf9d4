//! The all-or-nothing challenge offered after five consecutive tricks.

mod common;

use common::{play_trick, round_in_play};
use sixes::game::{
    GameError, IllegalReason, Phase, Scores,
    entities::Team,
};

/// B takes the first five tricks on a call of six.
fn offered(winners: &[usize; 8]) -> sixes::game::Round {
    let mut round = round_in_play(winners, 6, Scores::default());
    for trick in 0..5 {
        play_trick(&mut round, winners, trick);
    }
    assert_eq!(round.phase(), Phase::SpecialRuleDecision);
    assert!(round.challenge().eligible);
    assert!(round.challenge().awaiting_decision);
    assert_eq!(round.streaks()[Team::B], 5);
    round
}

#[test]
fn test_challenge_completed() {
    let winners = [3, 5, 1, 3, 5, 1, 3, 5];
    let mut round = offered(&winners);
    round.decide_special_rule(1, true).unwrap();
    assert_eq!(round.phase(), Phase::Playing);
    assert_eq!(round.challenge().team_owner, Some(Team::B));

    for trick in 5..8 {
        play_trick(&mut round, &winners, trick);
    }
    assert_eq!(round.tricks_won_by(Team::B), 8);
    assert_eq!(round.scores(), Scores::new(0, 16));
    assert_eq!(round.phase(), Phase::Scoring);
}

#[test]
fn test_challenge_broken_scores_immediately() {
    let winners = [3, 5, 1, 3, 5, 0, 3, 5];
    let mut round = offered(&winners);
    round.decide_special_rule(5, true).unwrap();

    play_trick(&mut round, &winners, 5);
    assert_eq!(round.phase(), Phase::Scoring);
    assert_eq!(round.scores(), Scores::new(0, -32));
    assert!(round.seats().iter().all(|seat| seat.hand.len() == 2));
    assert!(
        round
            .log()
            .iter()
            .any(|line| line == "team B loses a trick under the challenge")
    );
}

#[test]
fn test_challenge_declined_scores_normally() {
    let winners = [3, 5, 1, 3, 5, 0, 2, 1];
    let mut round = offered(&winners);
    round.decide_special_rule(3, false).unwrap();
    assert_eq!(round.phase(), Phase::Playing);
    assert!(!round.challenge().activated);

    for trick in 5..8 {
        play_trick(&mut round, &winners, trick);
    }
    assert_eq!(round.tricks_won_by(Team::B), 6);
    assert_eq!(round.scores(), Scores::new(0, 6));
}

#[test]
fn test_only_calling_team_decides() {
    let winners = [3, 5, 1, 3, 5, 1, 3, 5];
    let mut round = offered(&winners);
    assert_eq!(
        round.decide_special_rule(0, true),
        Err(GameError::IllegalAction(IllegalReason::NotOwningTeam))
    );
    round.decide_special_rule(1, false).unwrap();
    assert_eq!(
        round.decide_special_rule(1, true),
        Err(GameError::IllegalAction(IllegalReason::WrongPhase))
    );
}

#[test]
fn test_no_offer_below_minimum_bid() {
    let winners = [3, 5, 1, 3, 5, 1, 3, 5];
    let mut round = round_in_play(&winners, 5, Scores::default());
    for trick in 0..8 {
        play_trick(&mut round, &winners, trick);
        assert_ne!(round.phase(), Phase::SpecialRuleDecision);
    }
    assert_eq!(round.scores(), Scores::new(0, 5));
}
