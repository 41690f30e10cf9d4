use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use sixes::{
    bot::BotDecisionMaker,
    game::{
        Phase, Round,
        entities::{Deck, Participant, Play, Suit, legal_cards, trick_winner},
    },
    table::BotDifficulty,
};
use std::hint::black_box;

fn bots() -> Vec<Participant> {
    (0..6)
        .map(|i| Participant::bot(&format!("bot{i}"), &format!("Bot {i}")))
        .collect()
}

/// Plays one round to completion with a single decision maker for all seats.
fn play_round(seed: u64, difficulty: BotDifficulty) -> Round {
    let mut round = Round::new(bots()).unwrap();
    round.begin(&mut StdRng::seed_from_u64(seed)).unwrap();
    let mut maker = BotDecisionMaker::with_seed(difficulty, seed);
    while !matches!(round.phase(), Phase::Scoring | Phase::GameOver) {
        if round.is_trick_complete() {
            round.resolve_trick().unwrap();
            continue;
        }
        let seat = round.acting_seat().unwrap();
        let command = maker.decide(&round.private_view(seat).unwrap()).unwrap();
        round.apply(seat, command).unwrap();
    }
    round
}

fn bench_deal(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("shuffle_and_deal", |b| {
        b.iter(|| {
            let mut deck = Deck::new();
            deck.shuffle(&mut rng);
            black_box(deck.deal())
        });
    });
}

fn bench_trick_resolution(c: &mut Criterion) {
    let mut deck = Deck::new();
    deck.shuffle(&mut StdRng::seed_from_u64(2));
    let plays: Vec<Play> = deck
        .cards()
        .iter()
        .take(6)
        .enumerate()
        .map(|(seat, card)| Play { seat, card: *card })
        .collect();
    let hand = &deck.cards()[6..14];

    c.bench_function("trick_winner", |b| {
        b.iter(|| trick_winner(black_box(&plays), black_box(Some(Suit::Hearts))));
    });
    c.bench_function("legal_cards", |b| {
        b.iter(|| legal_cards(black_box(hand), black_box(&plays[..1])));
    });
}

fn bench_bot_decisions(c: &mut Criterion) {
    let mut round = Round::new(bots()).unwrap();
    round.begin(&mut StdRng::seed_from_u64(3)).unwrap();
    let view = round.private_view(round.acting_seat().unwrap()).unwrap();

    let mut group = c.benchmark_group("bot_bid");
    for difficulty in [BotDifficulty::Easy, BotDifficulty::Medium, BotDifficulty::Hard] {
        let mut maker = BotDecisionMaker::with_seed(difficulty, 3);
        group.bench_with_input(
            BenchmarkId::from_parameter(difficulty),
            &view,
            |b, view| b.iter(|| maker.decide(black_box(view))),
        );
    }
    group.finish();
}

fn bench_full_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("automated_round");
    for difficulty in [BotDifficulty::Easy, BotDifficulty::Hard] {
        group.bench_with_input(
            BenchmarkId::from_parameter(difficulty),
            &difficulty,
            |b, difficulty| {
                let mut seed = 0;
                b.iter(|| {
                    seed += 1;
                    black_box(play_round(seed, *difficulty))
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_deal,
    bench_trick_resolution,
    bench_bot_decisions,
    bench_full_round
);
criterion_main!(benches);
