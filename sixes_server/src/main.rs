//! Headless host for the sixes card game.
//!
//! Spawns a number of rooms filled with bots, lets the table actors drive
//! every match to its end and prints each room's final public view as JSON.

mod config;
mod logging;

use anyhow::Error;
use pico_args::Arguments;
use sixes::{
    game::{Phase, PublicView, entities::Participant},
    table::{RoomId, StateChangeNotification, TableManager},
};
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinSet, time::MissedTickBehavior};

use config::{CliOverrides, ServerConfig};

const HELP: &str = "\
Run automated rooms of the sixes card game

USAGE:
  sixes_server [OPTIONS]

OPTIONS:
  --rooms       N                   Number of rooms to host       [default: env SIXES_ROOMS or 1]
  --difficulty  easy|medium|hard    Bot difficulty                [default: env SIXES_BOT_DIFFICULTY or medium]
  --seed        N                   Seed for reproducible rooms   [default: env SIXES_SEED or random]

FLAGS:
  --fast                            Run without bot and reveal delays
  -h, --help                        Print help information

ENVIRONMENT:
  SIXES_BOT_THINK_DELAY_MS          Delay before a bot acts
  SIXES_TRICK_REVEAL_DELAY_MS       How long a finished trick stays visible
  SIXES_NEXT_ROUND_DELAY_MS         Pause before the next deal
  SIXES_CHALLENGE_DECLINE_DELAY_MS  Delay before a bot declines the challenge
  RUST_LOG                          Log filter [default: info]
  (A .env file in the working directory is loaded first)
";

/// Capacity of each room's snapshot channel
const WATCH_CAPACITY: usize = 1024;

/// How often a watcher checks the room state directly
const STATE_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = CliOverrides {
        rooms: pargs.opt_value_from_str("--rooms")?,
        difficulty: pargs.opt_value_from_str("--difficulty")?,
        seed: pargs.opt_value_from_str("--seed")?,
        fast: pargs.contains("--fast"),
    };
    let remaining = pargs.finish();

    logging::init();
    if !remaining.is_empty() {
        tracing::warn!("Ignoring unexpected arguments: {:?}", remaining);
    }

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;
    tracing::info!(
        "Hosting {} room(s) with {} bots",
        config.rooms,
        config.table.bot_difficulty
    );

    let manager = TableManager::new();
    let mut watchers = JoinSet::new();
    for index in 0..config.rooms {
        let room = manager
            .create_room(config.room_config(index), bots(index))
            .await
            .map_err(Error::msg)?;

        let (tx, rx) = mpsc::channel(WATCH_CAPACITY);
        manager
            .subscribe(room, "host".into(), tx)
            .await
            .map_err(Error::msg)?;
        watchers.spawn(watch_room(manager.clone(), room, rx));
    }

    for room in manager.list_rooms().await {
        tracing::info!("  - {} (ID: {}) - {}", room.name, room.id, room.phase);
    }

    tokio::select! {
        () = wait_for_all(&mut watchers) => {
            tracing::info!("All matches finished");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Interrupted, shutting down");
        }
    }

    for room in manager.list_rooms().await {
        let view = manager.public_view(room.id).await.map_err(Error::msg)?;
        println!("{}", serde_json::to_string_pretty(&view)?);
        manager.close_room(room.id).await.map_err(Error::msg)?;
    }

    Ok(())
}

fn bots(room: usize) -> Vec<Participant> {
    (0..sixes::NUM_SEATS)
        .map(|seat| {
            Participant::bot(
                &format!("room{}-bot{}", room + 1, seat),
                &format!("Bot {}", seat + 1),
            )
        })
        .collect()
}

async fn wait_for_all(watchers: &mut JoinSet<Option<PublicView>>) {
    while let Some(joined) = watchers.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Room watcher failed: {}", e);
        }
    }
}

/// Follow a room's snapshots until its match ends or it closes.
///
/// Snapshots are dropped when the channel is full, so the room state is
/// also polled and the match end is noticed even if its snapshot was lost.
async fn watch_room(
    manager: TableManager,
    room: RoomId,
    mut rx: mpsc::Receiver<StateChangeNotification>,
) -> Option<PublicView> {
    let mut poll = tokio::time::interval(STATE_POLL_INTERVAL);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_phase = None;

    loop {
        tokio::select! {
            notification = rx.recv() => match notification {
                Some(StateChangeNotification::StateChanged { view, .. }) => {
                    if last_phase != Some(view.phase) {
                        last_phase = Some(view.phase);
                        if let Some(finished) = report_phase(room, *view) {
                            return Some(finished);
                        }
                    }
                }
                Some(StateChangeNotification::Closed) | None => return None,
            },
            _ = poll.tick() => match manager.get_table_state(room).await {
                Ok(state) if state.phase == Phase::GameOver => {
                    let view = manager.public_view(room).await.ok()?;
                    return report_phase(room, view);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(room = room, "Stopped watching: {}", e);
                    return None;
                }
            },
        }
    }
}

/// Log a phase change; returns the view once the match is over.
fn report_phase(room: RoomId, view: PublicView) -> Option<PublicView> {
    match view.phase {
        Phase::Scoring => {
            tracing::info!(
                room = room,
                "Round scored: A {} / B {}",
                view.scores.a,
                view.scores.b
            );
            None
        }
        Phase::GameOver => {
            let winner = view
                .winner
                .map_or_else(|| "?".to_string(), |team| team.to_string());
            logging::log_room_finished(room, &winner, view.scores.a, view.scores.b);
            Some(view)
        }
        phase => {
            tracing::debug!(room = room, "Phase {}", phase);
            None
        }
    }
}
