//! Table actor: owns one room's round and sequences every mutation.
//!
//! Human commands and bot decisions reach the round through the same inbox,
//! one at a time. After every accepted mutation the actor bumps its state
//! version, pushes a snapshot to subscribers and arms at most one timer for
//! the next automatic step. A timer carries the version it was armed at and
//! is ignored if the state has moved on in the meantime.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

use super::{
    config::TableConfig,
    messages::{
        RoomId, ScheduledStep, StateChangeNotification, TableMessage, TableResponse,
        TableStateResponse,
    },
};
use crate::{
    bot::{BotDecisionMaker, BotPlayer, fallback_command},
    game::{
        Command, GameError, Phase, PrivateView, Round,
        entities::{Participant, ParticipantId, SeatIndex},
    },
};

/// Inbox capacity of a table actor
const INBOX_CAPACITY: usize = 100;

/// Table actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    room_id: RoomId,
}

impl TableHandle {
    /// Create a new table handle
    pub fn new(sender: mpsc::Sender<TableMessage>, room_id: RoomId) -> Self {
        Self { sender, room_id }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Send a message to the table
    pub async fn send(&self, message: TableMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Table is closed".to_string())
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Table actor managing a single room
pub struct TableActor {
    id: RoomId,

    config: TableConfig,

    round: Round,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Used by timers to post back into the inbox without keeping it open
    timer_sender: mpsc::WeakSender<TableMessage>,

    /// Shuffles every deal
    rng: StdRng,

    decision_maker: BotDecisionMaker,

    /// Automated seats
    bots: HashMap<SeatIndex, BotPlayer>,

    /// Bumped on every mutation
    version: u64,

    round_number: u32,

    is_closed: bool,

    /// Subscribers for state change notifications
    subscribers: HashMap<ParticipantId, mpsc::Sender<StateChangeNotification>>,
}

impl TableActor {
    /// Create a new table actor and deal the first round
    ///
    /// # Arguments
    ///
    /// * `id` - Room ID
    /// * `config` - Table configuration
    /// * `participants` - The six participants in seat order
    ///
    /// # Returns
    ///
    /// * `Result<(TableActor, TableHandle), GameError>` - Actor and handle, or a roster error
    pub fn new(
        id: RoomId,
        config: TableConfig,
        participants: Vec<Participant>,
    ) -> Result<(Self, TableHandle), GameError> {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let decision_maker = BotDecisionMaker::with_seed(config.bot_difficulty, rng.random());

        let mut round = Round::new(participants)?;
        round.begin(&mut rng)?;

        let bots = round
            .seats()
            .iter()
            .enumerate()
            .filter(|(_, seat)| seat.is_automated)
            .map(|(index, seat)| {
                let bot = BotPlayer::new(index, &seat.display_name, config.bot_difficulty);
                (index, bot)
            })
            .collect();

        let actor = Self {
            id,
            config,
            round,
            inbox,
            timer_sender: sender.downgrade(),
            rng,
            decision_maker,
            bots,
            version: 0,
            round_number: 1,
            is_closed: false,
            subscribers: HashMap::new(),
        };

        let handle = TableHandle::new(sender, id);

        Ok((actor, handle))
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        log::info!(
            "Table {} '{}' starting with {} bots",
            self.id,
            self.config.name,
            self.bots.len()
        );

        self.schedule_next();

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        log::info!("Table {} '{}' closed", self.id, self.config.name);
    }

    /// Handle a table message
    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::SubmitCommand {
                participant,
                command,
                response,
            } => {
                let result = self.handle_command(&participant, command);
                let _ = response.send(result);
            }

            TableMessage::GetPublicView { response } => {
                let _ = response.send(self.round.public_view());
            }

            TableMessage::GetPrivateView {
                participant,
                response,
            } => {
                let view = self
                    .round
                    .seat_of(&participant)
                    .and_then(|seat| self.round.private_view(seat));
                let _ = response.send(view);
            }

            TableMessage::GetState { response } => {
                let _ = response.send(self.get_state());
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                self.notify_state_change(StateChangeNotification::Closed);
                let _ = response.send(TableResponse::Success);
            }

            TableMessage::Subscribe { subscriber, sender } => {
                let snapshot = self.snapshot();
                if sender.try_send(snapshot).is_ok() {
                    log::debug!("{} subscribed to table {}", subscriber, self.id);
                    self.subscribers.insert(subscriber, sender);
                }
            }

            TableMessage::Unsubscribe { subscriber } => {
                self.subscribers.remove(&subscriber);
                log::debug!("{} unsubscribed from table {}", subscriber, self.id);
            }

            TableMessage::Scheduled { step, version } => {
                if self.is_closed || version != self.version {
                    log::debug!(
                        "Table {}: dropping stale {:?} (armed at {}, now {})",
                        self.id,
                        step,
                        version,
                        self.version
                    );
                    return;
                }
                self.run_step(step);
            }
        }
    }

    fn handle_command(&mut self, participant: &ParticipantId, command: Command) -> TableResponse {
        match self.round.apply_as(participant, command) {
            Ok(()) => {
                log::debug!("Table {}: {} -> {}", self.id, participant, command);
                self.after_mutation();
                TableResponse::Success
            }
            Err(error) => {
                log::debug!(
                    "Table {}: rejected {} from {}: {}",
                    self.id,
                    command,
                    participant,
                    error
                );
                TableResponse::Rejected(error)
            }
        }
    }

    fn run_step(&mut self, step: ScheduledStep) {
        log::debug!("Table {}: running {:?}", self.id, step);
        match step {
            ScheduledStep::BotTurn | ScheduledStep::DeclineChallenge => {
                if let Some(seat) = self.round.acting_seat() {
                    self.take_bot_turn(seat);
                }
            }

            ScheduledStep::ResolveTrick => match self.round.resolve_trick() {
                Ok(winner) => {
                    log::debug!("Table {}: seat {} takes the trick", self.id, winner);
                    self.after_mutation();
                }
                Err(error) => log::warn!("Table {}: cannot resolve trick: {}", self.id, error),
            },

            ScheduledStep::NextRound => match self.round.next_round(&mut self.rng) {
                Ok(round) => {
                    self.round = round;
                    self.round_number += 1;
                    log::info!(
                        "Table {}: round {} dealt, scores A {} / B {}",
                        self.id,
                        self.round_number,
                        self.round.scores().a,
                        self.round.scores().b
                    );
                    self.after_mutation();
                }
                Err(error) => log::warn!("Table {}: cannot deal next round: {}", self.id, error),
            },
        }
    }

    /// Let the bot at `seat` act, substituting the safe default when its own
    /// decision fails or is rejected.
    fn take_bot_turn(&mut self, seat: SeatIndex) {
        let Some(view) = self.round.private_view(seat) else {
            return;
        };
        if !self.bots.contains_key(&seat) {
            return;
        }

        let decided = match self.decision_maker.decide(&view) {
            Ok(command) => match self.round.apply(seat, command) {
                Ok(()) => Some(command),
                Err(error) => {
                    log::warn!(
                        "Table {}: bot at seat {} chose illegal {}: {}",
                        self.id,
                        seat,
                        command,
                        error
                    );
                    None
                }
            },
            Err(error) => {
                log::warn!("Table {}: bot at seat {} failed: {}", self.id, seat, error);
                None
            }
        };

        if let Some(command) = decided {
            log::debug!("Table {}: bot {} -> {}", self.id, seat, command);
            if let Some(bot) = self.bots.get_mut(&seat) {
                bot.record_decision(&command);
            }
            self.after_mutation();
        } else {
            self.take_fallback_action(seat, &view);
        }
    }

    fn take_fallback_action(&mut self, seat: SeatIndex, view: &PrivateView) {
        let Some(command) = fallback_command(view) else {
            return;
        };
        match self.round.apply(seat, command) {
            Ok(()) => {
                if let Some(bot) = self.bots.get_mut(&seat) {
                    bot.record_fallback(&command);
                }
                self.after_mutation();
            }
            Err(error) => log::error!(
                "Table {}: fallback {} for seat {} rejected: {}",
                self.id,
                command,
                seat,
                error
            ),
        }
    }

    fn after_mutation(&mut self) {
        self.version += 1;
        let snapshot = self.snapshot();
        self.notify_state_change(snapshot);
        self.schedule_next();
    }

    /// Arm the timer for whatever should happen next without human input.
    fn schedule_next(&self) {
        let next = match self.round.phase() {
            Phase::Playing if self.round.is_trick_complete() => {
                Some((ScheduledStep::ResolveTrick, self.config.trick_reveal_delay()))
            }
            Phase::Bidding | Phase::TrumpSelection | Phase::Playing => self
                .automated_acting_seat()
                .map(|_| (ScheduledStep::BotTurn, self.config.bot_think_delay())),
            Phase::SpecialRuleDecision => self.automated_acting_seat().map(|_| {
                (
                    ScheduledStep::DeclineChallenge,
                    self.config.challenge_decline_delay(),
                )
            }),
            Phase::Scoring => Some((ScheduledStep::NextRound, self.config.next_round_delay())),
            Phase::GameOver => {
                self.log_game_over();
                None
            }
            Phase::Waiting => None,
        };

        if let Some((step, delay)) = next {
            self.schedule(step, delay);
        }
    }

    fn automated_acting_seat(&self) -> Option<SeatIndex> {
        self.round
            .acting_seat()
            .filter(|seat| self.bots.contains_key(seat))
    }

    fn schedule(&self, step: ScheduledStep, delay: Duration) {
        let sender = self.timer_sender.clone();
        let version = self.version;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(TableMessage::Scheduled { step, version }).await;
            }
        });
    }

    fn log_game_over(&self) {
        log::info!(
            "Table {} '{}': team {} wins after {} rounds ({} / {})",
            self.id,
            self.config.name,
            self.round
                .winner()
                .map_or_else(|| "?".to_string(), |team| team.to_string()),
            self.round_number,
            self.round.scores().a,
            self.round.scores().b
        );
        for bot in self.bots.values() {
            log::info!(
                "Table {}: {} ({}) decided {} times, {} fallbacks ({:.1}%), called {} bids",
                self.id,
                bot.name,
                bot.difficulty,
                bot.stats.decisions,
                bot.stats.fallbacks,
                bot.stats.fallback_rate() * 100.0,
                bot.stats.bids_called
            );
        }
    }

    fn snapshot(&self) -> StateChangeNotification {
        StateChangeNotification::StateChanged {
            version: self.version,
            view: Box::new(self.round.public_view()),
        }
    }

    /// Broadcast state change notification to all subscribers
    fn notify_state_change(&mut self, notification: StateChangeNotification) {
        let id = self.id;
        self.subscribers
            .retain(|subscriber, sender| match sender.try_send(notification.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Table {}: subscriber {} channel full, dropping notification",
                        id,
                        subscriber
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Table {}: subscriber {} disconnected, removing", id, subscriber);
                    false
                }
            });
    }

    fn get_state(&self) -> TableStateResponse {
        TableStateResponse {
            room_id: self.id,
            name: self.config.name.clone(),
            phase: self.round.phase(),
            scores: self.round.scores(),
            winner: self.round.winner(),
            round_number: self.round_number,
            bot_count: self.bots.len(),
        }
    }
}
