//! Rooms: one async actor per table, plus the manager that owns them.
//!
//! This module implements:
//! - TableActor: owns a room's round and drives bots and timers
//! - TableManager: registry of rooms keyed by room ID
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each room runs in its own Tokio task with an mpsc inbox. Every change to
//! the round, whether a human command or a timer firing, is a message
//! handled to completion before the next one is read.
//!
//! ## Example
//!
//! ```no_run
//! use sixes::game::entities::Participant;
//! use sixes::table::{TableConfig, TableManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = TableManager::new();
//!     let bots = (0..6)
//!         .map(|i| Participant::bot(&format!("bot-{i}"), &format!("Bot {i}")))
//!         .collect();
//!     let room = manager.create_room(TableConfig::default(), bots).await.unwrap();
//!     let view = manager.public_view(room).await.unwrap();
//!     println!("{} in phase {}", room, view.phase);
//! }
//! ```

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use config::{BotDifficulty, TableConfig};
pub use manager::{TableManager, TableMetadata};
pub use messages::{
    RoomId, ScheduledStep, StateChangeNotification, TableMessage, TableResponse,
    TableStateResponse,
};
