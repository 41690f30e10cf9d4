//! Table manager for spawning and managing multiple table actors.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{RwLock, mpsc, oneshot};

use super::{
    actor::{TableActor, TableHandle},
    config::TableConfig,
    messages::{RoomId, StateChangeNotification, TableMessage, TableResponse, TableStateResponse},
};
use crate::game::{
    Command, Phase, PrivateView, PublicView, Scores,
    entities::{Participant, ParticipantId, Team},
};

/// Room metadata for discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub id: RoomId,
    pub name: String,
    pub phase: Phase,
    pub scores: Scores,
    pub winner: Option<Team>,
}

impl From<TableStateResponse> for TableMetadata {
    fn from(state: TableStateResponse) -> Self {
        Self {
            id: state.room_id,
            name: state.name,
            phase: state.phase,
            scores: state.scores,
            winner: state.winner,
        }
    }
}

/// Table manager for managing multiple room instances
#[derive(Clone)]
pub struct TableManager {
    /// Active table handles
    tables: Arc<RwLock<HashMap<RoomId, TableHandle>>>,

    /// Next room ID
    next_room_id: Arc<RwLock<RoomId>>,
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TableManager {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            next_room_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Create and spawn a new room
    ///
    /// # Arguments
    ///
    /// * `config` - Table configuration
    /// * `participants` - Exactly six participants in seat order
    ///
    /// # Returns
    ///
    /// * `Result<RoomId, String>` - Room ID or error
    pub async fn create_room(
        &self,
        config: TableConfig,
        participants: Vec<Participant>,
    ) -> Result<RoomId, String> {
        // Validate configuration
        config.validate()?;

        let mut next_id = self.next_room_id.write().await;
        let room_id = *next_id;

        let (actor, handle) =
            TableActor::new(room_id, config, participants).map_err(|e| e.to_string())?;
        *next_id += 1;
        drop(next_id);

        // Store handle
        let mut tables = self.tables.write().await;
        tables.insert(room_id, handle);
        drop(tables);

        // Spawn actor task
        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Created and spawned room {}", room_id);

        Ok(room_id)
    }

    /// Get a table handle
    pub async fn get_table(&self, room_id: RoomId) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables.get(&room_id).cloned()
    }

    async fn require_table(&self, room_id: RoomId) -> Result<TableHandle, String> {
        self.get_table(room_id)
            .await
            .ok_or_else(|| format!("Room {room_id} not found"))
    }

    /// Submit a participant's command to a room
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room ID
    /// * `participant` - Identity of the acting participant
    /// * `command` - The command
    ///
    /// # Returns
    ///
    /// * `Result<TableResponse, String>` - The room's verdict, or a delivery error
    pub async fn submit_command(
        &self,
        room_id: RoomId,
        participant: ParticipantId,
        command: Command,
    ) -> Result<TableResponse, String> {
        let handle = self.require_table(room_id).await?;

        let (tx, rx) = oneshot::channel();
        handle
            .send(TableMessage::SubmitCommand {
                participant,
                command,
                response: tx,
            })
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;

        rx.await
            .map_err(|_| "Failed to receive response".to_string())
    }

    pub async fn public_view(&self, room_id: RoomId) -> Result<PublicView, String> {
        let handle = self.require_table(room_id).await?;

        let (tx, rx) = oneshot::channel();
        handle
            .send(TableMessage::GetPublicView { response: tx })
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;

        rx.await
            .map_err(|_| "Failed to receive response".to_string())
    }

    /// `Ok(None)` when the participant is not seated in the room.
    pub async fn private_view(
        &self,
        room_id: RoomId,
        participant: ParticipantId,
    ) -> Result<Option<PrivateView>, String> {
        let handle = self.require_table(room_id).await?;

        let (tx, rx) = oneshot::channel();
        handle
            .send(TableMessage::GetPrivateView {
                participant,
                response: tx,
            })
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;

        rx.await
            .map_err(|_| "Failed to receive response".to_string())
    }

    /// Subscribe to snapshots of a room. The current snapshot is delivered
    /// first, then one per mutation.
    pub async fn subscribe(
        &self,
        room_id: RoomId,
        subscriber: ParticipantId,
        sender: mpsc::Sender<StateChangeNotification>,
    ) -> Result<(), String> {
        let handle = self.require_table(room_id).await?;
        handle
            .send(TableMessage::Subscribe { subscriber, sender })
            .await
    }

    pub async fn unsubscribe(&self, room_id: RoomId, subscriber: ParticipantId) -> Result<(), String> {
        let handle = self.require_table(room_id).await?;
        handle.send(TableMessage::Unsubscribe { subscriber }).await
    }

    pub async fn get_table_state(&self, room_id: RoomId) -> Result<TableStateResponse, String> {
        let handle = self.require_table(room_id).await?;

        let (tx, rx) = oneshot::channel();
        handle
            .send(TableMessage::GetState { response: tx })
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;

        rx.await
            .map_err(|_| "Failed to receive response".to_string())
    }

    /// List all active rooms, ordered by ID
    pub async fn list_rooms(&self) -> Vec<TableMetadata> {
        let mut ids: Vec<RoomId> = self.tables.read().await.keys().copied().collect();
        ids.sort_unstable();

        let mut metadata_list = Vec::with_capacity(ids.len());
        for room_id in ids {
            match self.get_table_state(room_id).await {
                Ok(state) => metadata_list.push(state.into()),
                Err(e) => log::debug!("Skipping room {}: {}", room_id, e),
            }
        }
        metadata_list
    }

    /// Close a room and forget it
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room ID
    ///
    /// # Returns
    ///
    /// * `Result<(), String>` - Success or error
    pub async fn close_room(&self, room_id: RoomId) -> Result<(), String> {
        // Remove from active tables first so no new requests reach it
        let handle = {
            let mut tables = self.tables.write().await;
            tables.remove(&room_id)
        };
        let handle = handle.ok_or_else(|| format!("Room {room_id} not found"))?;

        // An actor that already stopped has nothing left to close.
        let (tx, rx) = oneshot::channel();
        if handle.send(TableMessage::Close { response: tx }).await.is_ok() {
            rx.await
                .map_err(|_| "Failed to receive response".to_string())?;
        }

        log::info!("Closed room {}", room_id);

        Ok(())
    }

    /// Get active room count
    pub async fn active_room_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.len()
    }
}
