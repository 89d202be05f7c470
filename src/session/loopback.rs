use async_trait::async_trait;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::client::SessionClient;
use super::models::{Participant, Role};
use crate::event::{PlayerAction, SyncEvent};
use crate::shared::SyncError;

const ROOM_CODE_LEN: usize = 6;
const EVENT_CAPACITY: usize = 64;

/// In-process session client hosting a single room in memory.
///
/// Powers the demo binary and the integration tests, and enforces the same
/// admin rules a real room server would: only admins may kick or promote.
pub struct LoopbackClient {
    room: Arc<RwLock<LoopbackRoom>>,
    events: broadcast::Sender<SyncEvent>,
    sent: Arc<RwLock<Vec<PlayerAction>>>,
}

#[derive(Default)]
struct LoopbackRoom {
    room_id: Option<String>,
    local_user_id: Option<String>,
    participants: Vec<Participant>,
}

impl LoopbackClient {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            room: Arc::new(RwLock::new(LoopbackRoom::default())),
            events,
            sent: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Actions forwarded outbound through this client, oldest first
    pub async fn sent_actions(&self) -> Vec<PlayerAction> {
        self.sent.read().await.clone()
    }

    /// Pretend a remote viewer joined the room and announce the new roster
    pub async fn simulate_join(&self, display_name: &str) -> Participant {
        let participant = Participant::new(Uuid::new_v4().to_string(), display_name, Role::Member);
        self.room.write().await.participants.push(participant.clone());
        self.broadcast_roster().await;
        participant
    }

    async fn broadcast_roster(&self) {
        let participants = self.room.read().await.participants.clone();
        let _ = self.events.send(SyncEvent::RosterChanged { participants });
    }

    async fn local_is_admin(&self) -> bool {
        let room = self.room.read().await;
        let Some(local_id) = room.local_user_id.as_deref() else {
            return false;
        };
        room.participants
            .iter()
            .any(|p| p.id == local_id && p.is_admin())
    }

    fn room_code() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ROOM_CODE_LEN)
            .map(char::from)
            .collect::<String>()
            .to_uppercase()
    }
}

impl Default for LoopbackClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionClient for LoopbackClient {
    async fn generate_room(&self, username: &str, _password: &str) -> Result<String, SyncError> {
        let room_id = Self::room_code();
        let creator = Participant::new(Uuid::new_v4().to_string(), username, Role::Admin);

        {
            let mut room = self.room.write().await;
            room.room_id = Some(room_id.clone());
            room.local_user_id = Some(creator.id.clone());
            room.participants = vec![creator.clone()];
        }

        info!(room_id = %room_id, username = %username, "Loopback room created");
        let _ = self.events.send(SyncEvent::IdentityAssigned {
            user_id: creator.id,
        });
        self.broadcast_roster().await;
        Ok(room_id)
    }

    async fn join_room(&self, room_id: &str) -> Result<(), SyncError> {
        let guest = Participant::new(Uuid::new_v4().to_string(), "guest", Role::Member);
        let host = Participant::new(Uuid::new_v4().to_string(), "host", Role::Admin);

        {
            let mut room = self.room.write().await;
            room.room_id = Some(room_id.to_string());
            room.local_user_id = Some(guest.id.clone());
            room.participants = vec![host, guest.clone()];
        }

        info!(room_id = %room_id, "Loopback room joined");
        let _ = self.events.send(SyncEvent::IdentityAssigned { user_id: guest.id });
        self.broadcast_roster().await;
        Ok(())
    }

    async fn leave_room(&self) {
        *self.room.write().await = LoopbackRoom::default();
        debug!("Loopback room left");
    }

    async fn get_users(&self, room_id: &str) -> Result<Option<Vec<Participant>>, SyncError> {
        let room = self.room.read().await;
        if room.room_id.as_deref() == Some(room_id) {
            Ok(Some(room.participants.clone()))
        } else {
            Ok(None)
        }
    }

    async fn kick_user(&self, user: &Participant) -> bool {
        if !self.local_is_admin().await {
            return false;
        }

        let removed = {
            let mut room = self.room.write().await;
            let before = room.participants.len();
            room.participants.retain(|p| p.id != user.id);
            room.participants.len() < before
        };

        if removed {
            debug!(user_id = %user.id, "Participant kicked");
            self.broadcast_roster().await;
        }
        removed
    }

    async fn promote_user(&self, user: &Participant) -> bool {
        if !self.local_is_admin().await {
            return false;
        }

        let promoted = {
            let mut room = self.room.write().await;
            match room.participants.iter_mut().find(|p| p.id == user.id) {
                Some(participant) => {
                    participant.role = Role::Admin;
                    true
                }
                None => false,
            }
        };

        if promoted {
            debug!(user_id = %user.id, "Participant promoted");
            self.broadcast_roster().await;
        }
        promoted
    }

    async fn send_play(&self) -> Result<(), SyncError> {
        self.sent.write().await.push(PlayerAction::Play);
        Ok(())
    }

    async fn send_pause(&self) -> Result<(), SyncError> {
        self.sent.write().await.push(PlayerAction::Pause);
        Ok(())
    }

    async fn send_seek(&self, position_ms: u64) -> Result<(), SyncError> {
        self.sent.write().await.push(PlayerAction::Seek { position_ms });
        Ok(())
    }

    async fn send_rate(&self, rate: f32) -> Result<(), SyncError> {
        self.sent.write().await.push(PlayerAction::RateChange { rate });
        Ok(())
    }

    fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }
}
