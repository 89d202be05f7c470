use async_trait::async_trait;
use tokio::sync::broadcast;

use super::models::Participant;
use crate::event::SyncEvent;
use crate::shared::SyncError;

/// Contract for the external room-synchronization client.
///
/// The client owns the network connection and the server protocol; the
/// coordinator only ever talks to this trait, which keeps the transport
/// swappable and the coordinator testable against a recording mock.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Create a room on the server and return its id
    async fn generate_room(&self, username: &str, password: &str) -> Result<String, SyncError>;

    /// Join an existing room
    async fn join_room(&self, room_id: &str) -> Result<(), SyncError>;

    /// Leave the current room. Fire-and-forget: implementations swallow
    /// transport errors, the local session is ending either way.
    async fn leave_room(&self);

    /// Fetch the current participant list. `None` means the server had no
    /// roster for the room; callers treat it as empty.
    async fn get_users(&self, room_id: &str) -> Result<Option<Vec<Participant>>, SyncError>;

    /// Remove a participant from the room. `false` means the caller lacks
    /// admin privilege.
    async fn kick_user(&self, user: &Participant) -> bool;

    /// Grant a participant the admin role. `false` means the caller lacks
    /// admin privilege or the participant is no longer in the room.
    async fn promote_user(&self, user: &Participant) -> bool;

    async fn send_play(&self) -> Result<(), SyncError>;
    async fn send_pause(&self) -> Result<(), SyncError>;
    async fn send_seek(&self, position_ms: u64) -> Result<(), SyncError>;
    async fn send_rate(&self, rate: f32) -> Result<(), SyncError>;

    /// Subscribe to the inbound event stream. The coordinator keeps exactly
    /// one active subscription per connection.
    fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent>;
}
