use serde::{Deserialize, Serialize};

use crate::session::Participant;

/// Playback actions taken by a player, mirrored to every room participant.
///
/// Positions are milliseconds from the start of the media.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    Play,
    Pause,
    Seek { position_ms: u64 },
    RateChange { rate: f32 },
}

impl PlayerAction {
    /// Get a human-readable description of the action type
    pub fn kind(&self) -> &'static str {
        match self {
            PlayerAction::Play => "play",
            PlayerAction::Pause => "pause",
            PlayerAction::Seek { .. } => "seek",
            PlayerAction::RateChange { .. } => "rate_change",
        }
    }
}

/// Events exchanged with the session client.
///
/// Player actions flow outbound only; identity and roster updates flow
/// inbound from the room. Events are facts about things that have already
/// happened and are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// A playback action, forwarded to the room on behalf of the local player
    PlayerAction(PlayerAction),

    /// The room assigned an identity to the local user
    IdentityAssigned { user_id: String },

    /// The room's participant list changed
    RosterChanged { participants: Vec<Participant> },
}

impl SyncEvent {
    /// Get a human-readable description of the event type
    pub fn kind(&self) -> &'static str {
        match self {
            SyncEvent::PlayerAction(action) => action.kind(),
            SyncEvent::IdentityAssigned { .. } => "identity_assigned",
            SyncEvent::RosterChanged { .. } => "roster_changed",
        }
    }
}
