use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Role a participant holds within a room. Only admins may kick or promote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Role {
    Member,
    Admin,
}

/// A member of the current room as reported by the session client.
///
/// `id` is the stable identity across roster updates; display refreshes
/// compare full-field equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub display_name: String,
    pub role: Role,
}

impl Participant {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Snapshot of the session state owned by the coordinator.
///
/// Roster ids are unique and at most one participant matches
/// `local_user_id`. A disconnected state always carries an empty room id and
/// an empty roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub connected: bool,
    pub room_id: String,
    pub local_user_id: Option<String>,
    pub roster: Vec<Participant>,
}

impl SessionState {
    /// The roster entry for the local user, once the room has assigned one
    pub fn local_participant(&self) -> Option<&Participant> {
        let id = self.local_user_id.as_deref()?;
        self.roster.iter().find(|p| p.id == id)
    }
}
