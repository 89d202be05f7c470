use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::client::SessionClient;
use super::connection::ConnectionTasks;
use super::models::{Participant, SessionState};
use crate::event::{LocalActionBus, PlayerAction, SyncEvent};
use crate::shared::SyncError;

/// Tunables for coordinator-initiated network calls.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Deadline for create/join/refresh calls against the session client
    pub network_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            network_timeout: Duration::from_secs(10),
        }
    }
}

struct Inner {
    state: SessionState,
    client: Arc<dyn SessionClient>,
}

/// Mediates between the local action bus and the session client.
///
/// The coordinator is the single owner of [`SessionState`]: it forwards local
/// player actions outward while connected, applies inbound events to
/// roster/identity state, and hands out snapshots to presentation layers.
/// Operations either succeed fully or fail without partial mutation.
pub struct SessionCoordinator {
    inner: RwLock<Inner>,
    // Serializes all state-mutating operations. Held across the network call
    // so a second operation cannot observe a half-applied update.
    op_guard: Mutex<()>,
    connection: Mutex<Option<ConnectionTasks>>,
    action_bus: LocalActionBus,
    config: CoordinatorConfig,
    // Upgraded when spawning connection tasks, which call back into the
    // coordinator to apply events and forward actions.
    self_ref: Weak<SessionCoordinator>,
}

impl SessionCoordinator {
    pub fn new(client: Arc<dyn SessionClient>, action_bus: LocalActionBus) -> Arc<Self> {
        Self::with_config(client, action_bus, CoordinatorConfig::default())
    }

    pub fn with_config(
        client: Arc<dyn SessionClient>,
        action_bus: LocalActionBus,
        config: CoordinatorConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            inner: RwLock::new(Inner {
                state: SessionState::default(),
                client,
            }),
            op_guard: Mutex::new(()),
            connection: Mutex::new(None),
            action_bus,
            config,
            self_ref: me.clone(),
        })
    }

    /// A copy of the current session state
    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.state.clone()
    }

    /// The bus carrying local player actions into this coordinator
    pub fn action_bus(&self) -> &LocalActionBus {
        &self.action_bus
    }

    /// Replace the bound session client.
    ///
    /// Any running connection is torn down; the session stays disconnected
    /// until a subsequent create or join succeeds.
    pub async fn bind_client(&self, client: Arc<dyn SessionClient>) {
        let _op = self.op_guard.lock().await;
        self.stop_connection().await;
        let mut inner = self.inner.write().await;
        inner.client = client;
        inner.state = SessionState::default();
        info!("Session client bound");
    }

    /// Create a room and connect to it. Returns the server-assigned room id.
    #[instrument(skip(self, password))]
    pub async fn create_room(&self, username: &str, password: &str) -> Result<String, SyncError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(SyncError::InvalidInput(
                "username and password must not be empty".to_string(),
            ));
        }

        let _op = self.op_guard.lock().await;
        let client = self.client_handle().await;
        // Subscribe before the call so events emitted during room creation
        // are buffered for the listener instead of lost.
        let events = client.subscribe_events();
        let room_id = self.bounded(client.generate_room(username, password)).await?;

        {
            let mut inner = self.inner.write().await;
            inner.state.connected = true;
            inner.state.room_id = room_id.clone();
        }
        info!(room_id = %room_id, "Room created");

        self.start_connection(&room_id, events).await;
        Ok(room_id)
    }

    /// Join an existing room and fetch its roster.
    #[instrument(skip(self))]
    pub async fn join_room(&self, room_id: &str) -> Result<(), SyncError> {
        if room_id.trim().is_empty() {
            return Err(SyncError::InvalidInput("room id must not be empty".to_string()));
        }

        let _op = self.op_guard.lock().await;
        let client = self.client_handle().await;
        let events = client.subscribe_events();
        self.bounded(client.join_room(room_id)).await?;

        {
            let mut inner = self.inner.write().await;
            inner.state.connected = true;
            inner.state.room_id = room_id.to_string();
        }
        info!(room_id = %room_id, "Joined room");

        // The join itself succeeded; a failed initial roster fetch is not
        // fatal, the next roster event or manual refresh recovers it.
        if let Err(error) = self.refresh_roster_inner().await {
            warn!(error = %error, "Initial roster refresh failed");
        }

        self.start_connection(room_id, events).await;
        Ok(())
    }

    /// Leave the current room.
    ///
    /// Best-effort on the wire: the local transition to disconnected happens
    /// unconditionally, whatever the server thinks.
    pub async fn leave_room(&self) {
        let _op = self.op_guard.lock().await;
        let client = self.client_handle().await;
        client.leave_room().await;

        let mut inner = self.inner.write().await;
        inner.state = SessionState::default();
        drop(inner);

        self.stop_connection().await;
        info!("Left room");
    }

    /// Re-fetch the participant list from the session client.
    pub async fn refresh_roster(&self) -> Result<(), SyncError> {
        let _op = self.op_guard.lock().await;
        self.refresh_roster_inner().await
    }

    /// Remove a participant. Returns the client's outcome; `false` means the
    /// local user lacks admin privilege. The roster is never mutated here,
    /// the next roster event is authoritative.
    pub async fn kick_user(&self, user: &Participant) -> bool {
        let client = self.client_handle().await;
        let allowed = client.kick_user(user).await;
        if !allowed {
            warn!(user_id = %user.id, "Kick rejected; admin privilege required");
        }
        allowed
    }

    /// Promote a participant to admin. Same delegation rules as
    /// [`Self::kick_user`].
    pub async fn promote_user(&self, user: &Participant) -> bool {
        let client = self.client_handle().await;
        let allowed = client.promote_user(user).await;
        if !allowed {
            warn!(user_id = %user.id, "Promote rejected; admin privilege required");
        }
        allowed
    }

    /// Forward a locally-originated player action to the room.
    ///
    /// A no-op while disconnected: there is no remote peer to notify. The
    /// connected flag and the client handle are read under one lock
    /// acquisition, so a rebind can never be observed half-applied.
    pub async fn dispatch_local_action(&self, action: PlayerAction) {
        let client = {
            let inner = self.inner.read().await;
            if !inner.state.connected {
                debug!(action = action.kind(), "Dropping local action; not connected");
                return;
            }
            Arc::clone(&inner.client)
        };

        let result = match action {
            PlayerAction::Play => client.send_play().await,
            PlayerAction::Pause => client.send_pause().await,
            PlayerAction::Seek { position_ms } => client.send_seek(position_ms).await,
            PlayerAction::RateChange { rate } => client.send_rate(rate).await,
        };

        if let Err(error) = result {
            warn!(action = action.kind(), error = %error, "Failed to forward local action");
        }
    }

    /// Apply a single event arriving from the session client's stream.
    pub async fn on_inbound_event(&self, event: SyncEvent) {
        let _op = self.op_guard.lock().await;
        match event {
            SyncEvent::IdentityAssigned { user_id } => {
                let mut inner = self.inner.write().await;
                if !inner.state.connected {
                    debug!(user_id = %user_id, "Ignoring identity assignment; not connected");
                    return;
                }
                debug!(user_id = %user_id, "Identity assigned by room");
                inner.state.local_user_id = Some(user_id);
            }
            SyncEvent::RosterChanged { participants } => {
                let mut inner = self.inner.write().await;
                if !inner.state.connected {
                    debug!("Ignoring roster update; not connected");
                    return;
                }
                inner.state.roster = normalize_roster(participants);
                debug!(count = inner.state.roster.len(), "Roster replaced");
            }
            SyncEvent::PlayerAction(action) => {
                // Player actions are outbound-only in this design; an
                // inbound one was misrouted somewhere upstream.
                warn!(action = action.kind(), "Ignoring unexpected inbound player action");
            }
        }
    }

    /// Transition to disconnected after the client's event stream ended.
    /// Stale listeners from a previous connection are ignored.
    pub(crate) async fn handle_disconnect(&self, room_id: &str) {
        let _op = self.op_guard.lock().await;
        {
            let mut inner = self.inner.write().await;
            if !inner.state.connected || inner.state.room_id != room_id {
                debug!(room_id = %room_id, "Ignoring disconnect from stale listener");
                return;
            }
            inner.state = SessionState::default();
        }
        warn!(room_id = %room_id, "Session client disconnected");
        self.stop_connection().await;
    }

    async fn refresh_roster_inner(&self) -> Result<(), SyncError> {
        let (client, room_id) = {
            let inner = self.inner.read().await;
            if inner.state.room_id.is_empty() {
                return Err(SyncError::NotConnected);
            }
            (Arc::clone(&inner.client), inner.state.room_id.clone())
        };

        let users = self.bounded(client.get_users(&room_id)).await?;
        let roster = normalize_roster(users.unwrap_or_default());

        let mut inner = self.inner.write().await;
        inner.state.roster = roster;
        debug!(room_id = %room_id, count = inner.state.roster.len(), "Roster refreshed");
        Ok(())
    }

    async fn start_connection(&self, room_id: &str, events: broadcast::Receiver<SyncEvent>) {
        // Upgrading always succeeds here: the caller holds a strong handle.
        let Some(coordinator) = self.self_ref.upgrade() else {
            return;
        };
        let mut connection = self.connection.lock().await;
        // The previous listener pair must be gone before a new one starts,
        // otherwise stale events could be applied twice.
        if let Some(previous) = connection.take() {
            previous.abort();
        }
        *connection = Some(ConnectionTasks::start(
            room_id.to_string(),
            coordinator,
            events,
            self.action_bus.subscribe(),
        ));
    }

    async fn stop_connection(&self) {
        if let Some(tasks) = self.connection.lock().await.take() {
            tasks.abort();
        }
    }

    async fn client_handle(&self) -> Arc<dyn SessionClient> {
        Arc::clone(&self.inner.read().await.client)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, SyncError>>,
    ) -> Result<T, SyncError> {
        match timeout(self.config.network_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::Timeout(self.config.network_timeout)),
        }
    }
}

/// Drop duplicate ids from a roster reported by the client, keeping the
/// first occurrence.
fn normalize_roster(participants: Vec<Participant>) -> Vec<Participant> {
    let mut seen = HashSet::new();
    let mut roster = Vec::with_capacity(participants.len());
    for participant in participants {
        if seen.insert(participant.id.clone()) {
            roster.push(participant);
        } else {
            warn!(user_id = %participant.id, "Dropping duplicate roster entry");
        }
    }
    roster
}
