use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::time::sleep;

use watchsync::{Participant, SessionClient, SyncError, SyncEvent};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Recording session client: captures every call the coordinator makes and
/// returns scripted outcomes.
pub struct MockSessionClient {
    calls: Arc<RwLock<Vec<String>>>,
    events: Mutex<Option<broadcast::Sender<SyncEvent>>>,
    room_id: RwLock<String>,
    failure: RwLock<Option<String>>,
    users: RwLock<Option<Vec<Participant>>>,
    admin_outcome: RwLock<bool>,
    delay: RwLock<Option<Duration>>,
}

#[allow(dead_code)]
impl MockSessionClient {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            events: Mutex::new(Some(events)),
            room_id: RwLock::new("room-1".to_string()),
            failure: RwLock::new(None),
            users: RwLock::new(Some(Vec::new())),
            admin_outcome: RwLock::new(true),
            delay: RwLock::new(None),
        }
    }

    pub async fn recorded_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    /// Make every fallible call fail with this message
    pub async fn set_failure(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }

    /// Script the roster returned by `get_users`
    pub async fn set_users(&self, users: Option<Vec<Participant>>) {
        *self.users.write().await = users;
    }

    /// Script the kick/promote outcome
    pub async fn set_admin_outcome(&self, allowed: bool) {
        *self.admin_outcome.write().await = allowed;
    }

    /// Add artificial latency before every fallible call answers
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Push an event to the coordinator's inbound stream
    pub fn emit(&self, event: SyncEvent) {
        if let Some(events) = self.events.lock().unwrap().as_ref() {
            let _ = events.send(event);
        }
    }

    /// Simulate a fatal disconnect: every subscriber sees the stream close
    pub fn close_event_stream(&self) {
        self.events.lock().unwrap().take();
    }

    async fn record(&self, call: impl Into<String>) {
        self.calls.write().await.push(call.into());
    }

    async fn respond(&self) -> Result<(), SyncError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        match self.failure.read().await.clone() {
            Some(message) => Err(SyncError::Session(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SessionClient for MockSessionClient {
    async fn generate_room(&self, username: &str, _password: &str) -> Result<String, SyncError> {
        self.record(format!("generate_room({username})")).await;
        self.respond().await?;
        Ok(self.room_id.read().await.clone())
    }

    async fn join_room(&self, room_id: &str) -> Result<(), SyncError> {
        self.record(format!("join_room({room_id})")).await;
        self.respond().await
    }

    async fn leave_room(&self) {
        self.record("leave_room").await;
    }

    async fn get_users(&self, room_id: &str) -> Result<Option<Vec<Participant>>, SyncError> {
        self.record(format!("get_users({room_id})")).await;
        self.respond().await?;
        Ok(self.users.read().await.clone())
    }

    async fn kick_user(&self, user: &Participant) -> bool {
        self.record(format!("kick_user({})", user.id)).await;
        *self.admin_outcome.read().await
    }

    async fn promote_user(&self, user: &Participant) -> bool {
        self.record(format!("promote_user({})", user.id)).await;
        *self.admin_outcome.read().await
    }

    async fn send_play(&self) -> Result<(), SyncError> {
        self.record("send_play").await;
        Ok(())
    }

    async fn send_pause(&self) -> Result<(), SyncError> {
        self.record("send_pause").await;
        Ok(())
    }

    async fn send_seek(&self, position_ms: u64) -> Result<(), SyncError> {
        self.record(format!("send_seek({position_ms})")).await;
        Ok(())
    }

    async fn send_rate(&self, rate: f32) -> Result<(), SyncError> {
        self.record(format!("send_rate({rate})")).await;
        Ok(())
    }

    fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        match self.events.lock().unwrap().as_ref() {
            Some(events) => events.subscribe(),
            None => {
                // Stream already closed: hand out a receiver whose sender is
                // gone so the listener sees Closed immediately.
                let (sender, receiver) = broadcast::channel(1);
                drop(sender);
                receiver
            }
        }
    }
}
