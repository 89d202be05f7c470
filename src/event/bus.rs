use tokio::sync::broadcast;
use tracing::debug;

use super::events::PlayerAction;

const DEFAULT_CAPACITY: usize = 64;

/// Broadcast channel carrying locally-originated player actions toward the
/// session.
///
/// The bus is an explicit instance owned by the application and handed to the
/// session coordinator at construction. Actions published while no session is
/// listening are dropped, which is exactly what a player running without an
/// attached room should do.
#[derive(Debug, Clone)]
pub struct LocalActionBus {
    sender: broadcast::Sender<PlayerAction>,
}

impl LocalActionBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an action fired by the local player
    pub fn publish(&self, action: PlayerAction) {
        match self.sender.send(action) {
            Ok(receivers) => {
                debug!(action = action.kind(), receivers, "Local action published");
            }
            Err(_) => {
                debug!(action = action.kind(), "Local action published with no receivers");
            }
        }
    }

    /// Subscribe to actions published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerAction> {
        self.sender.subscribe()
    }
}

impl Default for LocalActionBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
