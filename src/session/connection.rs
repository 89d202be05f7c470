use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::coordinator::SessionCoordinator;
use crate::event::{PlayerAction, SyncEvent};

/// The background task pair serving one connection: an inbound listener
/// applying client events to session state, and an outbound forwarder
/// pushing local player actions to the client.
///
/// Exactly one pair exists per active connection; leave, rebind, and a new
/// create/join abort the pair belonging to the old connection.
pub(crate) struct ConnectionTasks {
    inbound: JoinHandle<()>,
    outbound: JoinHandle<()>,
}

impl ConnectionTasks {
    pub(crate) fn start(
        room_id: String,
        coordinator: Arc<SessionCoordinator>,
        events: broadcast::Receiver<SyncEvent>,
        actions: broadcast::Receiver<PlayerAction>,
    ) -> Self {
        let inbound = tokio::spawn(inbound_loop(
            room_id.clone(),
            Arc::clone(&coordinator),
            events,
        ));
        let outbound = tokio::spawn(outbound_loop(room_id, coordinator, actions));
        Self { inbound, outbound }
    }

    pub(crate) fn abort(&self) {
        self.inbound.abort();
        self.outbound.abort();
    }
}

async fn inbound_loop(
    room_id: String,
    coordinator: Arc<SessionCoordinator>,
    mut events: broadcast::Receiver<SyncEvent>,
) {
    info!(room_id = %room_id, "Inbound event listener started");

    loop {
        match events.recv().await {
            Ok(event) => {
                debug!(room_id = %room_id, event = event.kind(), "Received inbound event");
                coordinator.on_inbound_event(event).await;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(room_id = %room_id, skipped, "Inbound listener lagged; events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    warn!(room_id = %room_id, "Event stream closed");
    coordinator.handle_disconnect(&room_id).await;
}

async fn outbound_loop(
    room_id: String,
    coordinator: Arc<SessionCoordinator>,
    mut actions: broadcast::Receiver<PlayerAction>,
) {
    info!(room_id = %room_id, "Local action forwarder started");

    loop {
        match actions.recv().await {
            Ok(action) => coordinator.dispatch_local_action(action).await,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(room_id = %room_id, skipped, "Action forwarder lagged; actions dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    debug!(room_id = %room_id, "Local action bus closed");
}
