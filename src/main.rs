use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watchsync::roster;
use watchsync::{LocalActionBus, LoopbackClient, PlayerAction, SessionCoordinator};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchsync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting watch-together demo session");

    let client = Arc::new(LoopbackClient::new());
    let action_bus = LocalActionBus::default();
    let coordinator = SessionCoordinator::new(client.clone(), action_bus.clone());

    let room_id = coordinator.create_room("alice", "hunter2").await.unwrap();
    info!(room_id = %room_id, "Room is live; share the code to invite viewers");
    sleep(Duration::from_millis(50)).await;

    // A second viewer joins; the roster projection yields the display edits.
    let before = coordinator.snapshot().await.roster;
    client.simulate_join("bob").await;
    sleep(Duration::from_millis(50)).await;
    let after = coordinator.snapshot().await.roster;
    for edit in roster::diff(&before, &after) {
        info!(?edit, "Roster edit");
    }

    // The player fires actions into the bus; the coordinator forwards them.
    action_bus.publish(PlayerAction::Play);
    action_bus.publish(PlayerAction::Seek { position_ms: 90_000 });
    action_bus.publish(PlayerAction::RateChange { rate: 1.5 });
    action_bus.publish(PlayerAction::Pause);

    // Give the forwarder a beat to drain the bus.
    sleep(Duration::from_millis(100)).await;

    let state = coordinator.snapshot().await;
    info!(
        connected = state.connected,
        viewers = state.roster.len(),
        "Session state"
    );
    println!("{}", serde_json::to_string_pretty(&state).unwrap());
    println!("forwarded actions: {:?}", client.sent_actions().await);

    coordinator.leave_room().await;
}
