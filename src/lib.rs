// Library crate for the watch-together session core
// This file exposes the public API for integration tests

pub mod event;
pub mod roster;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use event::{LocalActionBus, PlayerAction, SyncEvent};
pub use roster::RosterEdit;
pub use session::{
    CoordinatorConfig, LoopbackClient, Participant, Role, SessionClient, SessionCoordinator,
    SessionState,
};
pub use shared::SyncError;
