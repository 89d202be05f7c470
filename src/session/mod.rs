// Room session management
//
// The coordinator owns all session state and mediates between the local
// action bus and the external session client. The client contract lives in
// `client`; `loopback` is the in-process implementation used by the demo
// binary and tests.

// Public API - what other modules can use
pub use client::SessionClient;
pub use coordinator::{CoordinatorConfig, SessionCoordinator};
pub use loopback::LoopbackClient;
pub use models::{Participant, Role, SessionState};

// Internal modules
mod client;
mod connection;
mod coordinator;
mod loopback;
mod models;
