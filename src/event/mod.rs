// Event plumbing between the local player and the room session
//
// This module carries locally-originated playback actions toward the session
// coordinator and defines the event variants exchanged with the session
// client.

// Public API - what other modules can use
pub use bus::LocalActionBus;
pub use events::{PlayerAction, SyncEvent};

// Internal modules
mod bus;
mod events;
