// Roster projection
//
// Turns two roster snapshots into the minimal edit script a display list
// needs to refresh in place.

// Public API - what other modules can use
pub use diff::{apply, diff, RosterEdit};

// Internal modules
mod diff;
