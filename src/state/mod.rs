//! State management module
//!
//! This module contains all state-related structures: activation flags, the
//! playback session, the published status, and the bridge's shared state.

pub mod activation_state;
pub mod app_state;
pub mod playback_session;
pub mod status;

// Re-export main types
pub use activation_state::ActivationState;
pub use app_state::AppState;
pub use playback_session::{CountdownState, PlaybackSession};
pub use status::StatusSnapshot;
