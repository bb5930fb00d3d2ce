//! Countdown module
//!
//! This module contains the deadline, the playback edge detector and the
//! controller that drives a playback session from both.

pub mod controller;
pub mod deadline;
pub mod playback_signal;

// Re-export main types
pub use controller::{max_duration_for, CountdownController};
pub use deadline::{Deadline, Resume};
pub use playback_signal::{Edge, PlaybackSignal};
