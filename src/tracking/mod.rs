//! Page observation module
//!
//! Trackers that turn raw page observations into session-level facts.

pub mod manual_override;
pub mod video_tracker;

// Re-export main types
pub use manual_override::ManualOverride;
pub use video_tracker::VideoTracker;
