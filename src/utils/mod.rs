//! Utility functions module
//!
//! Process-level helpers for the bridge binary.

pub mod signals;

// Re-export main functions
pub use signals::shutdown_signal;
