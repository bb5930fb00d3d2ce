//! Platform services module
//!
//! This module contains platform detection and the per-platform advance
//! actions performed on the page.

pub mod navigator;
pub mod platform;

// Re-export main types
pub use navigator::AdvanceOutcome;
pub use platform::Platform;
