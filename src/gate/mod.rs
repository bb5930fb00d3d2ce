//! Activation module
//!
//! The gate decides whether auto-advance runs on the current page and owns
//! everything that runs when it does.

pub mod activation_gate;

// Re-export main types
pub use activation_gate::ActivationGate;
