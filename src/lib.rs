//! Reel Advance - automatic advancing of short-form video feeds
//!
//! This library watches one page view of a reels/shorts feed through a page
//! bridge and advances to the next clip when the current one finishes or its
//! countdown runs out, while deferring to manual navigation.

pub mod api;
pub mod config;
pub mod countdown;
pub mod gate;
pub mod page;
pub mod services;
pub mod state;
pub mod tasks;
pub mod tracking;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::{Config, CountdownConfig};
pub use gate::ActivationGate;
pub use page::{MirrorPage, Page, PageCommand, PageEvent};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
