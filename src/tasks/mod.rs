//! Background tasks module
//!
//! This module contains the page loop that runs alongside the bridge server.

pub mod page_loop;

// Re-export main items
pub use page_loop::{page_loop_task, LoopMessage, PageLoop};
