//! Snapshot of the page session published to the bridge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CountdownState;
use crate::{
    page::VideoId,
    services::{AdvanceOutcome, Platform},
};

/// Point-in-time view of activation and countdown state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub plugin_enabled: bool,
    pub auto_scroll_enabled: bool,
    pub platform: Platform,
    pub countdown: CountdownState,
    pub video: Option<VideoId>,
    /// Time since the current session began
    pub session_elapsed_ms: Option<u64>,
    pub remaining_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
    pub manually_overridden: bool,
    pub advances: u64,
    pub last_advance: Option<AdvanceOutcome>,
    pub last_advance_time: Option<DateTime<Utc>>,
    pub pending_commands: usize,
}
