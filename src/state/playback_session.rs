//! Playback session bound to one video element

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{
    countdown::{Deadline, PlaybackSignal},
    page::VideoId,
    tracking::ManualOverride,
};

/// Externally visible state of the countdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownState {
    /// No session, or a session still waiting for metadata
    #[default]
    Idle,
    Running,
    Paused,
    Overridden,
}

/// Binding between the countdown and the video currently presented.
///
/// The video itself belongs to the page; the session only holds its id.
#[derive(Debug)]
pub struct PlaybackSession {
    pub video: VideoId,
    pub started_at: Instant,
    /// Countdown ceiling; `None` until metadata is available
    pub max_duration: Option<Duration>,
    pub deadline: Deadline,
    pub signal: PlaybackSignal,
    manual: ManualOverride,
}

impl PlaybackSession {
    pub fn new(video: VideoId, started_at: Instant, signal: PlaybackSignal) -> Self {
        Self {
            video,
            started_at,
            max_duration: None,
            deadline: Deadline::default(),
            signal,
            manual: ManualOverride::default(),
        }
    }

    pub fn state(&self) -> CountdownState {
        if self.manual.is_set() {
            CountdownState::Overridden
        } else if self.deadline.is_armed() {
            CountdownState::Running
        } else if self.max_duration.is_some() {
            CountdownState::Paused
        } else {
            CountdownState::Idle
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.manual.is_set()
    }

    /// Latch the manual override and freeze the countdown where it stands.
    ///
    /// Returns true on the first scroll of the session.
    pub fn record_manual_scroll(&mut self, now: Instant) -> bool {
        if !self.manual.record() {
            return false;
        }
        self.deadline.pause(now);
        true
    }

    /// Countdown budget left at `now`
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.max_duration.map(|_| self.deadline.remaining(now))
    }
}
