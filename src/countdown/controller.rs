//! Countdown controller
//!
//! Owns the single playback session and moves it between idle, running,
//! paused and overridden in response to page signals. Every path that stops
//! the countdown cancels the pending deadline before returning.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{Edge, PlaybackSignal, Resume};
use crate::{
    config::CountdownConfig,
    page::{Page, VideoId},
    services::{AdvanceOutcome, Platform},
    state::{CountdownState, PlaybackSession},
};

/// Longest countdown ever armed, whatever the page reports
pub const MAX_CEILING: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Countdown ceiling for a video reporting `duration` seconds
pub fn max_duration_for(duration: Option<f64>, config: &CountdownConfig) -> Duration {
    match duration {
        Some(secs) if secs.is_finite() && secs > 0.0 => Duration::try_from_secs_f64(secs)
            .ok()
            .and_then(|d| d.checked_add(config.buffer))
            .map_or(MAX_CEILING, |d| d.min(MAX_CEILING)),
        _ => config.fallback,
    }
}

#[derive(Debug)]
pub struct CountdownController {
    config: CountdownConfig,
    session: Option<PlaybackSession>,
    advances: u64,
    last_advance: Option<(AdvanceOutcome, DateTime<Utc>)>,
}

impl CountdownController {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config,
            session: None,
            advances: 0,
            last_advance: None,
        }
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> CountdownState {
        self.session
            .as_ref()
            .map_or(CountdownState::Idle, PlaybackSession::state)
    }

    /// Number of advances performed so far
    pub fn advances(&self) -> u64 {
        self.advances
    }

    pub fn last_advance(&self) -> Option<&(AdvanceOutcome, DateTime<Utc>)> {
        self.last_advance.as_ref()
    }

    /// Instant at which the pending deadline fires
    pub fn next_due(&self) -> Option<Instant> {
        self.session.as_ref().and_then(|s| s.deadline.due())
    }

    /// Deadlines currently pending; never more than one
    pub fn live_deadlines(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |s| usize::from(s.deadline.is_armed()))
    }

    /// Replace the current session with one bound to `video`.
    ///
    /// The countdown starts right away when metadata is available, otherwise
    /// once [`Self::on_metadata_loaded`] reports it.
    pub fn begin_session(&mut self, video: VideoId, page: &dyn Page, now: Instant) {
        self.end_session();

        info!("Tracking new video {}", video);
        let mut signal = PlaybackSignal::new(page.is_hidden(), self.config.pause_on_buffering);
        let media = page.media(&video);
        if let Some(media) = &media {
            signal.sample_media(media);
        }
        self.session = Some(PlaybackSession::new(video.clone(), now, signal));

        match media {
            Some(media) if media.has_metadata() => self.start_countdown(media.duration, now),
            _ => debug!("Waiting for metadata of {}", video),
        }
    }

    /// Drop the current session and its pending deadline
    pub fn end_session(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        if session.deadline.cancel() {
            debug!("Cancelled pending deadline of {}", session.video);
        }
        debug!("Untracked video {}", session.video);
        true
    }

    /// `loadedmetadata` fired on `video`
    pub fn on_metadata_loaded(&mut self, video: &VideoId, page: &dyn Page, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.video != *video || session.max_duration.is_some() {
            return;
        }
        let media = page.media(video);
        if let Some(media) = &media {
            // Nothing is armed yet, so the edge itself carries no action.
            session.signal.sample_media(media);
        }
        self.start_countdown(media.and_then(|media| media.duration), now);
    }

    fn start_countdown(&mut self, duration: Option<f64>, now: Instant) {
        let max_duration = max_duration_for(duration, &self.config);
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match duration {
            Some(secs) if secs.is_finite() && secs > 0.0 => info!(
                "Video reported duration {:.2}s, counting down {}ms",
                secs,
                max_duration.as_millis()
            ),
            _ => info!(
                "Could not determine video duration, using fallback of {}ms",
                max_duration.as_millis()
            ),
        }

        session.max_duration = Some(max_duration);
        if session.is_overridden() || session.signal.is_held() {
            session.deadline.reset(max_duration);
        } else {
            session.deadline.arm(max_duration, now);
        }
    }

    /// Periodic sample of the tracked video's playback flags
    pub fn sample_playback(&mut self, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        let session = self.session.as_mut()?;
        let Some(media) = page.media(&session.video) else {
            debug!("Tracked video {} is no longer in the document", session.video);
            return None;
        };
        let edge = session.signal.sample_media(&media)?;
        self.apply_edge(edge, page, now)
    }

    /// The document became hidden or visible
    pub fn on_visibility(&mut self, hidden: bool, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        let edge = self.session.as_mut()?.signal.set_hidden(hidden)?;
        self.apply_edge(edge, page, now)
    }

    fn apply_edge(&mut self, edge: Edge, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        match edge {
            Edge::Paused => {
                self.pause(now);
                None
            }
            Edge::Resumed => self.resume(page, now),
        }
    }

    fn pause(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_overridden() {
            return;
        }
        if let Some(remaining) = session.deadline.pause(now) {
            info!("Paused countdown with {}ms left", remaining.as_millis());
        }
    }

    fn resume(&mut self, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        let session = self.session.as_mut()?;
        if session.is_overridden() || session.max_duration.is_none() {
            return None;
        }
        match session.deadline.resume(now) {
            Resume::Armed(due) => {
                info!(
                    "Resuming countdown for {}ms",
                    due.saturating_duration_since(now).as_millis()
                );
                None
            }
            Resume::Expired => {
                info!("No time left, advancing now");
                Some(self.advance(page))
            }
        }
    }

    /// The user scrolled by hand
    pub fn on_user_scroll(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.record_manual_scroll(now) {
            info!("User scrolled manually, auto-advance skipped for {}", session.video);
        }
    }

    /// The pending deadline may be due
    pub fn on_deadline(&mut self, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        let session = self.session.as_mut()?;
        if !session.deadline.fire(now) || session.is_overridden() {
            return None;
        }
        info!("Countdown for {} expired", session.video);
        Some(self.advance(page))
    }

    /// `ended` fired on `video`
    pub fn on_ended(&mut self, video: &VideoId, page: &mut dyn Page) -> Option<AdvanceOutcome> {
        let session = self.session.as_ref()?;
        if session.video != *video {
            return None;
        }
        if session.is_overridden() {
            debug!("Video {} ended after a manual scroll, staying put", video);
            return None;
        }
        info!("Video {} ended", video);
        Some(self.advance(page))
    }

    fn advance(&mut self, page: &mut dyn Page) -> AdvanceOutcome {
        let attached = self
            .session
            .as_ref()
            .is_some_and(|s| page.media(&s.video).is_some());
        self.end_session();

        let outcome = if attached {
            Platform::detect(page.url()).advance(page)
        } else {
            warn!("Tracked video left the document, using generic advance");
            Platform::Unknown.advance(page)
        };

        self.advances += 1;
        self.last_advance = Some((outcome.clone(), Utc::now()));
        outcome
    }
}
