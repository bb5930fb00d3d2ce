//! Activation gate
//!
//! Combines the extension toggle with the URL check and starts or tears
//! down the tracker and the countdown on transitions only.

use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    config::CountdownConfig,
    countdown::CountdownController,
    page::{Page, VideoId},
    services::{AdvanceOutcome, Platform},
    state::{ActivationState, StatusSnapshot},
    tracking::VideoTracker,
};

/// Per-page context owning every piece of auto-advance state
#[derive(Debug)]
pub struct ActivationGate {
    activation: ActivationState,
    tracker: VideoTracker,
    countdown: CountdownController,
}

impl ActivationGate {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            activation: ActivationState::default(),
            tracker: VideoTracker::default(),
            countdown: CountdownController::new(config),
        }
    }

    pub fn activation(&self) -> ActivationState {
        self.activation
    }

    pub fn countdown(&self) -> &CountdownController {
        &self.countdown
    }

    pub fn tracker(&self) -> &VideoTracker {
        &self.tracker
    }

    /// Apply the toggle message and re-evaluate right away
    pub fn set_plugin_enabled(&mut self, enabled: bool, page: &mut dyn Page, now: Instant) {
        info!("User plugin enabled: {}", enabled);
        self.activation.plugin_enabled = enabled;
        self.reevaluate(page, now);
    }

    /// Recompute whether auto-advance should run on the current page
    pub fn reevaluate(&mut self, page: &mut dyn Page, now: Instant) {
        let platform = Platform::detect(page.url());
        let enabled = self.activation.plugin_enabled && platform.is_supported();

        match (self.activation.auto_scroll_enabled, enabled) {
            (false, true) => self.activate(platform, page, now),
            (true, false) => self.deactivate(),
            _ => {}
        }
    }

    fn activate(&mut self, platform: Platform, page: &dyn Page, now: Instant) {
        info!("Auto-scroll enabled on {}", platform.name());
        self.activation.auto_scroll_enabled = true;
        self.tracker.start();
        if let Some(video) = self.tracker.scan(page) {
            self.countdown.begin_session(video, page, now);
        }
    }

    fn deactivate(&mut self) {
        self.activation.auto_scroll_enabled = false;
        self.tracker.stop();
        self.countdown.end_session();
        info!("Auto-scroll disabled, cleaned up");
    }

    /// The document structure changed
    pub fn on_dom_mutation(&mut self, page: &dyn Page, now: Instant) {
        if let Some(video) = self.tracker.scan(page) {
            info!("New video detected");
            self.countdown.begin_session(video, page, now);
        }
    }

    pub fn on_metadata_loaded(&mut self, video: &VideoId, page: &dyn Page, now: Instant) {
        if self.activation.auto_scroll_enabled {
            self.countdown.on_metadata_loaded(video, page, now);
        }
    }

    pub fn on_ended(&mut self, video: &VideoId, page: &mut dyn Page) -> Option<AdvanceOutcome> {
        if !self.activation.auto_scroll_enabled {
            return None;
        }
        self.countdown.on_ended(video, page)
    }

    pub fn on_visibility(&mut self, hidden: bool, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        if !self.activation.auto_scroll_enabled {
            return None;
        }
        self.countdown.on_visibility(hidden, page, now)
    }

    pub fn on_user_scroll(&mut self, now: Instant) {
        if self.activation.auto_scroll_enabled {
            self.countdown.on_user_scroll(now);
        } else {
            debug!("Ignoring scroll while auto-scroll is off");
        }
    }

    /// Periodic playback sample; only meaningful while a session exists
    pub fn sample_playback(&mut self, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        if !self.activation.auto_scroll_enabled {
            return None;
        }
        self.countdown.sample_playback(page, now)
    }

    pub fn on_deadline(&mut self, page: &mut dyn Page, now: Instant) -> Option<AdvanceOutcome> {
        if !self.activation.auto_scroll_enabled {
            return None;
        }
        self.countdown.on_deadline(page, now)
    }

    pub fn has_session(&self) -> bool {
        self.countdown.session().is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.countdown.next_due()
    }

    /// Build the status published to the bridge
    pub fn snapshot(&self, page: &dyn Page, pending_commands: usize, now: Instant) -> StatusSnapshot {
        let session = self.countdown.session();
        let last_advance = self.countdown.last_advance();
        StatusSnapshot {
            plugin_enabled: self.activation.plugin_enabled,
            auto_scroll_enabled: self.activation.auto_scroll_enabled,
            platform: Platform::detect(page.url()),
            countdown: self.countdown.state(),
            video: session.map(|s| s.video.clone()),
            session_elapsed_ms: session
                .map(|s| now.saturating_duration_since(s.started_at).as_millis() as u64),
            remaining_ms: session
                .and_then(|s| s.remaining(now))
                .map(|d| d.as_millis() as u64),
            max_duration_ms: session
                .and_then(|s| s.max_duration)
                .map(|d| d.as_millis() as u64),
            manually_overridden: session.is_some_and(|s| s.is_overridden()),
            advances: self.countdown.advances(),
            last_advance: last_advance.map(|(outcome, _)| outcome.clone()),
            last_advance_time: last_advance.map(|(_, at)| *at),
            pending_commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        page::{MediaSnapshot, MirrorPage},
        state::CountdownState,
    };

    fn shorts_page() -> MirrorPage {
        let mut page = MirrorPage::new("https://www.youtube.com/shorts/abc");
        page.insert_video(
            VideoId::new("a"),
            MediaSnapshot {
                paused: false,
                ready_state: 4,
                duration: Some(10.0),
            },
        );
        page
    }

    #[test]
    fn toggle_on_binds_the_existing_video() {
        let t0 = Instant::now();
        let mut page = shorts_page();
        let mut gate = ActivationGate::new(CountdownConfig::default());

        gate.set_plugin_enabled(true, &mut page, t0);

        assert!(gate.activation().auto_scroll_enabled);
        assert!(gate.tracker().is_active());
        assert_eq!(gate.countdown().state(), CountdownState::Running);
    }

    #[test]
    fn unsupported_url_keeps_the_gate_closed() {
        let t0 = Instant::now();
        let mut page = shorts_page();
        page.set_url("https://www.youtube.com/watch?v=abc");
        let mut gate = ActivationGate::new(CountdownConfig::default());

        gate.set_plugin_enabled(true, &mut page, t0);
        assert!(gate.activation().plugin_enabled);
        assert!(!gate.activation().auto_scroll_enabled);
        assert!(!gate.has_session());

        page.set_url("https://www.youtube.com/shorts/abc");
        gate.reevaluate(&mut page, t0);
        assert!(gate.has_session());
    }

    #[test]
    fn leaving_the_platform_tears_everything_down() {
        let t0 = Instant::now();
        let mut page = shorts_page();
        let mut gate = ActivationGate::new(CountdownConfig::default());
        gate.set_plugin_enabled(true, &mut page, t0);

        page.set_url("https://www.youtube.com/");
        gate.reevaluate(&mut page, t0);

        assert!(!gate.activation().auto_scroll_enabled);
        assert!(!gate.tracker().is_active());
        assert!(!gate.has_session());
        assert_eq!(gate.next_due(), None);
        assert_eq!(gate.countdown().live_deadlines(), 0);
    }

    #[test]
    fn disabling_twice_is_harmless() {
        let t0 = Instant::now();
        let mut page = shorts_page();
        let mut gate = ActivationGate::new(CountdownConfig::default());
        gate.set_plugin_enabled(true, &mut page, t0);

        gate.set_plugin_enabled(false, &mut page, t0);
        gate.set_plugin_enabled(false, &mut page, t0);

        assert_eq!(gate.activation(), ActivationState::default());
        assert_eq!(gate.next_due(), None);
    }

    #[test]
    fn reevaluate_without_transition_keeps_the_session() {
        let t0 = Instant::now();
        let mut page = shorts_page();
        let mut gate = ActivationGate::new(CountdownConfig::default());
        gate.set_plugin_enabled(true, &mut page, t0);
        let due = gate.next_due();

        gate.reevaluate(&mut page, t0 + std::time::Duration::from_secs(1));
        assert_eq!(gate.next_due(), due);
    }

    #[test]
    fn signals_are_ignored_while_closed() {
        let t0 = Instant::now();
        let mut page = shorts_page();
        let mut gate = ActivationGate::new(CountdownConfig::default());

        gate.on_dom_mutation(&page, t0);
        gate.on_user_scroll(t0);
        assert_eq!(gate.on_ended(&VideoId::new("a"), &mut page), None);
        assert!(!gate.has_session());
        assert_eq!(page.pending_commands(), 0);
    }

    #[test]
    fn snapshot_reports_the_session() {
        let t0 = Instant::now();
        let mut page = shorts_page();
        let mut gate = ActivationGate::new(CountdownConfig::default());
        gate.set_plugin_enabled(true, &mut page, t0);

        let status = gate.snapshot(&page, 0, t0 + std::time::Duration::from_millis(2000));
        assert_eq!(status.platform, Platform::YoutubeShorts);
        assert_eq!(status.video, Some(VideoId::new("a")));
        assert_eq!(status.max_duration_ms, Some(12_000));
        assert_eq!(status.remaining_ms, Some(10_000));
        assert_eq!(status.session_elapsed_ms, Some(2000));
        assert!(!status.manually_overridden);

        gate.on_user_scroll(t0 + std::time::Duration::from_millis(3000));
        let status = gate.snapshot(&page, 0, t0 + std::time::Duration::from_millis(8000));
        assert!(status.manually_overridden);
        assert_eq!(status.remaining_ms, Some(9000));
        assert_eq!(status.session_elapsed_ms, Some(8000));
    }
}
