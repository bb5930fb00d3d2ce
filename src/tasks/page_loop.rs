//! Page loop background task
//!
//! A single task owns the gate and the mirrored page. Shim events, the gate
//! cadence, the playback poll and the deadline are all handled here, one at
//! a time, so no state is shared across threads.

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{interval, sleep_until, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    config::CountdownConfig,
    gate::ActivationGate,
    page::{MirrorPage, PageCommand, PageEvent},
    services::AdvanceOutcome,
    state::StatusSnapshot,
};

/// Requests handled by the page loop
#[derive(Debug)]
pub enum LoopMessage {
    /// An observation forwarded by the page shim
    Page(PageEvent),
    /// Same as `Page`, replying with the status after the event was applied
    Event {
        event: PageEvent,
        reply: oneshot::Sender<StatusSnapshot>,
    },
    /// Set the toggle, or flip it when `enabled` is `None`; replies with the
    /// resulting status
    Toggle {
        enabled: Option<bool>,
        reply: oneshot::Sender<StatusSnapshot>,
    },
    /// Hand every queued page command to the shim
    DrainCommands(oneshot::Sender<Vec<PageCommand>>),
}

/// Gate plus mirrored page, stepped synchronously
#[derive(Debug)]
pub struct PageLoop {
    gate: ActivationGate,
    page: MirrorPage,
    config: CountdownConfig,
}

impl PageLoop {
    pub fn new(config: CountdownConfig, page: MirrorPage) -> Self {
        Self {
            gate: ActivationGate::new(config),
            page,
            config,
        }
    }

    pub fn gate(&self) -> &ActivationGate {
        &self.gate
    }

    pub fn page(&self) -> &MirrorPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut MirrorPage {
        &mut self.page
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    pub fn handle(&mut self, message: LoopMessage, now: Instant) {
        match message {
            LoopMessage::Page(event) => self.apply_event(event, now),
            LoopMessage::Event { event, reply } => {
                self.apply_event(event, now);
                if reply.send(self.snapshot(now)).is_err() {
                    debug!("Event sender went away before the reply");
                }
            }
            LoopMessage::Toggle { enabled, reply } => {
                let enabled = enabled.unwrap_or(!self.gate.activation().plugin_enabled);
                self.gate.set_plugin_enabled(enabled, &mut self.page, now);
                if reply.send(self.snapshot(now)).is_err() {
                    debug!("Toggle requester went away before the reply");
                }
            }
            LoopMessage::DrainCommands(reply) => {
                let commands = self.page.drain_commands();
                if let Err(commands) = reply.send(commands) {
                    warn!("Dropped {} page commands, requester went away", commands.len());
                }
            }
        }
    }

    /// Mirror a shim event and route it to the gate
    pub fn apply_event(&mut self, event: PageEvent, now: Instant) {
        debug!("Page event: {}", event.kind());
        let mutated = self.page.apply(&event);

        let outcome = match event {
            PageEvent::Toggle { enabled } => {
                self.gate.set_plugin_enabled(enabled, &mut self.page, now);
                None
            }
            PageEvent::MetadataLoaded { video, .. } => {
                self.gate.on_metadata_loaded(&video, &self.page, now);
                None
            }
            PageEvent::Ended { video } => self.gate.on_ended(&video, &mut self.page),
            PageEvent::VisibilityChanged { hidden } => {
                self.gate.on_visibility(hidden, &mut self.page, now)
            }
            PageEvent::UserScroll => {
                self.gate.on_user_scroll(now);
                None
            }
            PageEvent::Navigated { .. }
            | PageEvent::VideoInserted { .. }
            | PageEvent::VideoRemoved { .. }
            | PageEvent::MediaState { .. }
            | PageEvent::Controls { .. } => None,
        };
        log_advance(outcome);

        if mutated {
            self.gate.on_dom_mutation(&self.page, now);
        }
    }

    /// Gate cadence tick
    pub fn reevaluate(&mut self, now: Instant) {
        self.gate.reevaluate(&mut self.page, now);
    }

    /// Playback poll tick
    pub fn sample(&mut self, now: Instant) {
        let outcome = self.gate.sample_playback(&mut self.page, now);
        log_advance(outcome);
    }

    /// Deadline instant reached
    pub fn fire_deadline(&mut self, now: Instant) {
        let outcome = self.gate.on_deadline(&mut self.page, now);
        log_advance(outcome);
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.gate.next_due()
    }

    pub fn snapshot(&self, now: Instant) -> StatusSnapshot {
        self.gate
            .snapshot(&self.page, self.page.pending_commands(), now)
    }
}

fn log_advance(outcome: Option<AdvanceOutcome>) {
    if let Some(outcome) = outcome {
        info!("Advance performed: {:?}", outcome);
    }
}

/// Background task that runs the page loop until the message channel closes
pub async fn page_loop_task(
    mut page_loop: PageLoop,
    mut messages: mpsc::Receiver<LoopMessage>,
    status_tx: watch::Sender<StatusSnapshot>,
) {
    info!("Starting page loop task");

    let mut gate_tick = interval(page_loop.config.gate_interval);
    gate_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut poll_tick = interval(page_loop.config.poll_interval);
    poll_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let due = page_loop.next_due();
        let sampling = page_loop.gate.has_session();

        tokio::select! {
            message = messages.recv() => match message {
                Some(message) => page_loop.handle(message, Instant::now()),
                None => {
                    info!("Message channel closed, stopping page loop");
                    break;
                }
            },
            _ = gate_tick.tick() => page_loop.reevaluate(Instant::now()),
            _ = poll_tick.tick(), if sampling => page_loop.sample(Instant::now()),
            _ = sleep_until(due.unwrap_or_else(Instant::now)), if due.is_some() => {
                page_loop.fire_deadline(Instant::now());
            }
        }

        status_tx.send_replace(page_loop.snapshot(Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::VideoId;

    fn tiktok_loop() -> PageLoop {
        let mut page_loop = PageLoop::new(
            CountdownConfig::default(),
            MirrorPage::new("https://www.tiktok.com/foryou"),
        );
        page_loop.apply_event(
            PageEvent::VideoInserted {
                video: VideoId::new("a"),
                duration: Some(10.0),
                ready_state: 4,
                paused: false,
            },
            Instant::now(),
        );
        page_loop
    }

    #[test]
    fn toggle_without_value_flips_the_plugin() {
        let mut page_loop = tiktok_loop();

        let (reply, mut rx) = oneshot::channel();
        page_loop.handle(LoopMessage::Toggle { enabled: None, reply }, Instant::now());
        let status = rx.try_recv().unwrap();
        assert!(status.plugin_enabled);
        assert!(status.auto_scroll_enabled);
        assert_eq!(status.video, Some(VideoId::new("a")));

        let (reply, mut rx) = oneshot::channel();
        page_loop.handle(LoopMessage::Toggle { enabled: None, reply }, Instant::now());
        let status = rx.try_recv().unwrap();
        assert!(!status.plugin_enabled);
        assert_eq!(status.video, None);
    }

    #[test]
    fn event_reply_includes_the_event_itself() {
        let mut page_loop = tiktok_loop();
        page_loop.apply_event(PageEvent::Toggle { enabled: true }, Instant::now());

        let (reply, mut rx) = oneshot::channel();
        page_loop.handle(
            LoopMessage::Event {
                event: PageEvent::Ended {
                    video: VideoId::new("a"),
                },
                reply,
            },
            Instant::now(),
        );
        let status = rx.try_recv().unwrap();
        assert_eq!(status.advances, 1);
        assert_eq!(status.pending_commands, 1);
    }

    #[test]
    fn drain_hands_over_queued_commands() {
        let mut page_loop = tiktok_loop();
        page_loop.apply_event(PageEvent::Toggle { enabled: true }, Instant::now());
        page_loop.apply_event(
            PageEvent::Ended {
                video: VideoId::new("a"),
            },
            Instant::now(),
        );

        let (reply, mut rx) = oneshot::channel();
        page_loop.handle(LoopMessage::DrainCommands(reply), Instant::now());
        assert_eq!(rx.try_recv().unwrap().len(), 1);
        assert_eq!(page_loop.page().pending_commands(), 0);
    }

    #[test]
    fn inserted_video_replaces_the_session() {
        let mut page_loop = tiktok_loop();
        page_loop.apply_event(PageEvent::Toggle { enabled: true }, Instant::now());

        page_loop.apply_event(
            PageEvent::VideoRemoved {
                video: VideoId::new("a"),
            },
            Instant::now(),
        );
        page_loop.apply_event(
            PageEvent::VideoInserted {
                video: VideoId::new("b"),
                duration: Some(4.0),
                ready_state: 4,
                paused: false,
            },
            Instant::now(),
        );

        let status = page_loop.snapshot(Instant::now());
        assert_eq!(status.video, Some(VideoId::new("b")));
        assert_eq!(status.max_duration_ms, Some(6000));
    }
}
