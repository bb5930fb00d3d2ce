//! Virtual-time driver for the page loop
//!
//! Replays the gate cadence, the playback poll and the deadline in
//! chronological order without a runtime, so scenarios are exact.

#![allow(dead_code)]

use std::time::Duration;

use reel_advance::{
    page::{PageCommand, PageEvent, VideoId},
    tasks::PageLoop,
    CountdownConfig, MirrorPage,
};
use tokio::time::Instant;

pub struct Harness {
    pub page_loop: PageLoop,
    t0: Instant,
    now_ms: u64,
    next_poll_ms: u64,
    next_gate_ms: u64,
    /// Commands seen so far with the time they were queued
    pub advances: Vec<(u64, PageCommand)>,
}

impl Harness {
    pub fn new(url: &str) -> Self {
        let config = CountdownConfig::default();
        Self {
            page_loop: PageLoop::new(config, MirrorPage::new(url)),
            t0: Instant::now(),
            now_ms: 0,
            next_poll_ms: 0,
            next_gate_ms: 0,
            advances: Vec::new(),
        }
    }

    fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Current virtual time as a clock instant
    pub fn instant(&self) -> Instant {
        self.at(self.now_ms)
    }

    /// Deliver a shim event at the current virtual time
    pub fn send(&mut self, event: PageEvent) {
        let now = self.at(self.now_ms);
        self.page_loop.apply_event(event, now);
        self.collect();
    }

    /// Step every timer due up to and including `target_ms`
    pub fn run_until(&mut self, target_ms: u64) {
        loop {
            let due_ms = self.page_loop.next_due().map(|due| {
                let nanos = due.saturating_duration_since(self.t0).as_nanos();
                nanos.div_ceil(1_000_000) as u64
            });
            let poll_ms = self.next_poll_ms;
            let gate_ms = self.next_gate_ms;
            let next = due_ms.map_or(poll_ms.min(gate_ms), |d| d.min(poll_ms).min(gate_ms));
            if next > target_ms {
                break;
            }
            self.now_ms = next;
            let now = self.at(next);

            if due_ms == Some(next) {
                self.page_loop.fire_deadline(now);
            } else if poll_ms == next {
                self.page_loop.sample(now);
                self.next_poll_ms += self.page_loop.config().poll_interval.as_millis() as u64;
            } else {
                self.page_loop.reevaluate(now);
                self.next_gate_ms += self.page_loop.config().gate_interval.as_millis() as u64;
            }
            self.collect();
        }
        self.now_ms = target_ms;
    }

    fn collect(&mut self) {
        let now_ms = self.now_ms;
        let drained = self.page_loop.page_mut().drain_commands();
        self.advances
            .extend(drained.into_iter().map(|command| (now_ms, command)));
    }
}

pub fn video_inserted(id: &str, duration: Option<f64>) -> PageEvent {
    PageEvent::VideoInserted {
        video: VideoId::new(id),
        duration,
        ready_state: 4,
        paused: false,
    }
}

pub fn media_state(id: &str, paused: bool) -> PageEvent {
    PageEvent::MediaState {
        video: VideoId::new(id),
        paused,
        ready_state: 4,
    }
}
