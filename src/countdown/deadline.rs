//! Single pending deadline with pause/resume

use std::time::Duration;

use tokio::time::Instant;

/// Stand-in for "never" when a budget does not fit on the clock
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// `start + budget`, saturating instead of overflowing the clock
fn due_at(start: Instant, budget: Duration) -> Instant {
    start
        .checked_add(budget)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

/// Outcome of resuming a suspended deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// The deadline is pending and fires at the given instant
    Armed(Instant),
    /// No budget was left; the caller must act now
    Expired,
}

/// A single-shot countdown.
///
/// The remaining budget is recomputed from wall-clock elapsed time whenever
/// the deadline is suspended, never decremented by ticks. At most one fire
/// instant is pending at a time: arming replaces whatever was pending.
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    remaining: Duration,
    started_at: Option<Instant>,
}

impl Deadline {
    /// Cancel anything pending and hold `budget` without arming it
    pub fn reset(&mut self, budget: Duration) {
        self.cancel();
        self.remaining = budget;
    }

    /// Cancel anything pending and start counting down `budget` from `now`
    pub fn arm(&mut self, budget: Duration, now: Instant) -> Instant {
        self.reset(budget);
        self.started_at = Some(now);
        due_at(now, budget)
    }

    /// Drop the pending fire instant, if any. The budget is left as is.
    pub fn cancel(&mut self) -> bool {
        self.started_at.take().is_some()
    }

    /// Suspend the countdown, capturing what is left.
    ///
    /// Returns `None` when nothing was pending.
    pub fn pause(&mut self, now: Instant) -> Option<Duration> {
        let started_at = self.started_at.take()?;
        let elapsed = now.saturating_duration_since(started_at);
        self.remaining = self.remaining.saturating_sub(elapsed);
        Some(self.remaining)
    }

    /// Re-arm with the captured budget from a fresh start instant
    pub fn resume(&mut self, now: Instant) -> Resume {
        if let Some(due) = self.due() {
            return Resume::Armed(due);
        }
        if self.remaining.is_zero() {
            return Resume::Expired;
        }
        self.started_at = Some(now);
        Resume::Armed(due_at(now, self.remaining))
    }

    /// Consume the deadline if it is due at `now`
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due() {
            Some(due) if now >= due => {
                self.started_at = None;
                self.remaining = Duration::ZERO;
                true
            }
            _ => false,
        }
    }

    /// Instant at which the pending deadline fires
    pub fn due(&self) -> Option<Instant> {
        self.started_at
            .map(|started_at| due_at(started_at, self.remaining))
    }

    pub fn is_armed(&self) -> bool {
        self.started_at.is_some()
    }

    /// Budget left at `now`
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self
                .remaining
                .saturating_sub(now.saturating_duration_since(started_at)),
            None => self.remaining,
        }
    }
}
