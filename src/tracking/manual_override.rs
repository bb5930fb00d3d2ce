//! Manual scroll latch

/// Records that the user navigated by hand during the current session.
///
/// Once set it stays set; a new session starts from a fresh latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualOverride {
    latched: bool,
}

impl ManualOverride {
    /// Record a user scroll. Returns true on the first one only.
    pub fn record(&mut self) -> bool {
        !std::mem::replace(&mut self.latched, true)
    }

    pub fn is_set(&self) -> bool {
        self.latched
    }
}
