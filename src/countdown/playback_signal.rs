//! Edge detection over playback and visibility signals
//!
//! Media pause state arrives as periodic samples of the video's flags,
//! visibility arrives as document events. Both feed one "held" signal and
//! only its edges reach the countdown.

use crate::page::MediaSnapshot;

/// Change of the merged hold signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Paused,
    Resumed,
}

#[derive(Debug, Clone)]
pub struct PlaybackSignal {
    media_paused: bool,
    hidden: bool,
    pause_on_buffering: bool,
}

impl PlaybackSignal {
    pub fn new(hidden: bool, pause_on_buffering: bool) -> Self {
        Self {
            media_paused: false,
            hidden,
            pause_on_buffering,
        }
    }

    /// Whether the countdown should currently be suspended
    pub fn is_held(&self) -> bool {
        self.media_paused || self.hidden
    }

    /// Fold in a sample of the tracked video's flags
    pub fn sample_media(&mut self, media: &MediaSnapshot) -> Option<Edge> {
        let paused = media.paused || (self.pause_on_buffering && media.is_starved());
        self.transition(|signal| signal.media_paused = paused)
    }

    /// Fold in a visibility change of the document
    pub fn set_hidden(&mut self, hidden: bool) -> Option<Edge> {
        self.transition(|signal| signal.hidden = hidden)
    }

    fn transition(&mut self, update: impl FnOnce(&mut Self)) -> Option<Edge> {
        let was_held = self.is_held();
        update(self);
        match (was_held, self.is_held()) {
            (false, true) => Some(Edge::Paused),
            (true, false) => Some(Edge::Resumed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(paused: bool, ready_state: u8) -> MediaSnapshot {
        MediaSnapshot {
            paused,
            ready_state,
            duration: Some(10.0),
        }
    }

    #[test]
    fn steady_state_samples_produce_no_edges() {
        let mut signal = PlaybackSignal::new(false, true);
        assert_eq!(signal.sample_media(&media(false, 4)), None);
        assert_eq!(signal.sample_media(&media(true, 4)), Some(Edge::Paused));
        assert_eq!(signal.sample_media(&media(true, 4)), None);
        assert_eq!(signal.sample_media(&media(false, 4)), Some(Edge::Resumed));
        assert_eq!(signal.sample_media(&media(false, 4)), None);
    }

    #[test]
    fn visibility_behaves_like_media_pause() {
        let mut signal = PlaybackSignal::new(false, true);
        assert_eq!(signal.set_hidden(true), Some(Edge::Paused));
        assert_eq!(signal.set_hidden(true), None);
        assert_eq!(signal.set_hidden(false), Some(Edge::Resumed));
    }

    #[test]
    fn both_holds_must_clear_before_resuming() {
        let mut signal = PlaybackSignal::new(false, true);
        assert_eq!(signal.sample_media(&media(true, 4)), Some(Edge::Paused));
        assert_eq!(signal.set_hidden(true), None);
        assert_eq!(signal.set_hidden(false), None);
        assert!(signal.is_held());
        assert_eq!(signal.sample_media(&media(false, 4)), Some(Edge::Resumed));
    }

    #[test]
    fn buffering_counts_as_paused_only_when_configured() {
        let mut strict = PlaybackSignal::new(false, true);
        assert_eq!(strict.sample_media(&media(false, 1)), Some(Edge::Paused));

        let mut lenient = PlaybackSignal::new(false, false);
        assert_eq!(lenient.sample_media(&media(false, 1)), None);
    }

    #[test]
    fn starts_held_on_a_hidden_page() {
        let mut signal = PlaybackSignal::new(true, true);
        assert!(signal.is_held());
        assert_eq!(signal.set_hidden(false), Some(Edge::Resumed));
    }
}
