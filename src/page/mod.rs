//! Page surface module
//!
//! The DOM of the page being watched, as seen through the in-page shim:
//! what the core reads (videos, media flags, visibility, controls) and what
//! it is allowed to do to the page (click, key dispatch, scroll).

pub mod events;
pub mod mirror;

use std::fmt;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use events::PageEvent;
pub use mirror::MirrorPage;

/// `HTMLMediaElement.HAVE_METADATA`
pub const HAVE_METADATA: u8 = 1;
/// `HTMLMediaElement.HAVE_CURRENT_DATA`
pub const HAVE_CURRENT_DATA: u8 = 2;

/// Identity of a `<video>` element, assigned by the page shim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Playback flags of one video element at the time it was read
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaSnapshot {
    pub paused: bool,
    pub ready_state: u8,
    /// Reported duration in seconds; `None` when the page reports nothing usable
    pub duration: Option<f64>,
}

impl MediaSnapshot {
    /// Whether duration and dimensions are known
    pub fn has_metadata(&self) -> bool {
        self.ready_state >= HAVE_METADATA
    }

    /// Whether there is not enough data to render the current frame
    pub fn is_starved(&self) -> bool {
        self.ready_state < HAVE_CURRENT_DATA
    }
}

/// Navigation keys the core may synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavKey {
    ArrowDown,
    ArrowRight,
}

/// Actions produced for the page shim to carry out, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PageCommand {
    /// Click the labeled "next" control
    ClickNext,
    /// Dispatch a bubbling `keydown` on the document
    DispatchKey { key: NavKey },
    /// `scrollIntoView({ behavior: "smooth", block: "center" })` on a video
    ScrollIntoView { video: VideoId },
    /// Scroll the nearest scrollable feed container by one viewport
    ScrollFeed,
}

/// DOM surface consumed and produced by the auto-advance core
pub trait Page {
    /// Current document URL
    fn url(&self) -> &str;

    /// Video elements attached to the document, in document order
    fn videos(&self) -> Vec<VideoId>;

    /// First video element in document order
    fn first_video(&self) -> Option<VideoId> {
        self.videos().into_iter().next()
    }

    /// Media flags of a video, or `None` once it left the document
    fn media(&self, video: &VideoId) -> Option<MediaSnapshot>;

    /// Whether the document is currently hidden
    fn is_hidden(&self) -> bool;

    /// Click the platform's labeled "next" control; false when absent
    fn click_next_control(&mut self) -> bool;

    fn dispatch_key(&mut self, key: NavKey);

    fn scroll_into_view(&mut self, video: &VideoId);

    /// Scroll the feed container; false when none exists
    fn scroll_feed_container(&mut self) -> bool;
}
