//! Detection of the video the page is currently presenting

use tracing::debug;

use crate::page::{Page, VideoId};

/// Reports a candidate whenever the first `<video>` in the document changes
/// identity. Driven by DOM mutation notifications while active.
#[derive(Debug, Default)]
pub struct VideoTracker {
    active: bool,
    tracked: Option<VideoId>,
}

impl VideoTracker {
    /// Start watching. Returns false if already watching.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        debug!("Video tracker started");
        self.active = true;
        true
    }

    /// Stop watching and forget the tracked video
    pub fn stop(&mut self) {
        if self.active {
            debug!("Video tracker stopped");
        }
        self.active = false;
        self.tracked = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tracked(&self) -> Option<&VideoId> {
        self.tracked.as_ref()
    }

    /// Look at the document after a mutation.
    ///
    /// Returns the first video when it differs from the tracked one; the same
    /// element is never reported twice in a row.
    pub fn scan(&mut self, page: &dyn Page) -> Option<VideoId> {
        if !self.active {
            return None;
        }
        let first = page.first_video()?;
        if self.tracked.as_ref() == Some(&first) {
            return None;
        }
        self.tracked = Some(first.clone());
        Some(first)
    }
}
