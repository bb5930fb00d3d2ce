//! Platform-specific advance actions
//!
//! Each platform performs exactly one best-effort action per call. Nothing
//! is verified or retried here: a successful advance shows up later as a new
//! candidate video.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Platform;
use crate::page::{NavKey, Page, VideoId};

/// The single action an advance call performed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    ClickedNext,
    Key { key: NavKey },
    ScrolledIntoView { video: VideoId },
    ScrolledFeed,
}

impl Platform {
    /// Present the next item on this platform
    pub fn advance(self, page: &mut dyn Page) -> AdvanceOutcome {
        info!("Advancing to next video on {}", self.name());
        match self {
            Platform::FacebookReels => next_card(page),
            Platform::InstagramReels => next_reel_in_feed(page),
            Platform::YoutubeShorts | Platform::TikTok => key(page, NavKey::ArrowDown),
            Platform::Unknown => {
                debug!("Unknown platform, sending ArrowDown");
                key(page, NavKey::ArrowDown)
            }
        }
    }
}

fn key(page: &mut dyn Page, key: NavKey) -> AdvanceOutcome {
    page.dispatch_key(key);
    AdvanceOutcome::Key { key }
}

fn next_card(page: &mut dyn Page) -> AdvanceOutcome {
    if page.click_next_control() {
        return AdvanceOutcome::ClickedNext;
    }
    warn!("No next control found, falling back to ArrowRight");
    key(page, NavKey::ArrowRight)
}

fn next_reel_in_feed(page: &mut dyn Page) -> AdvanceOutcome {
    let videos = page.videos();
    if let Some(next) = videos.get(1) {
        debug!("Found {} videos, scrolling {} into view", videos.len(), next);
        page.scroll_into_view(next);
        return AdvanceOutcome::ScrolledIntoView {
            video: next.clone(),
        };
    }
    if page.scroll_feed_container() {
        return AdvanceOutcome::ScrolledFeed;
    }
    warn!("No next reel and no feed container, falling back to ArrowDown");
    key(page, NavKey::ArrowDown)
}
