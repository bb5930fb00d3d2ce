//! In-memory mirror of the watched page

use std::collections::VecDeque;

use tracing::debug;

use super::{MediaSnapshot, NavKey, Page, PageCommand, PageEvent, VideoId, HAVE_METADATA};

/// Page state rebuilt from shim events; produced actions are queued as
/// [`PageCommand`]s until the shim drains them.
#[derive(Debug, Default)]
pub struct MirrorPage {
    url: String,
    videos: Vec<(VideoId, MediaSnapshot)>,
    hidden: bool,
    next_control: bool,
    feed_container: bool,
    commands: VecDeque<PageCommand>,
}

impl MirrorPage {
    /// Create an empty page at the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Fold a shim event into the mirror.
    ///
    /// Returns true when the event changed the document structure.
    pub fn apply(&mut self, event: &PageEvent) -> bool {
        match event {
            PageEvent::Navigated { url } => self.url = url.clone(),
            PageEvent::VideoInserted {
                video,
                duration,
                ready_state,
                paused,
            } => {
                self.insert_video(
                    video.clone(),
                    MediaSnapshot {
                        paused: *paused,
                        ready_state: *ready_state,
                        duration: *duration,
                    },
                );
            }
            PageEvent::VideoRemoved { video } => self.remove_video(video),
            PageEvent::MediaState {
                video,
                paused,
                ready_state,
            } => {
                if let Some(media) = self.media_mut(video) {
                    media.paused = *paused;
                    media.ready_state = *ready_state;
                }
            }
            PageEvent::MetadataLoaded { video, duration } => {
                if let Some(media) = self.media_mut(video) {
                    media.duration = *duration;
                    media.ready_state = media.ready_state.max(HAVE_METADATA);
                }
            }
            PageEvent::VisibilityChanged { hidden } => self.hidden = *hidden,
            PageEvent::Controls {
                next_control,
                feed_container,
            } => {
                self.next_control = *next_control;
                self.feed_container = *feed_container;
            }
            PageEvent::Toggle { .. } | PageEvent::Ended { .. } | PageEvent::UserScroll => {}
        }
        event.is_dom_mutation()
    }

    /// Attach a video at the end of the document, or refresh an attached one
    pub fn insert_video(&mut self, video: VideoId, media: MediaSnapshot) {
        match self.media_mut(&video) {
            Some(existing) => *existing = media,
            None => self.videos.push((video, media)),
        }
    }

    pub fn remove_video(&mut self, video: &VideoId) {
        self.videos.retain(|(id, _)| id != video);
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Take every queued command, oldest first
    pub fn drain_commands(&mut self) -> Vec<PageCommand> {
        self.commands.drain(..).collect()
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    fn media_mut(&mut self, video: &VideoId) -> Option<&mut MediaSnapshot> {
        self.videos
            .iter_mut()
            .find(|(id, _)| id == video)
            .map(|(_, media)| media)
    }

    fn push(&mut self, command: PageCommand) {
        debug!("Queueing page command: {:?}", command);
        self.commands.push_back(command);
    }
}

impl Page for MirrorPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn videos(&self) -> Vec<VideoId> {
        self.videos.iter().map(|(id, _)| id.clone()).collect()
    }

    fn media(&self, video: &VideoId) -> Option<MediaSnapshot> {
        self.videos
            .iter()
            .find(|(id, _)| id == video)
            .map(|(_, media)| *media)
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn click_next_control(&mut self) -> bool {
        if !self.next_control {
            return false;
        }
        self.push(PageCommand::ClickNext);
        true
    }

    fn dispatch_key(&mut self, key: NavKey) {
        self.push(PageCommand::DispatchKey { key });
    }

    fn scroll_into_view(&mut self, video: &VideoId) {
        self.push(PageCommand::ScrollIntoView {
            video: video.clone(),
        });
    }

    fn scroll_feed_container(&mut self) -> bool {
        if !self.feed_container {
            return false;
        }
        self.push(PageCommand::ScrollFeed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inserted(id: &str, ready_state: u8) -> PageEvent {
        PageEvent::VideoInserted {
            video: VideoId::new(id),
            duration: None,
            ready_state,
            paused: false,
        }
    }

    #[test]
    fn videos_keep_document_order() {
        let mut page = MirrorPage::new("https://www.tiktok.com/");
        assert!(page.apply(&inserted("a", 0)));
        assert!(page.apply(&inserted("b", 0)));
        assert_eq!(page.first_video(), Some(VideoId::new("a")));

        assert!(page.apply(&PageEvent::VideoRemoved {
            video: VideoId::new("a")
        }));
        assert_eq!(page.videos(), vec![VideoId::new("b")]);
        assert!(page.media(&VideoId::new("a")).is_none());
    }

    #[test]
    fn metadata_raises_ready_state() {
        let mut page = MirrorPage::new("https://www.tiktok.com/");
        page.apply(&inserted("a", 0));

        let changed = page.apply(&PageEvent::MetadataLoaded {
            video: VideoId::new("a"),
            duration: Some(9.0),
        });

        assert!(!changed);
        let media = page.media(&VideoId::new("a")).unwrap();
        assert!(media.has_metadata());
        assert_eq!(media.duration, Some(9.0));
    }

    #[test]
    fn absent_controls_produce_no_commands() {
        let mut page = MirrorPage::new("https://www.facebook.com/reel/1");
        assert!(!page.click_next_control());
        assert!(!page.scroll_feed_container());
        assert_eq!(page.pending_commands(), 0);

        page.apply(&PageEvent::Controls {
            next_control: true,
            feed_container: false,
        });
        assert!(page.click_next_control());
        page.dispatch_key(NavKey::ArrowDown);
        assert_eq!(
            page.drain_commands(),
            vec![
                PageCommand::ClickNext,
                PageCommand::DispatchKey {
                    key: NavKey::ArrowDown
                }
            ]
        );
        assert_eq!(page.pending_commands(), 0);
    }
}
