//! Inbound page events forwarded by the page shim

use serde::{Deserialize, Serialize};

use super::VideoId;

/// One observation of the page, in the order the shim saw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// The extension toggle was flipped for this page
    Toggle { enabled: bool },
    /// The document URL changed (soft navigations included)
    Navigated { url: String },
    /// A `<video>` element was attached to the document
    VideoInserted {
        video: VideoId,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        ready_state: u8,
        #[serde(default)]
        paused: bool,
    },
    /// A `<video>` element was detached from the document
    VideoRemoved { video: VideoId },
    /// Latest `paused`/`readyState` flags of a video
    MediaState {
        video: VideoId,
        paused: bool,
        ready_state: u8,
    },
    /// `loadedmetadata` fired on a video
    MetadataLoaded {
        video: VideoId,
        #[serde(default)]
        duration: Option<f64>,
    },
    /// `ended` fired on a video
    Ended { video: VideoId },
    /// `visibilitychange` fired on the document
    VisibilityChanged { hidden: bool },
    /// A user-originated scroll on the document
    UserScroll,
    /// Presence of the platform controls the navigator looks for
    Controls {
        #[serde(default)]
        next_control: bool,
        #[serde(default)]
        feed_container: bool,
    },
}

impl PageEvent {
    /// Whether this event changes the structure of the document
    pub fn is_dom_mutation(&self) -> bool {
        matches!(
            self,
            PageEvent::VideoInserted { .. } | PageEvent::VideoRemoved { .. }
        )
    }

    /// Short name used in logs and API responses
    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::Toggle { .. } => "toggle",
            PageEvent::Navigated { .. } => "navigated",
            PageEvent::VideoInserted { .. } => "video_inserted",
            PageEvent::VideoRemoved { .. } => "video_removed",
            PageEvent::MediaState { .. } => "media_state",
            PageEvent::MetadataLoaded { .. } => "metadata_loaded",
            PageEvent::Ended { .. } => "ended",
            PageEvent::VisibilityChanged { .. } => "visibility_changed",
            PageEvent::UserScroll => "user_scroll",
            PageEvent::Controls { .. } => "controls",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shim_json_is_accepted() {
        let event: PageEvent = serde_json::from_str(
            r#"{"type":"video_inserted","video":"v-17","ready_state":1,"duration":14.5}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            PageEvent::VideoInserted {
                video: VideoId::new("v-17"),
                duration: Some(14.5),
                ready_state: 1,
                paused: false,
            }
        );
        assert!(event.is_dom_mutation());
    }

    #[test]
    fn null_duration_means_unknown() {
        let event: PageEvent =
            serde_json::from_str(r#"{"type":"metadata_loaded","video":"a","duration":null}"#).unwrap();

        assert_eq!(
            event,
            PageEvent::MetadataLoaded {
                video: VideoId::new("a"),
                duration: None,
            }
        );
        assert!(!event.is_dom_mutation());
    }

    #[test]
    fn unit_variants_only_need_a_tag() {
        let event: PageEvent = serde_json::from_str(r#"{"type":"user_scroll"}"#).unwrap();
        assert_eq!(event, PageEvent::UserScroll);
        assert_eq!(event.kind(), "user_scroll");
    }
}
