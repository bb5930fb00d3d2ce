//! Supported short-form video platforms and URL matching

use serde::{Deserialize, Serialize};
use url::Url;

/// Platform detected from the page URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    FacebookReels,
    InstagramReels,
    YoutubeShorts,
    TikTok,
    #[default]
    Unknown,
}

/// Host and path prefix of each supported platform; `None` matches any path
const PATTERNS: [(Platform, &str, Option<&str>); 4] = [
    (Platform::FacebookReels, "www.facebook.com", Some("/reel")),
    (Platform::YoutubeShorts, "www.youtube.com", Some("/shorts")),
    (Platform::InstagramReels, "www.instagram.com", Some("/reels")),
    (Platform::TikTok, "www.tiktok.com", None),
];

impl Platform {
    /// Detect the platform of a page URL
    pub fn detect(url: &str) -> Self {
        let Ok(parsed) = Url::parse(url) else {
            return Platform::Unknown;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return Platform::Unknown;
        }
        let Some(host) = parsed.host_str() else {
            return Platform::Unknown;
        };

        PATTERNS
            .iter()
            .find(|(_, pattern_host, prefix)| {
                host == *pattern_host && prefix.map_or(true, |p| parsed.path().starts_with(p))
            })
            .map(|(platform, _, _)| *platform)
            .unwrap_or(Platform::Unknown)
    }

    /// Whether auto-advance may run on this platform
    pub fn is_supported(self) -> bool {
        self != Platform::Unknown
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::FacebookReels => "facebook-reels",
            Platform::InstagramReels => "instagram-reels",
            Platform::YoutubeShorts => "youtube-shorts",
            Platform::TikTok => "tiktok",
            Platform::Unknown => "unknown",
        }
    }
}
