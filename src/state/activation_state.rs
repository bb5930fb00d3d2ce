//! Activation flags of the page session

use serde::{Deserialize, Serialize};

/// Whether the auto-advance machinery should run on this page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationState {
    /// Set by the extension toggle
    pub plugin_enabled: bool,
    /// `plugin_enabled` and the current URL is a supported platform
    pub auto_scroll_enabled: bool,
}
