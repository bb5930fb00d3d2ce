//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{page::PageCommand, state::StatusSnapshot};

/// Body of POST /toggle; a missing `enabled` flips the current toggle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// API response structure for toggle and event endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub page: StatusSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, page: StatusSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            page,
        }
    }

    /// Response reflecting the toggle state in `page`
    pub fn toggled(page: StatusSnapshot) -> Self {
        let (status, message) = if page.plugin_enabled {
            ("enabled", format!("Auto-scroll toggle on ({})", active_label(&page)))
        } else {
            ("disabled", "Auto-scroll toggle off".to_string())
        };
        Self::new(status, message, page)
    }

    /// Response for an event the page loop has applied
    pub fn applied(kind: &str, page: StatusSnapshot) -> Self {
        Self::new("applied", format!("Page event {} applied", kind), page)
    }
}

fn active_label(page: &StatusSnapshot) -> &'static str {
    if page.auto_scroll_enabled {
        "active on this page"
    } else {
        "waiting for a supported page"
    }
}

/// Commands drained for the page shim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsResponse {
    pub commands: Vec<PageCommand>,
    pub timestamp: DateTime<Utc>,
}

/// Status response with page and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub page: StatusSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
