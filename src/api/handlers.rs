//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use tracing::{debug, error, info};

use super::responses::{ApiResponse, CommandsResponse, HealthResponse, StatusResponse, ToggleRequest};
use crate::{page::PageEvent, state::AppState};

/// Handle POST /toggle - Set or flip the extension toggle for this page
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle(request.enabled).await {
        Ok(page) => {
            info!("Toggle endpoint called - plugin enabled: {}", page.plugin_enabled);
            Ok(Json(ApiResponse::toggled(page)))
        }
        Err(e) => {
            error!("Failed to toggle auto-scroll: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /events - Forward one page observation to the page loop
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PageEvent>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let kind = event.kind();
    match state.forward_event(event).await {
        Ok(page) => {
            debug!("Events endpoint called - {} applied", kind);
            Ok(Json(ApiResponse::applied(kind, page)))
        }
        Err(e) => {
            error!("Failed to forward page event: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle GET /commands - Drain the commands queued for the page shim
pub async fn commands_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandsResponse>, StatusCode> {
    match state.drain_commands().await {
        Ok(commands) => {
            if !commands.is_empty() {
                info!("Handing {} page commands to the shim", commands.len());
            }
            Ok(Json(CommandsResponse {
                commands,
                timestamp: Utc::now(),
            }))
        }
        Err(e) => {
            error!("Failed to drain page commands: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle GET /status - Report activation and countdown state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();
    Json(StatusResponse {
        page: state.status(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
