//! Shared state of the page bridge server

use std::{sync::Mutex, time::Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

use super::StatusSnapshot;
use crate::{
    page::{PageCommand, PageEvent},
    tasks::LoopMessage,
};

/// Handles the HTTP side uses to talk to the page loop
#[derive(Debug)]
pub struct AppState {
    /// Requests into the page loop
    pub loop_tx: mpsc::Sender<LoopMessage>,
    /// Latest status published by the page loop
    pub status_rx: watch::Receiver<StatusSnapshot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        loop_tx: mpsc::Sender<LoopMessage>,
        status_rx: watch::Receiver<StatusSnapshot>,
    ) -> Self {
        Self {
            loop_tx,
            status_rx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    async fn send(&self, action: &str, message: LoopMessage) -> Result<(), String> {
        self.loop_tx
            .send(message)
            .await
            .map_err(|_| format!("Page loop is not running, cannot deliver {}", action))?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        Ok(())
    }

    /// Forward a shim event to the page loop; returns the status once it was applied
    pub async fn forward_event(&self, event: PageEvent) -> Result<StatusSnapshot, String> {
        let action = event.kind();
        let (reply, rx) = oneshot::channel();
        self.send(action, LoopMessage::Event { event, reply }).await?;
        rx.await
            .map_err(|e| format!("Page loop dropped the {} reply: {}", action, e))
    }

    /// Set the toggle, or flip it when `enabled` is `None`
    pub async fn toggle(&self, enabled: Option<bool>) -> Result<StatusSnapshot, String> {
        let (reply, rx) = oneshot::channel();
        self.send("toggle", LoopMessage::Toggle { enabled, reply }).await?;
        rx.await
            .map_err(|e| format!("Page loop dropped the toggle reply: {}", e))
    }

    /// Take every command queued for the shim
    pub async fn drain_commands(&self) -> Result<Vec<PageCommand>, String> {
        let (reply, rx) = oneshot::channel();
        self.loop_tx
            .send(LoopMessage::DrainCommands(reply))
            .await
            .map_err(|_| "Page loop is not running, cannot drain commands".to_string())?;
        rx.await.map_err(|e| {
            warn!("Page loop dropped the drain reply: {}", e);
            format!("Page loop dropped the drain reply: {}", e)
        })
    }

    /// Get the latest published status
    pub fn status(&self) -> StatusSnapshot {
        self.status_rx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
