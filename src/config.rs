//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "reel-advance")]
#[command(about = "Auto-advance controller for short-form video feeds")]
#[command(version)]
pub struct Config {
    /// Port the page bridge listens on
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// URL of the page when the bridge starts
    #[arg(long, default_value = "about:blank")]
    pub url: String,

    /// Start with the extension toggle switched on
    #[arg(long)]
    pub plugin_enabled: bool,

    /// Extra time added on top of a video's reported duration, in milliseconds
    #[arg(long, default_value = "2000")]
    pub buffer_ms: u64,

    /// Countdown used when a video reports no usable duration, in milliseconds
    #[arg(long, default_value = "60000")]
    pub fallback_ms: u64,

    /// Playback flag sampling period, in milliseconds
    #[arg(long, default_value = "500")]
    pub poll_ms: u64,

    /// Activation re-evaluation period, in milliseconds
    #[arg(long, default_value = "1000")]
    pub gate_ms: u64,

    /// Treat a video without current data (buffering) as paused
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub pause_on_buffering: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timing settings for the countdown machinery
    pub fn countdown(&self) -> CountdownConfig {
        CountdownConfig {
            buffer: Duration::from_millis(self.buffer_ms),
            fallback: Duration::from_millis(self.fallback_ms),
            poll_interval: Duration::from_millis(self.poll_ms.max(1)),
            gate_interval: Duration::from_millis(self.gate_ms.max(1)),
            pause_on_buffering: self.pause_on_buffering,
        }
    }
}

/// Timing settings shared by the gate, the poller and the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    pub buffer: Duration,
    pub fallback: Duration,
    pub poll_interval: Duration,
    pub gate_interval: Duration,
    pub pause_on_buffering: bool,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            buffer: Duration::from_millis(2000),
            fallback: Duration::from_millis(60_000),
            poll_interval: Duration::from_millis(500),
            gate_interval: Duration::from_millis(1000),
            pause_on_buffering: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = Config::try_parse_from(["reel-advance"]).unwrap();
        assert_eq!(config.countdown(), CountdownConfig::default());
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn buffering_pause_can_be_turned_off() {
        let config =
            Config::try_parse_from(["reel-advance", "--pause-on-buffering", "false", "-v"]).unwrap();
        assert!(!config.countdown().pause_on_buffering);
        assert_eq!(config.log_level(), "debug");
    }
}
