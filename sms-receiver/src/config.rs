//! Configuration for the receiver playback core
//!
//! Bootstrap settings loaded from TOML with built-in defaults. Every field is
//! optional in the file; anything omitted keeps the default below.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (--config, --debug, --no-display)
//! 2. Environment variable (SMS_RECEIVER_CONFIG)
//! 3. Platform TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::error::{Error, Result};
use serde::Deserialize;
use sms_common::time::millis_to_duration;
use sms_common::PlayerState;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SMS_RECEIVER_CONFIG";

const MINUTE_MS: u64 = 60 * 1000;

/// Upper bound for every configured delay (one week)
pub const MAX_DELAY_MS: u64 = 7 * 24 * 60 * MINUTE_MS;

/// Receiver configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Inactivity timeout per player state
    pub idle_timeouts: IdleTimeouts,

    /// Duration of a full fade-out + fade-in transition, in seconds
    pub transition_duration_secs: f64,

    /// Minimum time media info stays on screen before autoplay starts
    pub media_info_duration_ms: u64,

    /// Interval between overlay repositions while playing audio
    pub burn_in_interval_ms: u64,

    /// How long the seeking indicator lingers after a seek completes
    pub seeking_indicator_ms: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            idle_timeouts: IdleTimeouts::default(),
            transition_duration_secs: 1.5,
            media_info_duration_ms: 3 * 1000,
            burn_in_interval_ms: 30 * 1000,
            seeking_indicator_ms: 3 * 1000,
            logging: LoggingConfig::default(),
        }
    }
}

impl ReceiverConfig {
    /// Load configuration from an optional TOML file
    ///
    /// A missing file yields defaults; a malformed or invalid file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: ReceiverConfig = sms_common::config::load_toml_or_default(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the playback core cannot honor
    pub fn validate(&self) -> Result<()> {
        if !self.transition_duration_secs.is_finite() || self.transition_duration_secs < 0.0 {
            return Err(Error::Config(format!(
                "transition_duration_secs must be a non-negative number, got {}",
                self.transition_duration_secs
            )));
        }
        if self.transition_duration_secs * 1000.0 > MAX_DELAY_MS as f64 {
            return Err(Error::Config(format!(
                "transition_duration_secs must be at most {} ms, got {}",
                MAX_DELAY_MS, self.transition_duration_secs
            )));
        }
        if self.burn_in_interval_ms == 0 {
            return Err(Error::Config(
                "burn_in_interval_ms must be greater than zero".to_string(),
            ));
        }

        check_delay("media_info_duration_ms", Some(self.media_info_duration_ms))?;
        check_delay("burn_in_interval_ms", Some(self.burn_in_interval_ms))?;
        check_delay("seeking_indicator_ms", Some(self.seeking_indicator_ms))?;
        let timeouts = &self.idle_timeouts;
        check_delay("idle_timeouts.launching_ms", timeouts.launching_ms)?;
        check_delay("idle_timeouts.loading_ms", timeouts.loading_ms)?;
        check_delay("idle_timeouts.buffering_ms", timeouts.buffering_ms)?;
        check_delay("idle_timeouts.playing_ms", timeouts.playing_ms)?;
        check_delay("idle_timeouts.paused_ms", timeouts.paused_ms)?;
        check_delay("idle_timeouts.done_ms", timeouts.done_ms)?;
        check_delay("idle_timeouts.idle_ms", timeouts.idle_ms)?;
        Ok(())
    }

    pub fn media_info_duration(&self) -> Duration {
        millis_to_duration(self.media_info_duration_ms)
    }

    pub fn burn_in_interval(&self) -> Duration {
        millis_to_duration(self.burn_in_interval_ms)
    }

    pub fn seeking_indicator(&self) -> Duration {
        millis_to_duration(self.seeking_indicator_ms)
    }
}

fn check_delay(name: &str, ms: Option<u64>) -> Result<()> {
    match ms {
        Some(ms) if ms > MAX_DELAY_MS => Err(Error::Config(format!(
            "{} must be at most {} ms, got {}",
            name, MAX_DELAY_MS, ms
        ))),
        _ => Ok(()),
    }
}

/// Idle timeout table, in milliseconds
///
/// A `None` entry means the state never times out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdleTimeouts {
    pub launching_ms: Option<u64>,
    pub loading_ms: Option<u64>,
    pub buffering_ms: Option<u64>,
    pub playing_ms: Option<u64>,
    pub paused_ms: Option<u64>,
    pub done_ms: Option<u64>,
    pub idle_ms: Option<u64>,
}

impl Default for IdleTimeouts {
    fn default() -> Self {
        Self {
            launching_ms: Some(5 * MINUTE_MS),
            loading_ms: Some(5 * MINUTE_MS),
            buffering_ms: None,
            playing_ms: None,
            paused_ms: Some(20 * MINUTE_MS),
            done_ms: Some(5 * MINUTE_MS),
            idle_ms: Some(5 * MINUTE_MS),
        }
    }
}

impl IdleTimeouts {
    /// Timeout for `state`, or `None` if the state never times out
    pub fn for_state(&self, state: PlayerState) -> Option<Duration> {
        let ms = match state {
            PlayerState::Launching => self.launching_ms,
            PlayerState::Loading => self.loading_ms,
            PlayerState::Buffering => self.buffering_ms,
            PlayerState::Playing => self.playing_ms,
            PlayerState::Paused => self.paused_ms,
            PlayerState::Done => self.done_ms,
            PlayerState::Idle => self.idle_ms,
        };
        // Zero disables the timer
        ms.filter(|ms| *ms > 0).map(millis_to_duration)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Verbose receiver diagnostics, same as --debug
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            debug: false,
        }
    }
}

impl LoggingConfig {
    /// Default tracing filter directive for this configuration
    pub fn filter_directive(&self) -> String {
        if self.debug {
            "sms_receiver=debug,sms_common=debug".to_string()
        } else {
            format!("sms_receiver={0},sms_common={0}", self.level)
        }
    }
}
