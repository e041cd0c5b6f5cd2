//! # SMS Player Common Library
//!
//! Shared code for the SMS cast receiver including:
//! - Player state and playback category enums
//! - Status event types (SmsEvent enum) and the EventBus
//! - Configuration file discovery and TOML loading
//! - Duration display formatting

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod time;

pub use error::{Error, Result};
pub use events::{EventBus, PlaybackCategory, PlayerState, SmsEvent};
