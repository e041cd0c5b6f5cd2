//! # SMS Receiver
//!
//! Playback core of a cast media receiver: the player state machine, load
//! orchestration with its exactly-once acknowledgment, fade-bracketed state
//! transitions, idle timeouts and deferred autoplay.
//!
//! The core (`playback::CastPlayer`) is synchronous and host-agnostic; the
//! host supplies collaborators through the traits in [`host`] and
//! `service::ReceiverService` drives the core on a tokio task.

pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod events;
pub mod host;
pub mod media;
pub mod playback;
pub mod service;
pub mod state;

pub use config::ReceiverConfig;
pub use error::{Error, Result};
pub use events::ReceiverEvent;
pub use playback::CastPlayer;
pub use service::{ReceiverHandle, ReceiverService};
