//! Playback core
//!
//! **Module Structure:**
//! - `timer`: owned one-shot and periodic timer slots
//! - `idle_timer`: per-state inactivity watchdog
//! - `transition`: fade-bracketed execution of state changes
//! - `deferred_play`: delayed autoplay start
//! - `load_gate`: exactly-once load acknowledgment
//! - `state_machine`: current state and transition timestamps
//! - `player`: `CastPlayer`, which wires all of the above to the host

pub mod deferred_play;
pub mod idle_timer;
pub mod load_gate;
pub mod player;
pub mod state_machine;
pub mod timer;
pub mod transition;

pub use player::CastPlayer;
pub use transition::FadeTicket;
