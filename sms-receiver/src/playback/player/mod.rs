//! Cast player, split by concern
//!
//! - `core.rs`: construction, state transitions, gated actions, timers
//! - `load.rs`: load orchestration and the load acknowledgment
//! - `handlers.rs`: engine, receiver and sender event handlers

mod core;
mod handlers;
mod load;

pub use self::core::CastPlayer;
