//! Load completion gate
//!
//! The load acknowledgment goes to the sender only after both the player
//! side is ready (LOADING entered, engine bound) and the media metadata has
//! been observed. The two arrive in either order; whichever comes second
//! triggers the acknowledgment, exactly once per load.

use crate::media::LoadInfo;
use tracing::info;
use uuid::Uuid;

/// The load an acknowledgment is owed for
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    pub load_id: Uuid,
    pub info: LoadInfo,
}

#[derive(Debug, Default)]
pub struct LoadCompletionGate {
    current: Option<PendingLoad>,
    engine_ready: bool,
    metadata_observed: bool,
    acknowledged: bool,
}

impl LoadCompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new load, clearing both readiness flags
    pub fn reset(&mut self, load_id: Uuid, info: LoadInfo) {
        self.current = Some(PendingLoad { load_id, info });
        self.engine_ready = false;
        self.metadata_observed = false;
        self.acknowledged = false;
    }

    /// Stop tracking the current load; nothing is owed until the next reset
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn mark_engine_ready(&mut self) -> Option<PendingLoad> {
        self.engine_ready = true;
        self.try_complete()
    }

    pub fn mark_metadata_observed(&mut self) -> Option<PendingLoad> {
        self.metadata_observed = true;
        self.try_complete()
    }

    /// The load to acknowledge, if both halves are in and it was not sent yet
    pub fn try_complete(&mut self) -> Option<PendingLoad> {
        if !self.engine_ready {
            info!("Deferring load response, player not ready");
            return None;
        }
        if !self.metadata_observed {
            info!("Deferring load response, metadata not received");
            return None;
        }
        if self.acknowledged {
            return None;
        }
        let pending = self.current.clone()?;
        self.acknowledged = true;
        Some(pending)
    }

    pub fn current(&self) -> Option<&PendingLoad> {
        self.current.as_ref()
    }

    pub fn load_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(|pending| pending.load_id)
    }

    pub fn is_engine_ready(&self) -> bool {
        self.engine_ready
    }

    pub fn is_metadata_observed(&self) -> bool {
        self.metadata_observed
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }
}
