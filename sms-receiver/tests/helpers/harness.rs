//! Synchronous player driver on a synthetic clock

use super::mock_host::MockHost;
use sms_common::{EventBus, PlayerState, SmsEvent};
use sms_receiver::media::LoadInfo;
use sms_receiver::state::SessionSnapshot;
use sms_receiver::{CastPlayer, ReceiverConfig, ReceiverEvent};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

pub struct Harness {
    pub host: MockHost,
    pub player: CastPlayer,
    pub now: Instant,
    events: broadcast::Receiver<SmsEvent>,
    fades_delivered: usize,
    prefetches_delivered: usize,
}

impl Harness {
    pub fn new(host: MockHost) -> Self {
        Self::with_config(host, ReceiverConfig::default())
    }

    pub fn with_config(host: MockHost, config: ReceiverConfig) -> Self {
        let bus = EventBus::new(1024);
        let events = bus.subscribe();
        let now = Instant::now();
        let player = CastPlayer::new(config, host.host(), bus, now).unwrap();
        Self {
            host,
            player,
            now,
            events,
            fades_delivered: 0,
            prefetches_delivered: 0,
        }
    }

    /// Player that has received `Ready` and sits in IDLE
    pub fn ready(host: MockHost) -> Self {
        let mut harness = Self::new(host);
        harness.event(ReceiverEvent::Ready);
        harness
    }

    pub fn event(&mut self, event: ReceiverEvent) {
        self.player.handle_event(event, self.now);
    }

    pub fn load(&mut self, info: LoadInfo) {
        self.event(ReceiverEvent::Load(info));
    }

    /// Advance the clock and fire whatever became due
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        self.player.fire_due_timers(self.now);
    }

    pub fn state(&self) -> PlayerState {
        self.player.state()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.player.snapshot(self.now)
    }

    /// Complete the oldest outstanding fade-out; false if none is outstanding
    pub fn complete_next_fade(&mut self) -> bool {
        let tickets = self.host.fade_tickets();
        match tickets.get(self.fades_delivered) {
            Some(ticket) => {
                self.fades_delivered += 1;
                self.event(ReceiverEvent::FadeOutComplete { ticket: *ticket });
                true
            }
            None => false,
        }
    }

    /// Complete the oldest outstanding artwork prefetch
    pub fn complete_next_prefetch(&mut self) -> bool {
        let tickets = self.host.prefetch_tickets();
        match tickets.get(self.prefetches_delivered) {
            Some(ticket) => {
                self.prefetches_delivered += 1;
                self.event(ReceiverEvent::ImagesPrefetched { ticket: *ticket });
                true
            }
            None => false,
        }
    }

    /// Complete prefetches and fades until nothing is outstanding
    pub fn settle(&mut self) {
        while self.complete_next_prefetch() || self.complete_next_fade() {}
    }

    /// Status events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<SmsEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Settled state changes emitted since the last drain
    pub fn drain_transitions(&mut self) -> Vec<(PlayerState, PlayerState)> {
        self.drain_events()
            .into_iter()
            .filter_map(|event| match event {
                SmsEvent::PlayerStateChanged {
                    old_state,
                    new_state,
                    ..
                } => Some((old_state, new_state)),
                _ => None,
            })
            .collect()
    }
}
