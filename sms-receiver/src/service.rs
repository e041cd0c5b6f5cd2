//! Receiver service - async driver for the playback core
//!
//! One tokio task owns the `CastPlayer`. Inbound events and queries arrive
//! on an unbounded channel; between messages the task sleeps until the
//! earliest armed timer deadline and fires whatever is due. All player
//! access is serialized through this task.

use crate::config::ReceiverConfig;
use crate::error::{Error, Result};
use crate::events::ReceiverEvent;
use crate::host::Host;
use crate::media::{MediaStatus, PreloadRequest};
use crate::playback::CastPlayer;
use crate::state::SessionSnapshot;
use sms_common::{EventBus, PlayerState, SmsEvent};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Messages accepted by the service task
#[derive(Debug)]
enum Command {
    Event(ReceiverEvent),
    SetState {
        target: PlayerState,
        crossfade: bool,
        delay: Option<Duration>,
    },
    Snapshot(oneshot::Sender<SessionSnapshot>),
    CustomizeStatus(MediaStatus, oneshot::Sender<MediaStatus>),
    Preload(PreloadRequest, oneshot::Sender<bool>),
    Sync(oneshot::Sender<()>),
    Shutdown,
}

/// Spawns the service task
pub struct ReceiverService;

impl ReceiverService {
    /// Build the player and start driving it
    ///
    /// Fails if the player cannot be constructed (missing display region).
    pub fn spawn(
        config: ReceiverConfig,
        host: Host,
        events: EventBus,
    ) -> Result<(ReceiverHandle, JoinHandle<()>)> {
        let player = CastPlayer::new(config, host, events.clone(), Instant::now())?;
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(player, rx));
        info!("Receiver service started");
        Ok((ReceiverHandle { tx, events }, task))
    }
}

async fn run(mut player: CastPlayer, mut rx: mpsc::UnboundedReceiver<Command>) {
    loop {
        let deadline = player.next_deadline();
        tokio::select! {
            biased;

            command = rx.recv() => {
                let Some(command) = command else {
                    debug!("All receiver handles dropped");
                    break;
                };
                // Timers that expired before this message arrived go first
                player.fire_due_timers(Instant::now());
                if !handle_command(&mut player, command) {
                    break;
                }
            }

            _ = sleep_until_deadline(deadline) => {
                player.fire_due_timers(Instant::now());
            }
        }
    }
    info!("Receiver service stopped");
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Returns false when the task should exit
fn handle_command(player: &mut CastPlayer, command: Command) -> bool {
    let now = Instant::now();
    match command {
        Command::Event(event) => player.handle_event(event, now),
        Command::SetState {
            target,
            crossfade,
            delay,
        } => player.set_state(target, crossfade, delay, now),
        Command::Snapshot(reply) => {
            let _ = reply.send(player.snapshot(now));
        }
        Command::CustomizeStatus(status, reply) => {
            let _ = reply.send(player.customize_status(status));
        }
        Command::Preload(request, reply) => {
            let _ = reply.send(player.on_preload(&request));
        }
        Command::Sync(reply) => {
            let _ = reply.send(());
        }
        Command::Shutdown => return false,
    }
    true
}

/// Cloneable front end of a running receiver service
#[derive(Clone)]
pub struct ReceiverHandle {
    tx: mpsc::UnboundedSender<Command>,
    events: EventBus,
}

impl ReceiverHandle {
    /// Deliver an inbound event
    pub fn send(&self, event: ReceiverEvent) -> Result<()> {
        self.command(Command::Event(event))
    }

    /// Request a state transition directly
    pub fn set_state(
        &self,
        target: PlayerState,
        crossfade: bool,
        delay: Option<Duration>,
    ) -> Result<()> {
        self.command(Command::SetState {
            target,
            crossfade,
            delay,
        })
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::Snapshot(reply))?;
        rx.await.map_err(|_| Error::ServiceStopped)
    }

    /// Pass an outgoing media status through the player
    pub async fn customize_status(&self, status: MediaStatus) -> Result<MediaStatus> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::CustomizeStatus(status, reply))?;
        rx.await.map_err(|_| Error::ServiceStopped)
    }

    /// PRELOAD, returning whether the media was accepted
    pub async fn preload(&self, request: PreloadRequest) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::Preload(request, reply))?;
        rx.await.map_err(|_| Error::ServiceStopped)
    }

    /// Resolves once every message sent before it has been handled
    pub async fn sync(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::Sync(reply))?;
        rx.await.map_err(|_| Error::ServiceStopped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SmsEvent> {
        self.events.subscribe()
    }

    /// Stop the service task; pending timers never fire
    pub fn shutdown(&self) -> Result<()> {
        self.command(Command::Shutdown)
    }

    fn command(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| Error::ServiceStopped)
    }
}
