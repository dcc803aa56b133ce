//! Single-active-player coordination
//!
//! When any registered player starts, every other registered player gets a
//! best-effort silence command through its own control surface. Embed
//! commands are fire-and-forget and may be lost; that limitation is
//! reported as-is, never masked.

use crate::events::{PlaybackEvent, PlayerEvent};
use crate::handle::{PlayerControl, PlayerHandle, PlayerId};
use crate::registry::PlayerRegistry;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Capacity of the playback event channel created by `subscribe`
const EVENT_CAPACITY: usize = 64;

/// What a silence command did for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SilenceOutcome {
    /// Native audio paused and rewound to the start
    Paused { was_playing: bool },
    /// Embed commands posted; `delivered` left the channel, nothing more is known
    Posted { payloads: usize, delivered: usize },
    /// Widget paused through its SDK
    WidgetPaused,
    /// Widget has not finished its handshake, so it cannot be playing
    SkippedNotReady,
    /// The control call failed
    Failed { reason: String },
}

/// Result of handling one play event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilencePass {
    /// Active player after the pass
    pub active: Option<PlayerId>,
    /// One entry per silenced player, sorted by id
    pub outcomes: Vec<(PlayerId, SilenceOutcome)>,
}

impl SilencePass {
    pub fn outcome(&self, id: &PlayerId) -> Option<&SilenceOutcome> {
        self.outcomes
            .iter()
            .find(|(silenced, _)| silenced == id)
            .map(|(_, outcome)| outcome)
    }

    /// Whether the pass did nothing (unregistered id, or no other players)
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Keeps at most one player audible.
///
/// Owns the active player id; handles are only looked up in the shared
/// registry. Never returns errors.
#[derive(Debug)]
pub struct PlaybackCoordinator {
    registry: PlayerRegistry,
    /// Active id with the registration generation it was played under
    active: Option<(PlayerId, u64)>,
    events: Option<broadcast::Sender<PlaybackEvent>>,
}

impl PlaybackCoordinator {
    pub fn new(registry: PlayerRegistry) -> Self {
        Self {
            registry,
            active: None,
            events: None,
        }
    }

    /// Emit playback events on an existing channel.
    pub fn with_events(mut self, events: broadcast::Sender<PlaybackEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Subscribe to playback events.
    pub fn subscribe(&mut self) -> broadcast::Receiver<PlaybackEvent> {
        self.events
            .get_or_insert_with(|| broadcast::channel(EVENT_CAPACITY).0)
            .subscribe()
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// The active player, if the registration it played under is still mounted.
    pub fn active(&self) -> Option<&PlayerId> {
        self.active
            .as_ref()
            .filter(|(id, generation)| self.registry.generation(id) == Some(*generation))
            .map(|(id, _)| id)
    }

    pub fn register(&self, handle: PlayerHandle) {
        self.registry.register(handle);
    }

    /// Deregister a player. Deregistering the active player clears it.
    pub fn deregister(&mut self, id: &PlayerId) -> bool {
        if self.active() == Some(id) {
            self.set_active(None);
        }
        self.registry.deregister(id)
    }

    /// Make `id` the active player and silence every other one.
    ///
    /// An id that is not registered is ignored.
    pub fn on_play_started(&mut self, id: &PlayerId) -> SilencePass {
        if !self.registry.contains(id) {
            debug!(id = %id, "Play event from unregistered player ignored");
            return SilencePass {
                active: self.active().cloned(),
                outcomes: Vec::new(),
            };
        }

        self.set_active(Some(id.clone()));

        let outcomes: Vec<(PlayerId, SilenceOutcome)> = self
            .registry
            .others(id)
            .into_iter()
            .map(|handle| {
                let outcome = silence(&handle);
                self.emit(PlaybackEvent::Silenced {
                    id: handle.id.clone(),
                    kind: handle.kind(),
                    outcome: outcome.clone(),
                });
                (handle.id, outcome)
            })
            .collect();

        debug!(active = %id, silenced = outcomes.len(), "Silence pass complete");

        SilencePass {
            active: Some(id.clone()),
            outcomes,
        }
    }

    /// Apply one player event.
    pub fn handle_event(&mut self, event: PlayerEvent) -> Option<SilencePass> {
        match event {
            PlayerEvent::Mounted(handle) => {
                self.register(handle);
                None
            }
            PlayerEvent::Unmounted(id) => {
                self.deregister(&id);
                None
            }
            PlayerEvent::PlayStarted(id) => Some(self.on_play_started(&id)),
        }
    }

    /// Process player events in order until every sender is dropped.
    pub async fn run(&mut self, mut events: mpsc::Receiver<PlayerEvent>) {
        info!("Playback coordinator started");

        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }

        info!(active = ?self.active(), "Playback coordinator stopped");
    }

    fn set_active(&mut self, active: Option<PlayerId>) {
        let next = active.as_ref().and_then(|id| {
            self.registry
                .generation(id)
                .map(|generation| (id.clone(), generation))
        });
        if self.active == next {
            return;
        }

        // A stale entry left by direct registry removal reads as no player
        let previous = self.active().cloned();
        self.active = next;
        if previous == active {
            return;
        }

        info!(active = ?active, previous = ?previous, "Active player changed");
        self.emit(PlaybackEvent::ActiveChanged { active, previous });
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(events) = &self.events {
            // No subscribers is fine
            let _ = events.send(event);
        }
    }
}

/// Issue the kind-specific silence command to one player.
fn silence(handle: &PlayerHandle) -> SilenceOutcome {
    match &handle.control {
        PlayerControl::NativeAudio(control) => {
            let was_playing = !control.is_paused();
            match control
                .pause()
                .and_then(|()| control.set_position(Duration::ZERO))
            {
                Ok(()) => SilenceOutcome::Paused { was_playing },
                Err(e) => {
                    warn!(id = %handle.id, error = %e, "Failed to pause native player");
                    SilenceOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        }
        PlayerControl::MessagePassingEmbed(embed) => {
            let payloads = embed.protocol().silence_payloads();
            let total = payloads.len();
            let mut delivered = 0;

            for payload in payloads {
                match embed.post(payload) {
                    Ok(()) => delivered += 1,
                    Err(e) => debug!(id = %handle.id, error = %e, "Embed silence command not sent"),
                }
            }

            SilenceOutcome::Posted {
                payloads: total,
                delivered,
            }
        }
        PlayerControl::WidgetSdk(widget) => {
            if !widget.is_ready() {
                debug!(id = %handle.id, "Widget not ready, nothing to silence");
                return SilenceOutcome::SkippedNotReady;
            }
            match widget.pause() {
                Ok(()) => SilenceOutcome::WidgetPaused,
                Err(e) => {
                    warn!(id = %handle.id, error = %e, "Failed to pause widget");
                    SilenceOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        }
    }
}
