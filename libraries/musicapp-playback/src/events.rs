//! Player and playback events
//!
//! `PlayerEvent`s flow in from the views that mount players.
//! `PlaybackEvent`s flow out to anything that wants to follow the
//! active player (UI highlighting, now-playing display).

use crate::coordinator::SilenceOutcome;
use crate::handle::{PlayerHandle, PlayerId, PlayerKind};
use serde::{Deserialize, Serialize};

/// Lifecycle and play events reported by mounted players
#[derive(Debug)]
pub enum PlayerEvent {
    /// A player mounted and can be controlled
    Mounted(PlayerHandle),
    /// A player unmounted; its control reference is dead
    Unmounted(PlayerId),
    /// A player started playing
    PlayStarted(PlayerId),
}

/// Events emitted by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// The active player changed
    ActiveChanged {
        /// New active player, `None` once it unmounted
        active: Option<PlayerId>,
        /// Previously active player
        previous: Option<PlayerId>,
    },

    /// A silence command was issued to a non-active player
    Silenced {
        id: PlayerId,
        kind: PlayerKind,
        outcome: SilenceOutcome,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_changed_serialization() {
        let event = PlaybackEvent::ActiveChanged {
            active: Some(PlayerId::from("p2")),
            previous: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "active_changed", "active": "p2", "previous": null })
        );
    }

    #[test]
    fn test_silenced_roundtrip() {
        let event = PlaybackEvent::Silenced {
            id: PlayerId::from("mix-1"),
            kind: PlayerKind::WidgetSdk,
            outcome: SilenceOutcome::SkippedNotReady,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PlaybackEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
