//! MusicApp - Playback Coordination
//!
//! Keeps at most one of many mounted players audible.
//!
//! Search and library views mount many players at once, of three kinds
//! with genuinely different control surfaces:
//! - Native audio: synchronous pause and rewind
//! - Message-passing embeds: fire-and-forget JSON commands, no replies
//! - Vendor widgets: usable only after an async ready handshake
//!
//! Players register with a shared [`PlayerRegistry`] as they mount. The
//! [`PlaybackCoordinator`] reacts to play events by silencing every other
//! registered player through its own protocol.
//!
//! # Example
//!
//! ```rust
//! use musicapp_playback::{
//!     EmbedHandle, EmbedProtocol, PlaybackCoordinator, PlayerHandle, PlayerId, PlayerRegistry,
//! };
//! use tokio::sync::mpsc;
//!
//! let registry = PlayerRegistry::new();
//!
//! let (frame_a, _rx_a) = mpsc::unbounded_channel::<String>();
//! let (frame_b, mut rx_b) = mpsc::unbounded_channel::<String>();
//! registry.register(PlayerHandle::embed("a", EmbedHandle::new(frame_a, EmbedProtocol::YouTubeIframe)));
//! registry.register(PlayerHandle::embed("b", EmbedHandle::new(frame_b, EmbedProtocol::YouTubeIframe)));
//!
//! let mut coordinator = PlaybackCoordinator::new(registry);
//! coordinator.on_play_started(&PlayerId::from("a"));
//!
//! // Frame "b" was told to stop
//! assert!(rx_b.try_recv().unwrap().contains("stopVideo"));
//! ```

mod coordinator;
mod error;
mod events;
mod handle;
mod registry;

pub use coordinator::{PlaybackCoordinator, SilenceOutcome, SilencePass};
pub use error::{PlaybackError, Result};
pub use events::{PlaybackEvent, PlayerEvent};
pub use handle::{
    EmbedChannel, EmbedHandle, EmbedProtocol, NativeAudioControl, PlayerControl, PlayerHandle,
    PlayerId, PlayerKind, ReadySignal, WidgetControl, WidgetHandle,
};
pub use registry::PlayerRegistry;
