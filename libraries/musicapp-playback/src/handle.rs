//! Player handles and the control surfaces behind them
//!
//! Each player kind exposes a different, non-uniform control surface:
//! - Native audio elements can be paused and rewound synchronously
//! - Cross-origin embeds only accept opaque JSON messages, with no reply
//! - Vendor widgets must finish an async ready handshake before they
//!   accept calls

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Stable identifier of a mounted player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of player behind a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    /// Directly playable stream in a native audio element
    NativeAudio,
    /// Cross-origin frame driven by posted messages
    MessagePassingEmbed,
    /// Vendor widget object with a ready handshake
    WidgetSdk,
}

impl PlayerKind {
    /// Player kind used for a search result source.
    ///
    /// YouTube videos play in an iframe that takes posted commands,
    /// Mixcloud shows go through its widget API, everything else streams
    /// natively.
    pub fn for_source(source: &str) -> Self {
        match source.to_ascii_lowercase().as_str() {
            "youtube" => PlayerKind::MessagePassingEmbed,
            "mixcloud" => PlayerKind::WidgetSdk,
            _ => PlayerKind::NativeAudio,
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerKind::NativeAudio => "native_audio",
            PlayerKind::MessagePassingEmbed => "message_passing_embed",
            PlayerKind::WidgetSdk => "widget_sdk",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Native audio
// =============================================================================

/// Control surface of a native audio element.
#[cfg_attr(test, mockall::automock)]
pub trait NativeAudioControl: Send + Sync {
    /// Pause playback
    fn pause(&self) -> Result<()>;

    /// Move the playback position
    fn set_position(&self, position: Duration) -> Result<()>;

    /// Whether the element is currently paused
    fn is_paused(&self) -> bool;
}

// =============================================================================
// Message-passing embeds
// =============================================================================

/// Send-only channel into an embedded frame.
///
/// Nothing is ever read back. A successful `post` only means the message
/// left; the frame may still ignore it.
#[cfg_attr(test, mockall::automock)]
pub trait EmbedChannel: Send + Sync {
    fn post(&self, payload: String) -> Result<()>;
}

impl EmbedChannel for mpsc::UnboundedSender<String> {
    fn post(&self, payload: String) -> Result<()> {
        self.send(payload).map_err(|_| PlaybackError::ChannelClosed)
    }
}

/// Command dialect spoken by an embedded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedProtocol {
    /// YouTube iframe API (`enablejsapi=1`)
    YouTubeIframe,
    /// Generic `{"method": ...}` postMessage players
    PostMessage,
    /// Dialect not known; every known stop command is sent
    #[default]
    Unknown,
}

impl EmbedProtocol {
    /// Payloads that ask a frame of this dialect to stop.
    pub fn silence_payloads(self) -> Vec<String> {
        let youtube = || {
            serde_json::json!({ "event": "command", "func": "stopVideo", "args": [] }).to_string()
        };
        let post_message = || serde_json::json!({ "method": "pause" }).to_string();

        match self {
            EmbedProtocol::YouTubeIframe => vec![youtube()],
            EmbedProtocol::PostMessage => vec![post_message()],
            EmbedProtocol::Unknown => vec![youtube(), post_message()],
        }
    }
}

/// Handle on an embedded frame.
#[derive(Clone)]
pub struct EmbedHandle {
    channel: Arc<dyn EmbedChannel>,
    protocol: EmbedProtocol,
}

impl EmbedHandle {
    pub fn new(channel: impl EmbedChannel + 'static, protocol: EmbedProtocol) -> Self {
        Self {
            channel: Arc::new(channel),
            protocol,
        }
    }

    pub fn protocol(&self) -> EmbedProtocol {
        self.protocol
    }

    /// Post without waiting for anything.
    pub fn post(&self, payload: String) -> Result<()> {
        self.channel.post(payload)
    }
}

impl fmt::Debug for EmbedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedHandle")
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Vendor widgets
// =============================================================================

/// Control surface of a vendor widget once it is ready.
#[cfg_attr(test, mockall::automock)]
pub trait WidgetControl: Send + Sync {
    fn pause(&self) -> Result<()>;
}

/// Handle on a vendor widget and its ready handshake.
#[derive(Clone)]
pub struct WidgetHandle {
    widget: Arc<dyn WidgetControl>,
    ready: watch::Receiver<bool>,
}

impl WidgetHandle {
    /// Wrap a widget whose handshake has not completed yet.
    ///
    /// The returned signal completes the handshake.
    pub fn new(widget: impl WidgetControl + 'static) -> (Self, ReadySignal) {
        let (tx, rx) = watch::channel(false);
        let handle = Self {
            widget: Arc::new(widget),
            ready: rx,
        };
        (handle, ReadySignal { tx })
    }

    /// Whether the handshake has completed.
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait for the handshake.
    ///
    /// Returns `false` if the signal was dropped before completing.
    pub async fn ready(&self) -> bool {
        let mut rx = self.ready.clone();
        let ready = rx.wait_for(|ready| *ready).await.is_ok();
        ready
    }

    pub fn pause(&self) -> Result<()> {
        self.widget.pause()
    }
}

impl fmt::Debug for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetHandle")
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

/// Completes a widget's ready handshake.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

impl ReadySignal {
    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }
}

// =============================================================================
// Handles
// =============================================================================

/// The control capability of a player, one case per kind.
#[derive(Clone)]
pub enum PlayerControl {
    NativeAudio(Arc<dyn NativeAudioControl>),
    MessagePassingEmbed(EmbedHandle),
    WidgetSdk(WidgetHandle),
}

impl PlayerControl {
    pub fn kind(&self) -> PlayerKind {
        match self {
            PlayerControl::NativeAudio(_) => PlayerKind::NativeAudio,
            PlayerControl::MessagePassingEmbed(_) => PlayerKind::MessagePassingEmbed,
            PlayerControl::WidgetSdk(_) => PlayerKind::WidgetSdk,
        }
    }
}

impl fmt::Debug for PlayerControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerControl::NativeAudio(control) => f
                .debug_tuple("NativeAudio")
                .field(&format_args!("paused={}", control.is_paused()))
                .finish(),
            PlayerControl::MessagePassingEmbed(embed) => {
                f.debug_tuple("MessagePassingEmbed").field(embed).finish()
            }
            PlayerControl::WidgetSdk(widget) => f.debug_tuple("WidgetSdk").field(widget).finish(),
        }
    }
}

/// A mounted player, registered under a stable id.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    pub id: PlayerId,
    pub control: PlayerControl,
}

impl PlayerHandle {
    pub fn native(id: impl Into<PlayerId>, control: impl NativeAudioControl + 'static) -> Self {
        Self {
            id: id.into(),
            control: PlayerControl::NativeAudio(Arc::new(control)),
        }
    }

    pub fn embed(id: impl Into<PlayerId>, embed: EmbedHandle) -> Self {
        Self {
            id: id.into(),
            control: PlayerControl::MessagePassingEmbed(embed),
        }
    }

    pub fn widget(id: impl Into<PlayerId>, widget: WidgetHandle) -> Self {
        Self {
            id: id.into(),
            control: PlayerControl::WidgetSdk(widget),
        }
    }

    pub fn kind(&self) -> PlayerKind {
        self.control.kind()
    }
}
