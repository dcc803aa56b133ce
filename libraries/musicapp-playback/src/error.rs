//! Error types for player controls

use thiserror::Error;

/// Errors raised by a player's control surface.
///
/// The coordinator logs these and carries on; they never escape a
/// silence pass.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The player's control reference is gone (element unmounted, frame closed)
    #[error("Player detached: {0}")]
    Detached(String),

    /// The embed channel refused the message
    #[error("Embed channel closed")]
    ChannelClosed,

    /// The control call itself failed
    #[error("Control failed: {0}")]
    Control(String),
}

/// Result type for player control calls
pub type Result<T> = std::result::Result<T, PlaybackError>;
