//! Playback state and the failure taxonomy surfaced to the listener.
//!
//! Nothing here touches browser APIs; the web frontend feeds raw media error
//! codes and DOMException names in and gets typed values back.

use crate::strings;
use thiserror::Error;

/// Discrete playback state. Exactly one value holds at a time and it resets
/// to `Idle` on every page load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    #[default]
    Idle,
    Buffering,
    Playing,
    Paused,
    Error,
}

impl PlaybackState {
    /// Playing or about to play; a toggle from here pauses.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Buffering)
    }

    /// Value reported to the system media session.
    #[inline]
    pub fn session_state(self) -> &'static str {
        if self.is_active() {
            "playing"
        } else {
            "paused"
        }
    }
}

/// A playback failure. `Display` yields the localized message shown in the UI.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum PlayerError {
    #[error("{}", strings::errors::NETWORK)]
    Network,
    #[error("{}", strings::errors::DECODE)]
    Decode,
    #[error("{}", strings::errors::SRC_NOT_SUPPORTED)]
    SourceUnsupported,
    #[error("{}", strings::errors::AUTOPLAY)]
    Autoplay,
    #[error("{}", strings::errors::OFFLINE)]
    Offline,
    #[error("{}", strings::errors::GENERAL)]
    General,
}

impl PlayerError {
    /// Autoplay blocks only need a tap on play, so the generic hint is omitted.
    #[inline]
    pub fn shows_troubleshoot_hint(self) -> bool {
        self != PlayerError::Autoplay
    }

    /// Classify a rejected `play()` promise.
    pub fn from_rejection(rejection: &PlayRejection) -> Self {
        match rejection.name.as_str() {
            "NotAllowedError" => PlayerError::Autoplay,
            "NotSupportedError" => PlayerError::SourceUnsupported,
            _ if !rejection.online => PlayerError::Offline,
            _ => PlayerError::General,
        }
    }
}

/// Media element error classes, keyed by `MediaError.code`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaErrorKind {
    Aborted,
    Network,
    Decode,
    SourceUnsupported,
    Unknown,
}

impl MediaErrorKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => MediaErrorKind::Aborted,
            2 => MediaErrorKind::Network,
            3 => MediaErrorKind::Decode,
            4 => MediaErrorKind::SourceUnsupported,
            _ => MediaErrorKind::Unknown,
        }
    }
}

impl From<MediaErrorKind> for PlayerError {
    fn from(kind: MediaErrorKind) -> Self {
        match kind {
            MediaErrorKind::Network => PlayerError::Network,
            MediaErrorKind::Decode => PlayerError::Decode,
            MediaErrorKind::SourceUnsupported => PlayerError::SourceUnsupported,
            MediaErrorKind::Aborted | MediaErrorKind::Unknown => PlayerError::General,
        }
    }
}

/// What the browser told us when `play()` rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayRejection {
    /// DOMException name, e.g. `NotAllowedError`. Empty when not a DOMException.
    pub name: String,
    /// `navigator.onLine` at the time of rejection.
    pub online: bool,
}

impl PlayRejection {
    pub fn new(name: impl Into<String>, online: bool) -> Self {
        Self {
            name: name.into(),
            online,
        }
    }
}

/// The audio analysis graph could not be built. Playback continues without it.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("audio context unavailable: {0}")]
    Context(String),
    #[error("media element source rejected: {0}")]
    Source(String),
    #[error("node connection failed: {0}")]
    Connect(String),
}
