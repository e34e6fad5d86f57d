use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::wasm_bindgen;

/// Category of an error reported by the adaptive engine.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamingErrorClass {
    /// Manifest, playlist or segment request failure.
    Network = 0,
    /// Decoding or buffering failure.
    Media = 1,
    /// Anything else, considered unrecoverable.
    Other = 2,
}

impl Display for StreamingErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StreamingErrorClass::Network => "network",
            StreamingErrorClass::Media => "media",
            StreamingErrorClass::Other => "unclassified",
        };
        write!(f, "{name}")
    }
}

/// An error reported by the adaptive engine.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{class} streaming error (fatal: {fatal}): {details}")]
pub struct StreamingError {
    pub class: StreamingErrorClass,
    /// `false` if the engine announced it will recover by itself.
    pub fatal: bool,
    pub details: String,
}

/// What to do after a `StreamingError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Ask the engine to restart loading segments.
    ReloadSegments,
    /// Ask the engine to re-create its media pipeline.
    RecoverMedia,
    /// Give up: tear the engine down and surface the error.
    Destroy,
}

/// Decides how to react to streaming errors, with a limited budget of recoveries per class.
///
/// Every error of a class, fatal or not, consumes that class's budget until playback
/// resumes successfully. Once a fatal error goes over budget, the engine is given up on.
#[derive(Debug)]
pub(crate) struct RecoveryPolicy {
    max_network: u32,
    max_media: u32,
    network_errors: u32,
    media_errors: u32,
}

impl RecoveryPolicy {
    pub(crate) fn new(max_network: u32, max_media: u32) -> Self {
        Self {
            max_network,
            max_media,
            network_errors: 0,
            media_errors: 0,
        }
    }

    pub(crate) fn update_budget(&mut self, max_network: u32, max_media: u32) {
        self.max_network = max_network;
        self.max_media = max_media;
    }

    /// Returns the action to take for `error`, `None` meaning that the engine is left to
    /// recover by itself.
    pub(crate) fn on_error(&mut self, error: &StreamingError) -> Option<RecoveryAction> {
        let (count, max, recovery) = match error.class {
            StreamingErrorClass::Network => (
                &mut self.network_errors,
                self.max_network,
                RecoveryAction::ReloadSegments,
            ),
            StreamingErrorClass::Media => (
                &mut self.media_errors,
                self.max_media,
                RecoveryAction::RecoverMedia,
            ),
            StreamingErrorClass::Other => {
                return error.fatal.then_some(RecoveryAction::Destroy);
            }
        };
        *count = count.saturating_add(1);
        if !error.fatal {
            None
        } else if *count > max {
            Some(RecoveryAction::Destroy)
        } else {
            Some(recovery)
        }
    }

    /// Playback resumed: errors encountered until now have been recovered from.
    pub(crate) fn on_playing(&mut self) {
        self.network_errors = 0;
        self.media_errors = 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerErrorKind {
    /// The source could not be loaded at all.
    Load,
    /// The adaptive engine failed and was destroyed.
    Streaming,
}

/// Error displayed in the persistent error banner until dismissed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerError {
    pub kind: PlayerErrorKind,
    pub message: String,
    /// If `true`, a "reload" affordance is offered.
    pub can_reload: bool,
}

/// Holds the one error banner a player can display.
#[derive(Debug, Default)]
pub(crate) struct ErrorBanner {
    current: Option<PlayerError>,
}

impl ErrorBanner {
    /// Display `error`, unless an error is already displayed. Returns `true` if it is now
    /// displayed.
    pub(crate) fn raise(&mut self, error: PlayerError) -> bool {
        if self.current.is_some() {
            log::debug!("Core: error banner already shown, ignoring \"{}\"", error.message);
            return false;
        }
        log::warn!("Core: showing error banner: {}", error.message);
        self.current = Some(error);
        true
    }

    pub(crate) fn dismiss(&mut self) -> Option<PlayerError> {
        self.current.take()
    }

    pub(crate) fn current(&self) -> Option<&PlayerError> {
        self.current.as_ref()
    }
}
