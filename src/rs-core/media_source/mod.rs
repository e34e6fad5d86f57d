use thiserror::Error;

use crate::{
    bindings::{CreateEngineErrorCode, EngineHandle},
    host::{AdaptiveBackend, MediaElement},
    tracks::{AudioTrackId, QualityTarget},
    utils::url::Url,
};

mod adaptive;
mod errors;
mod native;

pub(crate) use adaptive::AdaptiveEngine;
pub use errors::{PlayerError, PlayerErrorKind, StreamingError, StreamingErrorClass};
pub(crate) use errors::{ErrorBanner, RecoveryAction, RecoveryPolicy};
pub(crate) use native::NativeEngine;

/// The source could not be loaded at all.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not create the adaptive engine ({code:?}): {message}")]
    EngineCreation {
        code: CreateEngineErrorCode,
        message: String,
    },
    #[error("The media element could not load the source: {0}")]
    MediaElement(String),
}

/// The way a content is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EngineKind {
    /// Through the adaptive streaming library.
    Adaptive,
    /// By giving the URL directly to the media element.
    Native,
}

/// Mutable access to what a `PlaybackEngine` drives.
pub(crate) struct EngineHost<'a> {
    pub(crate) media: &'a mut dyn MediaElement,
    pub(crate) backend: &'a mut dyn AdaptiveBackend,
}

/// Position and play state to restore once a swapped source has loaded its metadata.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ResumePoint {
    pub(crate) position: f64,
    pub(crate) was_playing: bool,
}

/// Outcome of a quality switch request.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum QualitySwitch {
    /// The target cannot be reached with this engine, or is already the current one.
    Unchanged,
    /// The switch happens seamlessly inside the engine.
    Seamless,
    /// The media source has been swapped: `ResumePoint` has to be restored once the new
    /// metadata is loaded.
    SourceSwapped(ResumePoint),
}

/// Everything the rest of the player needs from the thing actually loading media.
///
/// Implemented once for the adaptive streaming library and once for native playback, so
/// the `Dispatcher` never has to know which one is in use.
pub(crate) trait PlaybackEngine {
    fn kind(&self) -> EngineKind;

    /// Handle of the underlying adaptive engine instance, if one.
    ///
    /// Events coming from the JavaScript-side carry this handle, which allows to ignore
    /// those emitted by a previous instance.
    fn handle(&self) -> Option<EngineHandle>;

    fn load(&mut self, host: &mut EngineHost, url: &Url) -> Result<(), LoadError>;

    /// Free every resource linked to this engine. Calling it more than once has no effect.
    fn destroy(&mut self, host: &mut EngineHost);

    /// Switch to `target`. `resume` describes the current playback conditions, it is
    /// `None` when no metadata has been loaded yet.
    fn set_quality(
        &mut self,
        host: &mut EngineHost,
        target: &QualityTarget,
        resume: Option<ResumePoint>,
    ) -> QualitySwitch;

    /// Returns `false` if the track could not be switched to.
    fn set_audio_track(&mut self, host: &mut EngineHost, id: &AudioTrackId) -> bool;

    fn recover(&mut self, host: &mut EngineHost, action: RecoveryAction);
}

/// Choose how `url` should be played, based on its extension and on whether the
/// adaptive streaming library can run.
pub(crate) fn create_engine(url: &Url, backend: &dyn AdaptiveBackend) -> Box<dyn PlaybackEngine> {
    if url.is_adaptive_manifest() {
        if backend.is_supported() {
            log::info!("Loader: using the adaptive engine for {}", url);
            return Box::new(AdaptiveEngine::new());
        }
        log::warn!("Loader: adaptive engine not supported, falling back to native playback");
    } else {
        log::info!("Loader: using native playback for {}", url);
    }
    Box::new(NativeEngine::new(url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeAdaptive, FakeMedia};

    #[test]
    fn test_strategy_choice() {
        let supported = FakeAdaptive::default();
        let unsupported = FakeAdaptive::unsupported();
        let manifest = Url::new("https://cdn.test/a/master.m3u8".to_owned());
        let mp4 = Url::new("https://cdn.test/a/movie.mp4".to_owned());
        assert_eq!(create_engine(&manifest, &supported).kind(), EngineKind::Adaptive);
        assert_eq!(create_engine(&manifest, &unsupported).kind(), EngineKind::Native);
        assert_eq!(create_engine(&mp4, &supported).kind(), EngineKind::Native);
    }

    #[test]
    fn test_native_fallback_sets_source() {
        let mut media = FakeMedia::default();
        let mut backend = FakeAdaptive::unsupported();
        let url = Url::new("https://cdn.test/a/master.m3u8".to_owned());
        let mut engine = create_engine(&url, &backend);
        let mut host = EngineHost {
            media: &mut media,
            backend: &mut backend,
        };
        engine.load(&mut host, &url).unwrap();
        assert_eq!(media.source().as_deref(), Some("https://cdn.test/a/master.m3u8"));
        assert!(backend.live_handles().is_empty());
    }
}
