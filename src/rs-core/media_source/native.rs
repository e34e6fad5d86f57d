use super::{
    EngineHost, EngineKind, LoadError, PlaybackEngine, QualitySwitch, RecoveryAction, ResumePoint,
};
use crate::{
    bindings::EngineHandle,
    tracks::{AudioTrackId, QualityTarget},
    utils::url::Url,
};

/// `PlaybackEngine` giving URLs directly to the media element.
///
/// Quality switches are performed by swapping the element's source between the
/// renditions listed in the content metadata.
#[derive(Debug)]
pub(crate) struct NativeEngine {
    /// URL of the content itself, used for the "Auto" quality.
    default_url: Url,
    /// URL currently set on the media element. `None` if not loaded.
    current_url: Option<Url>,
}

impl NativeEngine {
    pub(crate) fn new(default_url: Url) -> Self {
        Self {
            default_url,
            current_url: None,
        }
    }

    fn swap_source(&mut self, host: &mut EngineHost, url: Url) {
        host.media.set_source(&url);
        self.current_url = Some(url);
    }
}

impl PlaybackEngine for NativeEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Native
    }

    fn handle(&self) -> Option<EngineHandle> {
        None
    }

    fn load(&mut self, host: &mut EngineHost, url: &Url) -> Result<(), LoadError> {
        self.swap_source(host, url.clone());
        Ok(())
    }

    fn destroy(&mut self, host: &mut EngineHost) {
        if self.current_url.take().is_some() {
            host.media.clear_source();
        }
    }

    fn set_quality(
        &mut self,
        host: &mut EngineHost,
        target: &QualityTarget,
        resume: Option<ResumePoint>,
    ) -> QualitySwitch {
        let wanted = match target {
            QualityTarget::Auto => self.default_url.clone(),
            QualityTarget::Source(url) => Url::new(url.clone()),
            QualityTarget::Level(_) => {
                log::warn!("Loader: adaptive levels are not available in native playback");
                return QualitySwitch::Unchanged;
            }
        };
        if self.current_url.is_none() || self.current_url.as_ref() == Some(&wanted) {
            return QualitySwitch::Unchanged;
        }
        log::info!("Loader: swapping native source to {}", wanted);
        self.swap_source(host, wanted);
        match resume {
            Some(point) => QualitySwitch::SourceSwapped(point),
            None => QualitySwitch::Seamless,
        }
    }

    fn set_audio_track(&mut self, host: &mut EngineHost, id: &AudioTrackId) -> bool {
        match id {
            AudioTrackId::Default => true,
            AudioTrackId::Native(native_id) => host.media.enable_audio_track(native_id),
            AudioTrackId::Engine(_) => false,
        }
    }

    fn recover(&mut self, _host: &mut EngineHost, action: RecoveryAction) {
        log::debug!("Loader: nothing to recover in native playback ({:?})", action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeAdaptive, FakeMedia};

    #[test]
    fn test_quality_swap_returns_resume_point() {
        let mut media = FakeMedia::default();
        let mut backend = FakeAdaptive::default();
        let url = Url::new("https://cdn.test/movie-1080.mp4".to_owned());
        let mut engine = NativeEngine::new(url.clone());
        let mut host = EngineHost {
            media: &mut media,
            backend: &mut backend,
        };
        let point = ResumePoint {
            position: 42.,
            was_playing: true,
        };
        let low = QualityTarget::Source("https://cdn.test/movie-480.mp4".to_owned());

        // Not loaded yet
        assert_eq!(engine.set_quality(&mut host, &low, Some(point)), QualitySwitch::Unchanged);

        engine.load(&mut host, &url).unwrap();
        assert_eq!(
            engine.set_quality(&mut host, &low, Some(point)),
            QualitySwitch::SourceSwapped(point)
        );
        assert_eq!(engine.set_quality(&mut host, &low, Some(point)), QualitySwitch::Unchanged);
        assert_eq!(
            engine.set_quality(&mut host, &QualityTarget::Auto, None),
            QualitySwitch::Seamless
        );
        assert_eq!(media.source().as_deref(), Some("https://cdn.test/movie-1080.mp4"));
    }

    #[test]
    fn test_destroy_clears_source_once() {
        let mut media = FakeMedia::default();
        let mut backend = FakeAdaptive::default();
        let url = Url::new("https://cdn.test/movie.mp4".to_owned());
        let mut engine = NativeEngine::new(url.clone());
        let mut host = EngineHost {
            media: &mut media,
            backend: &mut backend,
        };
        engine.load(&mut host, &url).unwrap();
        engine.destroy(&mut host);
        engine.destroy(&mut host);
        assert_eq!(media.source(), None);
        assert_eq!(media.clear_count(), 1);
    }
}
