use super::{
    EngineHost, EngineKind, LoadError, PlaybackEngine, QualitySwitch, RecoveryAction, ResumePoint,
};
use crate::{
    bindings::EngineHandle,
    tracks::{AudioTrackId, QualityTarget},
    utils::url::Url,
};

/// `PlaybackEngine` relying on the adaptive streaming library.
///
/// Owns at most one library instance at a time: loading a new URL destroys the previous
/// instance before creating the next one.
#[derive(Debug, Default)]
pub(crate) struct AdaptiveEngine {
    handle: Option<EngineHandle>,
}

impl AdaptiveEngine {
    pub(crate) fn new() -> Self {
        Self { handle: None }
    }
}

impl PlaybackEngine for AdaptiveEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Adaptive
    }

    fn handle(&self) -> Option<EngineHandle> {
        self.handle
    }

    fn load(&mut self, host: &mut EngineHost, url: &Url) -> Result<(), LoadError> {
        self.destroy(host);
        let handle = host.backend.create(url)?;
        log::debug!("Loader: adaptive engine {} attached", handle);
        self.handle = Some(handle);
        Ok(())
    }

    fn destroy(&mut self, host: &mut EngineHost) {
        if let Some(handle) = self.handle.take() {
            log::debug!("Loader: destroying adaptive engine {}", handle);
            host.backend.destroy(handle);
            host.media.clear_source();
        }
    }

    fn set_quality(
        &mut self,
        host: &mut EngineHost,
        target: &QualityTarget,
        _resume: Option<ResumePoint>,
    ) -> QualitySwitch {
        let Some(handle) = self.handle else {
            return QualitySwitch::Unchanged;
        };
        match target {
            QualityTarget::Auto => host.backend.set_level(handle, None),
            QualityTarget::Level(idx) => host.backend.set_level(handle, Some(*idx)),
            QualityTarget::Source(_) => {
                log::warn!("Loader: cannot switch an adaptive stream to another source");
                return QualitySwitch::Unchanged;
            }
        }
        QualitySwitch::Seamless
    }

    fn set_audio_track(&mut self, host: &mut EngineHost, id: &AudioTrackId) -> bool {
        match (self.handle, id) {
            (_, AudioTrackId::Default) => true,
            (Some(handle), AudioTrackId::Engine(track_id)) => {
                host.backend.set_audio_track(handle, *track_id);
                true
            }
            // Tracks from the content metadata, used when the manifest advertises at most
            // one audio track.
            (_, AudioTrackId::Native(native_id)) => host.media.enable_audio_track(native_id),
            (None, AudioTrackId::Engine(_)) => false,
        }
    }

    fn recover(&mut self, host: &mut EngineHost, action: RecoveryAction) {
        let Some(handle) = self.handle else {
            return;
        };
        match action {
            RecoveryAction::ReloadSegments => {
                log::info!("Loader: reloading segments after a network error");
                host.backend.start_load(handle);
            }
            RecoveryAction::RecoverMedia => {
                log::info!("Loader: recovering from a media error");
                host.backend.recover_media_error(handle);
            }
            RecoveryAction::Destroy => self.destroy(host),
        }
    }
}
