use super::js_functions::*;
use crate::{
    analytics::AnalyticsEvent,
    dispatcher::UiSnapshot,
    host::{
        AdaptiveBackend, AnalyticsSink, Environment, KeyValueStore, MediaElement, PlayerSurface,
        ResourceFetcher, Timers,
    },
    media_source::LoadError,
    overlays::OverlayKind,
    preferences::PreferencesError,
    utils::url::Url,
};

/// Implementation of every `host` trait through the functions of `js_functions`.
///
/// Those implementations are voluntarly kept as thin as possible: they should only convert
/// types, never hold state.
pub(crate) struct JsHost;

impl Environment {
    /// Build the `Environment` talking to the JavaScript-side.
    pub fn js() -> Self {
        Self {
            media: Box::new(JsHost),
            adaptive: Box::new(JsHost),
            timers: Box::new(JsHost),
            store: Box::new(JsHost),
            analytics: Box::new(JsHost),
            fetcher: Box::new(JsHost),
            surface: Box::new(JsHost),
        }
    }
}

impl MediaElement for JsHost {
    fn play(&mut self) {
        jsPlay();
    }

    fn pause(&mut self) {
        jsPause();
    }

    fn seek(&mut self, position: f64) {
        jsSeek(position);
    }

    fn set_volume(&mut self, volume: f64) {
        jsSetVolume(volume);
    }

    fn set_muted(&mut self, muted: bool) {
        jsSetMuted(muted);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        jsSetPlaybackRate(rate);
    }

    fn set_source(&mut self, url: &Url) {
        jsSetMediaSource(url.get_ref());
    }

    fn clear_source(&mut self) {
        jsClearMediaSource();
    }

    fn set_text_track_mode(&mut self, index: usize, mode: TextTrackMode) {
        jsSetTextTrackMode(index as u32, mode);
    }

    fn enable_audio_track(&mut self, id: &str) -> bool {
        jsEnableAudioTrack(id)
    }

    fn request_picture_in_picture(&mut self) {
        jsRequestPictureInPicture();
    }
}

impl AdaptiveBackend for JsHost {
    fn is_supported(&self) -> bool {
        jsIsAdaptiveEngineSupported()
    }

    fn create(&mut self, url: &Url) -> Result<EngineHandle, LoadError> {
        jsCreateAdaptiveEngine(url.get_ref())
            .result()
            .map_err(|(code, desc)| LoadError::EngineCreation {
                code,
                message: desc.unwrap_or_else(|| "no details".to_owned()),
            })
    }

    fn destroy(&mut self, handle: EngineHandle) {
        jsDestroyAdaptiveEngine(handle);
    }

    fn set_level(&mut self, handle: EngineHandle, level: Option<usize>) {
        jsEngineSetLevel(handle, level.map(|l| l as i32).unwrap_or(-1));
    }

    fn set_audio_track(&mut self, handle: EngineHandle, track_id: u32) {
        jsEngineSetAudioTrack(handle, track_id);
    }

    fn start_load(&mut self, handle: EngineHandle) {
        jsEngineStartLoad(handle);
    }

    fn recover_media_error(&mut self, handle: EngineHandle) {
        jsEngineRecoverMediaError(handle);
    }
}

impl Timers for JsHost {
    fn start(&mut self, delay_ms: f64, kind: OverlayKind) -> TimerId {
        jsTimer(delay_ms, kind)
    }

    fn clear(&mut self, id: TimerId) {
        jsClearTimer(id);
    }

    fn now(&self) -> f64 {
        jsNow()
    }
}

impl KeyValueStore for JsHost {
    fn get(&self, key: &str) -> Result<Option<String>, PreferencesError> {
        Ok(jsStorageGet(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
        if jsStorageSet(key, value) {
            Ok(())
        } else {
            Err(PreferencesError::Storage(format!(
                "could not write \"{key}\""
            )))
        }
    }
}

impl AnalyticsSink for JsHost {
    fn emit(&mut self, event: &AnalyticsEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => jsSendAnalytics(event.name(), &payload),
            Err(e) => log::debug!("Analytics: could not serialize {}: {}", event.name(), e),
        }
    }
}

impl ResourceFetcher for JsHost {
    fn fetch(&mut self, url: &Url) -> RequestId {
        jsFetch(url.get_ref())
    }

    fn abort(&mut self, id: RequestId) -> bool {
        jsAbortRequest(id)
    }
}

impl PlayerSurface for JsHost {
    fn render(&mut self, ui: &UiSnapshot) {
        match serde_json::to_string(ui) {
            Ok(snapshot) => jsRenderUi(&snapshot),
            Err(e) => log::error!("Surface: could not serialize UI snapshot: {}", e),
        }
    }

    fn toggle_fullscreen(&mut self) {
        jsToggleFullscreen();
    }

    fn attach_drag_listeners(&mut self) {
        jsAttachDragListeners();
    }

    fn detach_drag_listeners(&mut self) {
        jsDetachDragListeners();
    }

    fn close(&mut self) {
        jsClosePlayer();
    }
}
