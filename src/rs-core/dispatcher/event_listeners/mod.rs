use crate::{
    bindings::{EngineHandle, RequestId, TimerId},
    dispatcher::Dispatcher,
    media_source::{StreamingError, StreamingErrorClass},
    overlays::OverlayKind,
    utils::time_ranges::TimeRanges,
    wasm_bindgen,
};

/// Methods triggered on JavaScript events by the JavaScript code.
///
/// Every one of them renders a new `UiSnapshot` once the event is handled.
#[wasm_bindgen]
impl Dispatcher {
    /// The JS code should call this method each time one of the listened
    /// HTMLMediaElement's events is triggered.
    ///
    /// # Arguments
    ///
    /// * `observation` - The event in question alongside the properties of the media
    ///   element at the time it was triggered.
    pub fn on_media_event(&mut self, observation: MediaObservation) {
        self.on_observation(observation);
        self.render();
    }

    /// The JS code should call this method when the HTMLMediaElement emits an `error`
    /// event, meaning that the current source could not be loaded.
    ///
    /// While the adaptive streaming library is attached, it reports the same failure
    /// through `on_engine_error`, which decides whether to recover.
    ///
    /// # Arguments
    ///
    /// * `message` - Description of the error, from the `MediaError`'s `message`.
    pub fn on_media_error(&mut self, message: String) {
        self.on_media_error_core(message);
        self.render();
    }

    /// The JS code should call this method each time a text track is added to or removed
    /// from the media element, whoever added it.
    ///
    /// # Arguments
    ///
    /// * `languages` - JSON array with the `language` of each of the element's
    ///   `textTracks`, in order (`null` or `""` when unknown).
    pub fn on_text_tracks_changed(&mut self, languages: &str) {
        self.on_text_tracks_changed_core(languages);
        self.render();
    }

    /// The JS code should call this method each time a timer started with the `jsTimer`
    /// function finished.
    ///
    /// # Arguments
    ///
    /// * `id` - The `TimerId` given by `jsTimer` when the timer was started. This allows
    ///   to ignore timers which were replaced in the meantime.
    ///
    /// * `kind` - The `OverlayKind` given by the Rust code when that timer was started.
    pub fn on_timer_ended(&mut self, id: TimerId, kind: OverlayKind) {
        let paused = self.state.is_paused();
        if self.overlays.on_expired(kind, id, paused) {
            self.render();
        }
    }

    /// The JS code should call this method once the adaptive streaming library parsed the
    /// manifest.
    ///
    /// # Arguments
    ///
    /// * `handle` - The `EngineHandle` of the instance which parsed it.
    ///
    /// * `manifest` - JSON with a `levels` array (`width`, `height`, `bitrate`) and an
    ///   `audioTracks` array (`id`, `name`, `lang`).
    pub fn on_manifest_parsed(&mut self, handle: EngineHandle, manifest: &str) {
        self.on_manifest_parsed_core(handle, manifest);
        self.render();
    }

    /// The JS code should call this method when the adaptive streaming library updated
    /// its list of audio tracks.
    ///
    /// # Arguments
    ///
    /// * `handle` - The `EngineHandle` of the corresponding instance.
    ///
    /// * `tracks` - JSON array of audio tracks (`id`, `name`, `lang`).
    pub fn on_audio_tracks_updated(&mut self, handle: EngineHandle, tracks: &str) {
        self.on_audio_tracks_updated_core(handle, tracks);
        self.render();
    }

    /// The JS code should call this method when the adaptive streaming library switched
    /// audio track, whether or not it was asked to.
    pub fn on_audio_track_switched(&mut self, handle: EngineHandle, track_id: u32) {
        self.on_audio_track_switched_core(handle, track_id);
        self.render();
    }

    /// The JS code should call this method when the adaptive streaming library reports an
    /// error.
    ///
    /// # Arguments
    ///
    /// * `handle` - The `EngineHandle` of the instance reporting it.
    ///
    /// * `class` - Category of the error.
    ///
    /// * `fatal` - If `false`, the library announced it will try to recover by itself.
    ///
    /// * `details` - The library's description of the error.
    pub fn on_engine_error(
        &mut self,
        handle: EngineHandle,
        class: StreamingErrorClass,
        fatal: bool,
        details: String,
    ) {
        let error = StreamingError {
            class,
            fatal,
            details,
        };
        self.on_engine_error_core(handle, error);
        self.render();
    }

    /// The JS code should call this method each time a request started with `jsFetch`
    /// finished with success.
    ///
    /// # Arguments
    ///
    /// * `request_id` - The identifier given by `jsFetch` when the request was started.
    ///
    /// * `data` - The body of the response, as text.
    pub fn on_request_finished(&mut self, request_id: RequestId, data: &str) {
        self.on_request_finished_core(request_id, data);
        self.render();
    }

    /// The JS code should call this method each time a request started with `jsFetch`
    /// failed. Aborted requests should not be reported.
    pub fn on_request_failed(&mut self, request_id: RequestId) {
        self.on_request_failed_core(request_id);
        self.render();
    }

    /// The JS code should call this method on each `keydown` event of the document.
    ///
    /// # Arguments
    ///
    /// * `key` - The `KeyboardEvent`'s `key` property.
    ///
    /// * `in_editable` - `true` if the focus is currently in an `input`, a `textarea` or a
    ///   `contenteditable` element.
    ///
    /// Returns `true` if the key was handled, in which case its default behavior should
    /// be prevented.
    pub fn on_key_down(&mut self, key: &str, in_editable: bool) -> bool {
        let handled = self.on_key_down_core(key, in_editable);
        if handled {
            self.render();
        }
        handled
    }

    /// The JS code should call this method on each `click` on the video surface.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Coordinates of the pointer, relative to the player.
    ///
    /// * `inside_control` - `true` if the click targets an interactive control (button,
    ///   range input, menu, tooltip...), in which case it is ignored.
    pub fn on_surface_click(&mut self, x: f64, y: f64, inside_control: bool) {
        if inside_control {
            return;
        }
        self.on_surface_click_core(x, y);
        self.render();
    }

    /// The JS code should call this method on each `dblclick` on the video surface.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Coordinates of the pointer, relative to the player.
    ///
    /// * `width` - Width of the player.
    pub fn on_surface_double_click(&mut self, x: f64, y: f64, width: f64) {
        self.on_surface_double_click_core(x, y, width);
        self.render();
    }

    /// The JS code should call this method on each `mousemove` over the player.
    pub fn on_pointer_move(&mut self) {
        let paused = self.state.is_paused();
        self.overlays
            .on_pointer_motion(self.env.timers.as_mut(), &self.config, paused);
        self.render();
    }

    /// The JS code should call this method on `mousedown` on the timeline.
    ///
    /// `jsAttachDragListeners` is then called, after which document-level `mousemove`
    /// and `mouseup` events should be reported through `on_timeline_drag_move` and
    /// `on_timeline_drag_end` until `jsDetachDragListeners` is called.
    ///
    /// # Arguments
    ///
    /// * `x` - Horizontal coordinate of the pointer, relative to the timeline.
    ///
    /// * `width` - Width of the timeline.
    pub fn on_timeline_pointer_down(&mut self, x: f64, width: f64) {
        self.on_timeline_pointer_down_core(x, width);
        self.render();
    }

    pub fn on_timeline_drag_move(&mut self, x: f64, width: f64) {
        self.on_timeline_drag_move_core(x, width);
        self.render();
    }

    pub fn on_timeline_drag_end(&mut self, x: f64, width: f64) {
        self.on_timeline_drag_end_core(x, width);
        self.render();
    }

    /// The JS code should call this method on each `mousemove` over the timeline.
    pub fn on_timeline_hover(&mut self, x: f64, width: f64) {
        self.on_timeline_hover_core(x, width);
        self.render();
    }

    /// The JS code should call this method when the pointer leaves the timeline.
    pub fn on_timeline_leave(&mut self) {
        if self.hover.take().is_some() {
            self.render();
        }
    }
}

/// Identify the HTMLMediaElement event that lead to the `MediaObservation` being sent.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    /// The HTMLMediaElement's "loadedmetadata" event has just been triggered
    LoadedMetadata,
    /// The HTMLMediaElement's "durationchange" event has just been triggered
    DurationChange,
    /// The HTMLMediaElement's "timeupdate" event has just been triggered
    TimeUpdate,
    /// The HTMLMediaElement's "progress" event has just been triggered
    Progress,
    /// The HTMLMediaElement's "canplay" event has just been triggered
    CanPlay,
    /// The HTMLMediaElement's "play" event has just been triggered
    Play,
    /// The HTMLMediaElement's "pause" event has just been triggered
    Pause,
    /// The HTMLMediaElement's "playing" event has just been triggered
    Playing,
    /// The HTMLMediaElement's "waiting" event has just been triggered
    Waiting,
    /// The HTMLMediaElement's "seeking" event has just been triggered
    Seeking,
    /// The HTMLMediaElement's "seeked" event has just been triggered
    Seeked,
    /// The HTMLMediaElement's "ended" event has just been triggered
    Ended,
    /// The HTMLMediaElement's "volumechange" event has just been triggered
    VolumeChange,
    /// The HTMLMediaElement's "ratechange" event has just been triggered
    RateChange,
}

/// A media element event alongside the element's properties when it was triggered.
#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct MediaObservation {
    event: MediaEvent,
    current_time: f64,
    duration: f64,
    buffered: TimeRanges,
    volume: f64,
    muted: bool,
    playback_rate: f64,
}

#[wasm_bindgen]
impl MediaObservation {
    /// # Arguments
    ///
    /// * `buffered` - Flattened `TimeRanges`: start and end of the first range, then of
    ///   the second one, and so on.
    #[wasm_bindgen(constructor)]
    pub fn new(
        event: MediaEvent,
        current_time: f64,
        duration: f64,
        buffered: &[f64],
        volume: f64,
        muted: bool,
        playback_rate: f64,
    ) -> Self {
        Self {
            event,
            current_time,
            duration,
            buffered: TimeRanges::from_flat(buffered),
            volume,
            muted,
            playback_rate,
        }
    }
}

impl MediaObservation {
    #[inline(always)]
    pub fn event(&self) -> MediaEvent {
        self.event
    }

    #[inline(always)]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[inline(always)]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline(always)]
    pub(crate) fn buffered(&self) -> &TimeRanges {
        &self.buffered
    }

    #[inline(always)]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    #[inline(always)]
    pub fn muted(&self) -> bool {
        self.muted
    }

    #[inline(always)]
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }
}
