use crate::{overlays::OverlayKind, wasm_bindgen};

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as well as
/// struct and enumeration used by those functions.
///
/// Rust code never calls them directly outside of `bindings::js_host`: the rest of the crate
/// goes through the traits defined in `host`, which `js_host` implements with these.

#[wasm_bindgen]
extern "C" {
    // Log the given text in the JavaScript console, with the log level given.
    pub fn jsLog(log_level: LogLevel, log: &str);

    // Starts a timer for the number of milliseconds indicated by the `duration` argument.
    //
    // Once this timer has elapsed, and unless `jsClearTimer` has been called since with
    // the `TimerId` returned by this function, the `on_timer_ended` method of the
    // `Dispatcher` will be called with both the corresponding `TimerId` and `kind`.
    pub fn jsTimer(duration: f64, kind: OverlayKind) -> TimerId;

    // Clear a timer started with `jsTimer`.
    pub fn jsClearTimer(id: TimerId);

    // Monotonic time in milliseconds (`performance.now()`).
    pub fn jsNow() -> f64;

    // Call the `HTMLMediaElement.prototype.play` API. A rejected promise is only logged.
    pub fn jsPlay();

    // Call the `HTMLMediaElement.prototype.pause` API.
    pub fn jsPause();

    // Set the `currentTime` of the media element, in seconds.
    pub fn jsSeek(position: f64);

    pub fn jsSetVolume(volume: f64);

    pub fn jsSetMuted(muted: bool);

    // Method called to change the playback rate (speed of playback).
    pub fn jsSetPlaybackRate(playback_rate: f64);

    // Assign the given URL to the `src` attribute of the media element and call `load()`.
    pub fn jsSetMediaSource(url: &str);

    // Remove the `src` attribute of the media element and call `load()` so it releases
    // every resource linked to the previous source.
    pub fn jsClearMediaSource();

    // Set the `mode` of the `index`th `TextTrack` of the media element.
    pub fn jsSetTextTrackMode(index: u32, mode: TextTrackMode);

    // Enable the native `AudioTrack` whose `id` is given and disable every other.
    //
    // Returns `false` if the browser doesn't expose `audioTracks` or no track has that `id`.
    pub fn jsEnableAudioTrack(id: &str) -> bool;

    pub fn jsRequestPictureInPicture();

    // Returns `true` if the adaptive streaming library can run in this browser (it
    // needs MediaSource Extensions).
    pub fn jsIsAdaptiveEngineSupported() -> bool;

    // Create a new adaptive streaming library instance, attach it to the media element and
    // begin loading the manifest at `url`.
    //
    // Manifest, track and error events of that instance are then reported through the
    // `on_manifest_parsed`, `on_audio_track_switched`, `on_audio_tracks_updated` and
    // `on_engine_error` methods of the `Dispatcher`, alongside the returned `EngineHandle`.
    pub fn jsCreateAdaptiveEngine(url: &str) -> CreateEngineResult;

    // Destroy the adaptive streaming library instance linked to `handle` and remove all the
    // event listeners registered on it.
    pub fn jsDestroyAdaptiveEngine(handle: EngineHandle);

    // Force the quality level at `level`. `-1` goes back to adaptive selection.
    pub fn jsEngineSetLevel(handle: EngineHandle, level: i32);

    pub fn jsEngineSetAudioTrack(handle: EngineHandle, track_id: u32);

    // Ask the adaptive library to reload segments, after a network failure.
    pub fn jsEngineStartLoad(handle: EngineHandle);

    // Ask the adaptive library to recover the media element, after a decoding failure.
    pub fn jsEngineRecoverMediaError(handle: EngineHandle);

    // Read a value from `localStorage`. Returns `None` if absent or if the storage is not
    // accessible.
    pub fn jsStorageGet(key: &str) -> Option<String>;

    // Write a value to `localStorage`. Returns `false` if the write threw (quota exceeded,
    // storage disabled...).
    pub fn jsStorageSet(key: &str, value: &str) -> bool;

    // Fire-and-forget emission of an analytics event. Failures are swallowed on the
    // JavaScript-side.
    pub fn jsSendAnalytics(name: &str, payload: &str);

    // Fetch the given `url` as text and await a response.
    //
    // If and when it finishes with success, the result will be emitted through the
    // `on_request_finished` method of the `Dispatcher`, and through `on_request_failed`
    // if it fails.
    //
    // If the request has been aborted while pending through the `jsAbortRequest`
    // function, none of those methods will be called.
    pub fn jsFetch(url: &str) -> RequestId;

    // Abort a request started with `jsFetch`` based on its `request_id`.
    //
    // Returns `true` if a pending request with the given RequestId was found and aborted,
    // `false` if no pending request was found with that RequestId.
    pub fn jsAbortRequest(request_id: RequestId) -> bool;

    // Give the JavaScript-side a JSON-serialized `UiSnapshot` to render.
    pub fn jsRenderUi(snapshot: &str);

    pub fn jsToggleFullscreen();

    // Register `mousemove` and `mouseup` listeners on the document, forwarding them to
    // `on_timeline_drag_move` and `on_timeline_drag_end`.
    pub fn jsAttachDragListeners();

    // Remove the listeners registered through `jsAttachDragListeners`.
    pub fn jsDetachDragListeners();

    // Call the `onClose` callback given to the player.
    pub fn jsClosePlayer();
}

/// Errors that can arise when attempting to create an adaptive streaming library
/// instance.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateEngineErrorCode {
    /// The adaptive library is not available in this environment.
    NotSupported,

    /// The instance could not be attached to the media element.
    AttachmentError,

    /// An unknown error arised
    UnknownError,
}

/// Result of calling the `jsCreateAdaptiveEngine` JavaScript function.
///
/// Creation of an `CreateEngineResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct CreateEngineResult {
    handle: EngineHandle,
    error: Option<(CreateEngineErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl CreateEngineResult {
    /// Creates an `CreateEngineResult` indicating success, with the corresponding
    /// `EngineHandle`.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success(handle: EngineHandle) -> Self {
        Self {
            handle,
            error: None,
        }
    }

    /// Creates an `CreateEngineResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: CreateEngineErrorCode, desc: Option<String>) -> Self {
        Self {
            handle: 0,
            error: Some((err, desc)),
        }
    }
}

impl JsResult<EngineHandle, CreateEngineErrorCode> for CreateEngineResult {
    /// Basically unwrap and consume the `CreateEngineResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<EngineHandle, (CreateEngineErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.handle)
        }
    }
}

/// Trait allowing to convert "JavaScript Results" as exposed by the JavaScript functions into
/// `Result` structs more idiomatic to Rust.
pub(crate) trait JsResult<T, E> {
    fn result(self) -> Result<T, (E, Option<String>)>;
}

/// Value of the `mode` attribute of a `TextTrack`.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextTrackMode {
    Disabled = 0,
    Hidden = 1,
    Showing = 2,
}

/// Levels with which a log can be emitted.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    /// Log level reserved for very important errors and highly unexpected events.
    Error = 0,

    /// Log level reserved for less important errors and unexpected events.
    Warn = 1,

    /// Log level reserved for important events
    Info = 2,

    /// Log level used when debugging. Small-ish yet impactful events should be logged with it.
    Debug = 3,
}

/// Identify a pending request.
pub type RequestId = u32;

/// Identify a pending timer.
pub type TimerId = f64;

/// Identify an adaptive streaming library instance living on the JavaScript-side.
pub type EngineHandle = u32;
