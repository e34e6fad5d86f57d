//! Capabilities the player core needs from its environment.
//!
//! In the browser, every one of them is backed by a JavaScript function (see
//! `bindings::js_host`). Keeping them behind traits lets the whole core run against
//! in-memory fakes.

use crate::{
    analytics::AnalyticsEvent,
    bindings::{EngineHandle, RequestId, TextTrackMode, TimerId},
    dispatcher::UiSnapshot,
    media_source::LoadError,
    overlays::OverlayKind,
    preferences::PreferencesError,
    utils::url::Url,
};

/// Commands that can be sent to the HTMLMediaElement.
///
/// Facts about the element (position, duration, paused...) are never read synchronously:
/// they come back through `MediaObservation`s.
pub trait MediaElement {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
    fn set_playback_rate(&mut self, rate: f64);
    fn set_source(&mut self, url: &Url);
    fn clear_source(&mut self);
    fn set_text_track_mode(&mut self, index: usize, mode: TextTrackMode);
    /// Returns `false` if native audio tracks are not available.
    fn enable_audio_track(&mut self, id: &str) -> bool;
    fn request_picture_in_picture(&mut self);
}

/// Raw operations on the third-party adaptive streaming library.
pub trait AdaptiveBackend {
    fn is_supported(&self) -> bool;

    /// Create an instance, attach it to the media element and start loading `url`.
    fn create(&mut self, url: &Url) -> Result<EngineHandle, LoadError>;

    fn destroy(&mut self, handle: EngineHandle);

    /// `None` re-enables automatic (ABR) level selection.
    fn set_level(&mut self, handle: EngineHandle, level: Option<usize>);

    fn set_audio_track(&mut self, handle: EngineHandle, track_id: u32);

    fn start_load(&mut self, handle: EngineHandle);

    fn recover_media_error(&mut self, handle: EngineHandle);
}

/// Single-shot timers and a monotonic clock, in milliseconds.
pub trait Timers {
    fn start(&mut self, delay_ms: f64, kind: OverlayKind) -> TimerId;
    fn clear(&mut self, id: TimerId);
    fn now(&self) -> f64;
}

/// Process-wide key-value storage living outside of the player's memory.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferencesError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError>;
}

/// Fire-and-forget analytics emission.
pub trait AnalyticsSink {
    fn emit(&mut self, event: &AnalyticsEvent);
}

/// Cancellable text resource fetching. Results come back through the `Dispatcher`'s
/// `on_request_finished` and `on_request_failed` methods.
pub trait ResourceFetcher {
    fn fetch(&mut self, url: &Url) -> RequestId;
    fn abort(&mut self, id: RequestId) -> bool;
}

/// The DOM around the media element: rendered UI, fullscreen, document listeners.
pub trait PlayerSurface {
    fn render(&mut self, ui: &UiSnapshot);
    fn toggle_fullscreen(&mut self);
    fn attach_drag_listeners(&mut self);
    fn detach_drag_listeners(&mut self);
    /// Hand control back to whoever opened the player.
    fn close(&mut self);
}

/// Every capability the `Dispatcher` relies on, exclusively owned by it.
pub struct Environment {
    pub media: Box<dyn MediaElement>,
    pub adaptive: Box<dyn AdaptiveBackend>,
    pub timers: Box<dyn Timers>,
    pub store: Box<dyn KeyValueStore>,
    pub analytics: Box<dyn AnalyticsSink>,
    pub fetcher: Box<dyn ResourceFetcher>,
    pub surface: Box<dyn PlayerSurface>,
}
