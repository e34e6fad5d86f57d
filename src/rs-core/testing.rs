//! In-memory implementations of the `host` traits, for unit tests.
//!
//! Every fake is cheaply clonable and shares its state with its clones, so a test can
//! keep a handle on what it moved into an `Environment`.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    analytics::AnalyticsEvent,
    bindings::{CreateEngineErrorCode, EngineHandle, RequestId, TextTrackMode, TimerId},
    dispatcher::{Dispatcher, UiSnapshot},
    host::{
        AdaptiveBackend, AnalyticsSink, Environment, KeyValueStore, MediaElement, PlayerSurface,
        ResourceFetcher, Timers,
    },
    media_source::LoadError,
    overlays::OverlayKind,
    preferences::PreferencesError,
    utils::url::Url,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PendingTimer {
    pub(crate) id: TimerId,
    pub(crate) kind: OverlayKind,
    pub(crate) delay: f64,
    pub(crate) fires_at: f64,
}

#[derive(Debug, Default)]
struct TimersState {
    now: f64,
    next_id: u32,
    pending: Vec<PendingTimer>,
}

/// Timers which only expire when told to.
#[derive(Clone, Debug, Default)]
pub(crate) struct ManualTimers {
    state: Rc<RefCell<TimersState>>,
}

impl ManualTimers {
    /// Move the clock forward by `ms`, returning the timers which expired in the meantime,
    /// in expiration order. Those are not pending anymore.
    pub(crate) fn advance(&self, ms: f64) -> Vec<PendingTimer> {
        let mut state = self.state.borrow_mut();
        state.now += ms;
        let now = state.now;
        let (mut expired, pending): (Vec<_>, Vec<_>) =
            state.pending.drain(..).partition(|t| t.fires_at <= now);
        state.pending = pending;
        expired.sort_by(|a, b| a.fires_at.total_cmp(&b.fires_at));
        expired
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        self.state.borrow().pending.clone()
    }

    pub(crate) fn remove(&self, id: TimerId) {
        self.state.borrow_mut().pending.retain(|t| t.id != id);
    }
}

impl Timers for ManualTimers {
    fn start(&mut self, delay_ms: f64, kind: OverlayKind) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = f64::from(state.next_id);
        let fires_at = state.now + delay_ms;
        state.pending.push(PendingTimer {
            id,
            kind,
            delay: delay_ms,
            fires_at,
        });
        id
    }

    fn clear(&mut self, id: TimerId) {
        self.remove(id);
    }

    fn now(&self) -> f64 {
        self.state.borrow().now
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryStore {
    data: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub(crate) fn insert(&self, key: &str, value: &str) {
        self.data
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferencesError> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
        self.insert(key, value);
        Ok(())
    }
}

/// Command received by the `FakeMedia`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MediaCommand {
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
    SetMuted(bool),
    SetPlaybackRate(f64),
    SetSource(String),
    ClearSource,
    SetTextTrackMode(usize, TextTrackMode),
    EnableAudioTrack(String),
    RequestPictureInPicture,
}

#[derive(Debug, Default)]
struct MediaState {
    commands: Vec<MediaCommand>,
    source: Option<String>,
    clear_count: usize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeMedia {
    state: Rc<RefCell<MediaState>>,
}

impl FakeMedia {
    pub(crate) fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    pub(crate) fn clear_count(&self) -> usize {
        self.state.borrow().clear_count
    }

    pub(crate) fn commands(&self) -> Vec<MediaCommand> {
        self.state.borrow().commands.clone()
    }

    /// Last position given to `seek`, if any.
    pub(crate) fn last_seek(&self) -> Option<f64> {
        self.state.borrow().commands.iter().rev().find_map(|c| match c {
            MediaCommand::Seek(pos) => Some(*pos),
            _ => None,
        })
    }

    pub(crate) fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    fn record(&self, command: MediaCommand) {
        self.state.borrow_mut().commands.push(command);
    }
}

impl MediaElement for FakeMedia {
    fn play(&mut self) {
        self.record(MediaCommand::Play);
    }

    fn pause(&mut self) {
        self.record(MediaCommand::Pause);
    }

    fn seek(&mut self, position: f64) {
        self.record(MediaCommand::Seek(position));
    }

    fn set_volume(&mut self, volume: f64) {
        self.record(MediaCommand::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.record(MediaCommand::SetMuted(muted));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.record(MediaCommand::SetPlaybackRate(rate));
    }

    fn set_source(&mut self, url: &Url) {
        self.state.borrow_mut().source = Some(url.get_ref().to_owned());
        self.record(MediaCommand::SetSource(url.get_ref().to_owned()));
    }

    fn clear_source(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            state.source = None;
            state.clear_count += 1;
        }
        self.record(MediaCommand::ClearSource);
    }

    fn set_text_track_mode(&mut self, index: usize, mode: TextTrackMode) {
        self.record(MediaCommand::SetTextTrackMode(index, mode));
    }

    fn enable_audio_track(&mut self, id: &str) -> bool {
        self.record(MediaCommand::EnableAudioTrack(id.to_owned()));
        true
    }

    fn request_picture_in_picture(&mut self) {
        self.record(MediaCommand::RequestPictureInPicture);
    }
}

/// Call received by the `FakeAdaptive` backend.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum BackendCall {
    Create(EngineHandle),
    Destroy(EngineHandle),
    SetLevel(EngineHandle, Option<usize>),
    SetAudioTrack(EngineHandle, u32),
    StartLoad(EngineHandle),
    RecoverMedia(EngineHandle),
}

#[derive(Debug)]
struct AdaptiveState {
    supported: bool,
    failing: bool,
    last_handle: EngineHandle,
    live: Vec<EngineHandle>,
    calls: Vec<BackendCall>,
}

#[derive(Clone, Debug)]
pub(crate) struct FakeAdaptive {
    state: Rc<RefCell<AdaptiveState>>,
}

impl Default for FakeAdaptive {
    fn default() -> Self {
        Self::with_flags(true, false)
    }
}

impl FakeAdaptive {
    fn with_flags(supported: bool, failing: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(AdaptiveState {
                supported,
                failing,
                last_handle: 0,
                live: vec![],
                calls: vec![],
            })),
        }
    }

    pub(crate) fn unsupported() -> Self {
        Self::with_flags(false, false)
    }

    /// Supported, but every instance creation fails.
    pub(crate) fn failing() -> Self {
        Self::with_flags(true, true)
    }

    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn live_handles(&self) -> Vec<EngineHandle> {
        self.state.borrow().live.clone()
    }

    fn record(&self, call: BackendCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl AdaptiveBackend for FakeAdaptive {
    fn is_supported(&self) -> bool {
        self.state.borrow().supported
    }

    fn create(&mut self, _url: &Url) -> Result<EngineHandle, LoadError> {
        let mut state = self.state.borrow_mut();
        if state.failing {
            return Err(LoadError::EngineCreation {
                code: CreateEngineErrorCode::AttachmentError,
                message: "attachment refused".to_owned(),
            });
        }
        state.last_handle += 1;
        let handle = state.last_handle;
        state.live.push(handle);
        state.calls.push(BackendCall::Create(handle));
        Ok(handle)
    }

    fn destroy(&mut self, handle: EngineHandle) {
        self.state.borrow_mut().live.retain(|h| *h != handle);
        self.record(BackendCall::Destroy(handle));
    }

    fn set_level(&mut self, handle: EngineHandle, level: Option<usize>) {
        self.record(BackendCall::SetLevel(handle, level));
    }

    fn set_audio_track(&mut self, handle: EngineHandle, track_id: u32) {
        self.record(BackendCall::SetAudioTrack(handle, track_id));
    }

    fn start_load(&mut self, handle: EngineHandle) {
        self.record(BackendCall::StartLoad(handle));
    }

    fn recover_media_error(&mut self, handle: EngineHandle) {
        self.record(BackendCall::RecoverMedia(handle));
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingAnalytics {
    events: Rc<RefCell<Vec<AnalyticsEvent>>>,
}

impl RecordingAnalytics {
    pub(crate) fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|e| e.name()).collect()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn emit(&mut self, event: &AnalyticsEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// What happened to the `FakeFetcher`, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FetchCall {
    Fetch(RequestId, String),
    Abort(RequestId),
}

#[derive(Debug, Default)]
struct FetcherState {
    last_id: RequestId,
    pending: Vec<RequestId>,
    calls: Vec<FetchCall>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeFetcher {
    state: Rc<RefCell<FetcherState>>,
}

impl FakeFetcher {
    pub(crate) fn calls(&self) -> Vec<FetchCall> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn pending(&self) -> Vec<RequestId> {
        self.state.borrow().pending.clone()
    }
}

impl ResourceFetcher for FakeFetcher {
    fn fetch(&mut self, url: &Url) -> RequestId {
        let mut state = self.state.borrow_mut();
        state.last_id += 1;
        let id = state.last_id;
        state.pending.push(id);
        state.calls.push(FetchCall::Fetch(id, url.get_ref().to_owned()));
        id
    }

    fn abort(&mut self, id: RequestId) -> bool {
        let mut state = self.state.borrow_mut();
        let was_pending = state.pending.contains(&id);
        state.pending.retain(|p| *p != id);
        state.calls.push(FetchCall::Abort(id));
        was_pending
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    renders: Vec<UiSnapshot>,
    fullscreen_toggles: usize,
    attached_drags: usize,
    detached_drags: usize,
    closed: usize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl FakeSurface {
    pub(crate) fn last_render(&self) -> Option<UiSnapshot> {
        self.state.borrow().renders.last().cloned()
    }

    pub(crate) fn render_count(&self) -> usize {
        self.state.borrow().renders.len()
    }

    pub(crate) fn fullscreen_toggles(&self) -> usize {
        self.state.borrow().fullscreen_toggles
    }

    /// Amount of drag listener attachments and detachments.
    pub(crate) fn drag_listeners(&self) -> (usize, usize) {
        let state = self.state.borrow();
        (state.attached_drags, state.detached_drags)
    }

    pub(crate) fn close_count(&self) -> usize {
        self.state.borrow().closed
    }
}

impl PlayerSurface for FakeSurface {
    fn render(&mut self, ui: &UiSnapshot) {
        self.state.borrow_mut().renders.push(ui.clone());
    }

    fn toggle_fullscreen(&mut self) {
        self.state.borrow_mut().fullscreen_toggles += 1;
    }

    fn attach_drag_listeners(&mut self) {
        self.state.borrow_mut().attached_drags += 1;
    }

    fn detach_drag_listeners(&mut self) {
        self.state.borrow_mut().detached_drags += 1;
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed += 1;
    }
}

/// Handles on every fake of a `Dispatcher` built by `Harness::new`.
#[derive(Clone, Default)]
pub(crate) struct Harness {
    pub(crate) media: FakeMedia,
    pub(crate) adaptive: FakeAdaptive,
    pub(crate) timers: ManualTimers,
    pub(crate) store: MemoryStore,
    pub(crate) analytics: RecordingAnalytics,
    pub(crate) fetcher: FakeFetcher,
    pub(crate) surface: FakeSurface,
}

impl Harness {
    pub(crate) fn environment(&self) -> Environment {
        Environment {
            media: Box::new(self.media.clone()),
            adaptive: Box::new(self.adaptive.clone()),
            timers: Box::new(self.timers.clone()),
            store: Box::new(self.store.clone()),
            analytics: Box::new(self.analytics.clone()),
            fetcher: Box::new(self.fetcher.clone()),
            surface: Box::new(self.surface.clone()),
        }
    }

    pub(crate) fn dispatcher(&self) -> Dispatcher {
        Dispatcher::with_environment(self.environment())
    }
}
