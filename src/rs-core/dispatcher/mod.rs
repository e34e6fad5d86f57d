use crate::{
    analytics::Heartbeat,
    bindings::RequestId,
    config::PlayerConfig,
    host::Environment,
    input::{TapGuard, TimelineDrag},
    media_source::{EngineHost, ErrorBanner, PlaybackEngine, RecoveryPolicy, ResumePoint},
    overlays::Overlays,
    parser::ThumbnailCues,
    playback::{PlaybackSession, PlayerState},
    preferences::PersistedPreferences,
    tracks::TrackCatalog,
    utils::url::Url,
    wasm_bindgen,
};

mod api;
mod core;
mod event_listeners;
mod ui;


pub use event_listeners::{MediaEvent, MediaObservation};
pub use ui::{HoverPreview, UiSnapshot};

/// The `Dispatcher` is the player Interface exported to the JavaScript-side, wrapping the
/// media element and adaptive streaming library of one player instance.
///
/// It is the only owner of the playback session: every command and every event coming
/// from the JavaScript-side goes through it, and a new `UiSnapshot` is rendered after each
/// of them.
#[wasm_bindgen]
pub struct Dispatcher {
    /// Every capability of the environment the player runs in.
    env: Environment,

    config: PlayerConfig,

    /// Current lifecycle state of the player.
    state: PlayerState,

    /// Data about the currently loaded content. `None` if no content is loaded.
    session: Option<PlaybackSession>,

    /// Preferences of the current content, as last read or written.
    preferences: PersistedPreferences,

    /// Audio, quality and subtitle choices available for the current content.
    catalog: TrackCatalog,

    /// Language of each text track of the media element, in the element's order.
    text_tracks: Vec<String>,

    /// What actually loads the current content. Only ever one at a time.
    engine: Option<Box<dyn PlaybackEngine>>,

    overlays: Overlays,

    recovery: RecoveryPolicy,

    banner: ErrorBanner,

    heartbeat: Heartbeat,

    tap_guard: TapGuard,

    drag: TimelineDrag,

    /// Information displayed while hovering the timeline.
    hover: Option<HoverPreview>,

    /// Thumbnail cues of the current content, if fetched and valid.
    thumbnails: Option<ThumbnailCues>,

    /// Pending request for the thumbnail cue file, with its URL.
    cue_request: Option<(RequestId, Url)>,

    /// Position and play state to restore once the next metadata is loaded, after a
    /// source swap.
    pending_resume: Option<ResumePoint>,

    /// `true` while the "up next" prompt is displayed.
    up_next_visible: bool,
}

impl Dispatcher {
    /// Create a `Dispatcher` relying on the given `Environment`.
    pub fn with_environment(env: Environment) -> Self {
        let config = PlayerConfig::default();
        let recovery =
            RecoveryPolicy::new(config.max_network_recoveries, config.max_media_recoveries);
        Self {
            env,
            config,
            state: PlayerState::Idle,
            session: None,
            preferences: PersistedPreferences::default(),
            catalog: TrackCatalog::from_metadata(&[], &[], &[]),
            text_tracks: Vec::new(),
            engine: None,
            overlays: Overlays::new(),
            recovery,
            banner: ErrorBanner::default(),
            heartbeat: Heartbeat::default(),
            tap_guard: TapGuard::default(),
            drag: TimelineDrag::Idle,
            hover: None,
            thumbnails: None,
            cue_request: None,
            pending_resume: None,
            up_next_visible: false,
        }
    }

    /// Send the current state of the UI to the surface.
    ///
    /// Nothing is rendered anymore once the player is destroyed.
    fn render(&mut self) {
        if self.state == PlayerState::Destroyed {
            return;
        }
        let snapshot = self.snapshot();
        self.env.surface.render(&snapshot);
    }
}

/// Run `f` on the current engine, if one, giving it access to the parts of the
/// environment it drives.
fn with_engine<R>(
    engine: &mut Option<Box<dyn PlaybackEngine>>,
    env: &mut Environment,
    f: impl FnOnce(&mut dyn PlaybackEngine, &mut EngineHost) -> R,
) -> Option<R> {
    let engine = engine.as_mut()?;
    let mut host = EngineHost {
        media: env.media.as_mut(),
        backend: env.adaptive.as_mut(),
    };
    Some(f(engine.as_mut(), &mut host))
}
