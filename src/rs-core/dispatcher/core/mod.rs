use super::{with_engine, Dispatcher, HoverPreview, MediaEvent, MediaObservation};
use crate::{
    analytics::AnalyticsEvent,
    bindings::{EngineHandle, RequestId},
    content::ContentDescriptor,
    input::{self, format_time, KeyCommand, TimelineDrag},
    media_source::{
        self, EngineHost, EngineKind, LoadError, PlayerError, PlayerErrorKind, QualitySwitch,
        RecoveryAction, ResumePoint, StreamingError,
    },
    overlays::{Glyph, MenuKind},
    parser::ThumbnailCues,
    playback::{PlaybackSession, PlayerState, Transition},
    preferences,
    tracks::{self, AudioTrackId, EngineAudioTrack, ManifestInfo, TrackCatalog},
    utils::url::Url,
};

const LOAD_ERROR_MESSAGE: &str = "This video could not be loaded.";
const STREAMING_ERROR_MESSAGE: &str = "Playback failed. Try reloading the video.";
const NETWORK_NOTICE: &str = "Network issue, trying to recover...";
const MEDIA_NOTICE: &str = "Playback issue, trying to recover...";
const SUBTITLES_OFF_LABEL: &str = "Subtitles off";

impl Dispatcher {
    /// Load the content described by the JSON `descriptor`, replacing the current one.
    ///
    /// Loading the content already loaded does nothing, unless it failed.
    pub(super) fn load_content_core(&mut self, descriptor: &str) {
        if self.state == PlayerState::Destroyed {
            log::warn!("Core: cannot load a content on a destroyed player");
            return;
        }
        let content = match ContentDescriptor::from_json(descriptor) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Core: {}", e);
                self.banner.raise(PlayerError {
                    kind: PlayerErrorKind::Load,
                    message: LOAD_ERROR_MESSAGE.to_owned(),
                    can_reload: false,
                });
                return;
            }
        };
        if let Some(session) = &self.session {
            let failed = matches!(self.state, PlayerState::Error { fatal: true });
            if session.content_id() == content.id && !failed {
                log::debug!("Core: content {} already loaded", content.id);
                return;
            }
        }
        self.teardown_session();
        self.banner.dismiss();
        self.start_session(content);
    }

    /// Re-initialize the current content from scratch, e.g. after a fatal error.
    pub(super) fn reload_core(&mut self) {
        if self.state == PlayerState::Destroyed {
            return;
        }
        let Some(content) = self.session.as_ref().map(|s| s.content.clone()) else {
            return;
        };
        log::info!("Core: reloading content {}", content.id);
        self.teardown_session();
        self.banner.dismiss();
        self.start_session(content);
    }

    /// Tear everything down. The `Dispatcher` cannot be used anymore afterwards.
    pub(super) fn unmount_core(&mut self) {
        if self.state == PlayerState::Destroyed {
            return;
        }
        log::info!("Core: unmounting player");
        self.teardown_session();
        self.banner.dismiss();
        self.apply_transition(Transition::Destroyed);
    }

    fn start_session(&mut self, content: ContentDescriptor) {
        log::info!("Core: loading content {}", content.id);
        let url = content.media_url();
        let engine = media_source::create_engine(&url, self.env.adaptive.as_ref());
        let is_adaptive = engine.kind() == EngineKind::Adaptive;

        // Qualities of an adaptive stream only come from its manifest
        let static_qualities = if is_adaptive {
            &[][..]
        } else {
            &content.quality_options[..]
        };
        self.catalog = TrackCatalog::from_metadata(
            static_qualities,
            &content.audio_tracks,
            &content.subtitle_tracks,
        );
        // Until told otherwise, the element only holds the tracks of the descriptor
        self.text_tracks = self
            .catalog
            .subtitle_options
            .iter()
            .map(|t| t.language_code.clone())
            .collect();
        self.preferences = preferences::load(self.env.store.as_ref(), &content.id);

        let mut session = PlaybackSession::new(content, is_adaptive);
        if let Some(volume) = self.preferences.volume {
            session.apply_volume(volume);
        }
        if let Some(rate) = self.preferences.playback_rate {
            session.playback_rate = rate;
        }
        if let Some(Some(lang)) = &self.preferences.active_subtitle_language {
            if self.catalog.subtitle_label(lang).is_some() {
                session.active_subtitle = Some(lang.clone());
            }
        }
        self.env.media.set_volume(session.volume);
        self.env.media.set_muted(session.muted);
        self.env.media.set_playback_rate(session.playback_rate);

        self.env.analytics.emit(&AnalyticsEvent::SessionStart {
            content_id: session.content.id.clone(),
            title: session.content.title.clone(),
            adaptive: session.is_adaptive,
        });
        if let Some(cue_url) = &session.content.thumbnail_cue_url {
            let cue_url = Url::from_relative(&session.source_url, Url::new(cue_url.clone()));
            log::debug!("Core: fetching thumbnail cues {}", cue_url);
            let id = self.env.fetcher.fetch(&cue_url);
            self.cue_request = Some((id, cue_url));
        }
        self.session = Some(session);
        self.apply_transition(Transition::LoadStarted);
        self.overlays
            .show_controls(self.env.timers.as_mut(), &self.config);

        self.engine = Some(engine);
        if let Some(Err(e)) = with_engine(&mut self.engine, &mut self.env, |e, host| e.load(host, &url)) {
            self.on_load_failure(e);
        }
    }

    /// Cancel everything linked to the current session, in order: timers, then requests,
    /// then the engine.
    fn teardown_session(&mut self) {
        self.overlays.reset(self.env.timers.as_mut());
        if let Some((id, _)) = self.cue_request.take() {
            self.env.fetcher.abort(id);
        }
        self.destroy_engine();
        if let TimelineDrag::Dragging { .. } = self.drag {
            self.env.surface.detach_drag_listeners();
        }
        self.drag = TimelineDrag::Idle;
        if let Some(session) = self.session.take() {
            self.env.analytics.emit(&AnalyticsEvent::SessionEnd {
                content_id: session.content.id,
                position: session.current_time,
            });
        }
        self.catalog = TrackCatalog::from_metadata(&[], &[], &[]);
        self.text_tracks.clear();
        self.thumbnails = None;
        self.hover = None;
        self.pending_resume = None;
        self.up_next_visible = false;
        self.heartbeat.reset();
        self.tap_guard.reset();
        self.recovery.on_playing();
    }

    fn destroy_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            let mut host = EngineHost {
                media: self.env.media.as_mut(),
                backend: self.env.adaptive.as_mut(),
            };
            engine.destroy(&mut host);
        }
    }

    /// Apply `transition` to the current `PlayerState`. Returns `false` if it was ignored.
    fn apply_transition(&mut self, transition: Transition) -> bool {
        match self.state.next(transition) {
            Some(next) => {
                if next != self.state {
                    log::debug!("Core: state {:?} -> {:?}", self.state, next);
                }
                self.state = next;
                true
            }
            None => {
                log::debug!("Core: ignoring {:?} while {:?}", transition, self.state);
                false
            }
        }
    }

    fn on_load_failure(&mut self, error: LoadError) {
        log::error!("Core: {}", error);
        self.destroy_engine();
        self.pending_resume = None;
        self.apply_transition(Transition::FatalError);
        self.banner.raise(PlayerError {
            kind: PlayerErrorKind::Load,
            message: LOAD_ERROR_MESSAGE.to_owned(),
            can_reload: true,
        });
    }

    pub(super) fn on_media_error_core(&mut self, message: String) {
        if self.session.is_none() || self.state == PlayerState::Destroyed {
            return;
        }
        let adaptive_attached = self
            .engine
            .as_ref()
            .map_or(false, |e| e.kind() == EngineKind::Adaptive && e.handle().is_some());
        if adaptive_attached {
            // The adaptive library reports its own classified error for the same failure
            log::warn!("Core: media element error under the adaptive engine: {}", message);
            return;
        }
        self.on_load_failure(LoadError::MediaElement(message));
    }

    pub(super) fn on_observation(&mut self, observation: MediaObservation) {
        if self.state == PlayerState::Destroyed {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            log::debug!("Core: ignoring media event without content");
            return;
        };
        let event = observation.event();
        match event {
            MediaEvent::LoadedMetadata | MediaEvent::DurationChange => {
                session.update_duration(observation.duration());
                session.update_position(observation.current_time());
            }
            MediaEvent::Progress => session.update_buffered(observation.buffered()),
            MediaEvent::Seeking => session.seeking = true,
            MediaEvent::Seeked => {
                session.seeking = false;
                session.update_position(observation.current_time());
            }
            MediaEvent::VolumeChange => {
                session.volume = observation.volume().clamp(0., 1.);
                session.muted = observation.muted();
            }
            MediaEvent::RateChange => {
                if observation.playback_rate() > 0. {
                    session.playback_rate = observation.playback_rate();
                }
            }
            MediaEvent::TimeUpdate | MediaEvent::Pause | MediaEvent::Ended => {
                session.update_position(observation.current_time());
            }
            MediaEvent::CanPlay | MediaEvent::Play | MediaEvent::Playing | MediaEvent::Waiting => {}
        }

        let now = self.env.timers.now();
        match event {
            MediaEvent::LoadedMetadata => self.on_metadata_loaded(),
            MediaEvent::TimeUpdate => self.check_heartbeat(now),
            MediaEvent::CanPlay => {
                if self.state == (PlayerState::Error { fatal: false }) {
                    self.apply_transition(Transition::Recovered);
                }
            }
            MediaEvent::Play => {
                let was_playing = self.state.is_playing();
                if self.apply_transition(Transition::Playing) && !was_playing {
                    self.on_playback_started();
                }
            }
            MediaEvent::Playing => self.on_playing(now),
            MediaEvent::Waiting => self.on_waiting(now),
            MediaEvent::Pause => self.on_paused(),
            MediaEvent::Seeked => {
                if self.state.has_ended() {
                    self.apply_transition(Transition::Seeked);
                }
            }
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::DurationChange
            | MediaEvent::Progress
            | MediaEvent::Seeking
            | MediaEvent::VolumeChange
            | MediaEvent::RateChange => {}
        }
    }

    fn on_metadata_loaded(&mut self) {
        self.apply_transition(Transition::MetadataLoaded);
        self.apply_subtitle_modes();
        // Loading a source resets the element's rate
        let rate = self.session.as_ref().map_or(1., |s| s.playback_rate);
        if rate != 1. {
            self.env.media.set_playback_rate(rate);
        }
        if let Some(resume) = self.pending_resume.take() {
            log::info!("Core: restoring position {} after source swap", resume.position);
            self.seek_media(resume.position);
            if resume.was_playing {
                self.env.media.play();
            }
        }
    }

    fn check_heartbeat(&mut self, now: f64) {
        if !self.state.is_playing() || !self.heartbeat.tick(now, self.config.heartbeat_interval) {
            return;
        }
        if let Some(session) = &self.session {
            self.env.analytics.emit(&AnalyticsEvent::Heartbeat {
                position: session.current_time,
                duration: session.duration,
            });
        }
    }

    fn on_playing(&mut self, now: f64) {
        let was_playing = self.state.is_playing();
        let stalled_since = self.state.stalled_since();
        if !self.apply_transition(Transition::Playing) {
            return;
        }
        self.recovery.on_playing();
        if let Some(since) = stalled_since {
            let position = self.position();
            self.env.analytics.emit(&AnalyticsEvent::VideoBufferingEnd {
                position,
                stalled_for: (now - since).max(0.),
            });
        }
        if !was_playing {
            self.on_playback_started();
        }
    }

    fn on_playback_started(&mut self) {
        let timers = self.env.timers.as_mut();
        self.overlays.on_resumed(timers);
        self.overlays.show_controls(timers, &self.config);
        self.up_next_visible = false;
        let position = self.position();
        self.env
            .analytics
            .emit(&AnalyticsEvent::VideoPlay { position });
    }

    fn on_waiting(&mut self, now: f64) {
        if !self.state.is_playing() || self.state.stalled_since().is_some() {
            return;
        }
        if self.apply_transition(Transition::Stalled { at: now }) {
            let position = self.position();
            self.env
                .analytics
                .emit(&AnalyticsEvent::VideoBufferingStart { position });
        }
    }

    fn on_paused(&mut self) {
        if !self.apply_transition(Transition::Paused) {
            return;
        }
        let timers = self.env.timers.as_mut();
        self.overlays.on_paused(timers, &self.config);
        self.overlays.show_controls(timers, &self.config);
        let position = self.position();
        self.env
            .analytics
            .emit(&AnalyticsEvent::VideoPause { position });
    }

    fn on_ended(&mut self) {
        if !self.apply_transition(Transition::Ended) {
            return;
        }
        let timers = self.env.timers.as_mut();
        // The resume overlay takes the place of the paused info
        self.overlays.on_resumed(timers);
        self.overlays.show_controls(timers, &self.config);
        let is_episode = self
            .session
            .as_ref()
            .map_or(false, |s| s.content.series_info.is_some());
        self.up_next_visible = self.config.autoplay_next && is_episode;
    }

    fn position(&self) -> f64 {
        self.session.as_ref().map_or(0., |s| s.current_time)
    }

    fn is_current_engine(&self, handle: EngineHandle) -> bool {
        let current = self.engine.as_ref().and_then(|e| e.handle());
        if current != Some(handle) {
            log::debug!("Core: ignoring event of stale engine {}", handle);
            return false;
        }
        true
    }

    pub(super) fn on_manifest_parsed_core(&mut self, handle: EngineHandle, manifest: &str) {
        if !self.is_current_engine(handle) {
            return;
        }
        let manifest: ManifestInfo = match serde_json::from_str(manifest) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::warn!("Core: unreadable manifest information: {}", e);
                return;
            }
        };
        let Some(session) = &self.session else {
            return;
        };
        log::info!(
            "Core: manifest parsed ({} levels, {} audio tracks)",
            manifest.levels.len(),
            manifest.audio_tracks.len()
        );
        self.catalog
            .apply_manifest(&manifest, &session.content.audio_tracks);
        self.reconcile_audio_selection();
    }

    pub(super) fn on_audio_tracks_updated_core(&mut self, handle: EngineHandle, tracks: &str) {
        if !self.is_current_engine(handle) {
            return;
        }
        let tracks: Vec<EngineAudioTrack> = match serde_json::from_str(tracks) {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Core: unreadable audio tracks: {}", e);
                return;
            }
        };
        let Some(session) = &self.session else {
            return;
        };
        self.catalog
            .apply_engine_audio_tracks(&tracks, &session.content.audio_tracks);
        self.reconcile_audio_selection();
    }

    /// The engine switched audio track, possibly on its own: reflect it locally.
    pub(super) fn on_audio_track_switched_core(&mut self, handle: EngineHandle, track_id: u32) {
        if !self.is_current_engine(handle) {
            return;
        }
        let id = AudioTrackId::Engine(track_id);
        if self.catalog.audio_option(&id).is_none() {
            log::debug!("Core: engine switched to unlisted audio track {}", track_id);
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.selected_audio = id;
        }
    }

    /// Fall back to the default audio option if the selected one is not listed anymore.
    fn reconcile_audio_selection(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if self.catalog.audio_option(&session.selected_audio).is_none() {
                log::debug!("Core: selected audio track disappeared, back to default");
                session.selected_audio = AudioTrackId::Default;
            }
        }
    }

    pub(super) fn on_engine_error_core(&mut self, handle: EngineHandle, error: StreamingError) {
        if !self.is_current_engine(handle) {
            return;
        }
        log::warn!("Core: {}", error);
        match self.recovery.on_error(&error) {
            None => {}
            Some(RecoveryAction::Destroy) => self.on_unrecoverable_error(),
            Some(action) => {
                with_engine(&mut self.engine, &mut self.env, |e, host| e.recover(host, action));
                self.apply_transition(Transition::RecoverableError);
                let notice = if action == RecoveryAction::ReloadSegments {
                    NETWORK_NOTICE
                } else {
                    MEDIA_NOTICE
                };
                self.overlays
                    .notice(self.env.timers.as_mut(), &self.config, notice.to_owned());
            }
        }
    }

    fn on_unrecoverable_error(&mut self) {
        log::error!("Core: giving up on the adaptive engine");
        self.destroy_engine();
        self.pending_resume = None;
        self.apply_transition(Transition::FatalError);
        self.banner.raise(PlayerError {
            kind: PlayerErrorKind::Streaming,
            message: STREAMING_ERROR_MESSAGE.to_owned(),
            can_reload: true,
        });
    }

    pub(super) fn on_request_finished_core(&mut self, request_id: RequestId, data: &str) {
        match self.cue_request.take() {
            Some((id, url)) if id == request_id => match ThumbnailCues::parse(data, &url) {
                Ok(cues) => {
                    log::info!("Core: {} thumbnail cues loaded", cues.len());
                    self.thumbnails = Some(cues);
                }
                Err(e) => log::info!("Core: no thumbnail preview: {}", e),
            },
            other => {
                self.cue_request = other;
                log::debug!("Core: ignoring response of unknown request {}", request_id);
            }
        }
    }

    pub(super) fn on_request_failed_core(&mut self, request_id: RequestId) {
        match self.cue_request.take() {
            Some((id, url)) if id == request_id => {
                log::info!("Core: could not fetch {}, no thumbnail preview", url);
            }
            other => self.cue_request = other,
        }
    }

    pub(super) fn toggle_play_core(&mut self, ripple_at: Option<(f64, f64)>) {
        if !self.state.accepts_commands() {
            return;
        }
        let glyph = if self.state.is_playing() {
            self.env.media.pause();
            Glyph::Pause
        } else {
            self.env.media.play();
            Glyph::Play
        };
        let timers = self.env.timers.as_mut();
        self.overlays.flash(timers, &self.config, glyph);
        self.overlays.ripple(timers, &self.config, glyph, ripple_at);
        self.overlays.show_controls(timers, &self.config);
    }

    /// Seek to `position`, clamped to the content's bounds.
    pub(super) fn seek_core(&mut self, position: f64) {
        if !self.state.accepts_commands() || !position.is_finite() {
            return;
        }
        let from = self.position();
        if let Some(to) = self.seek_media(position) {
            self.env
                .analytics
                .emit(&AnalyticsEvent::VideoSeek { from, to });
        }
    }

    /// Move the media element's position without any other side-effect. Returns the
    /// position actually seeked to.
    fn seek_media(&mut self, position: f64) -> Option<f64> {
        let session = self.session.as_mut()?;
        let target = session.clamp_position(position);
        session.current_time = target;
        self.env.media.seek(target);
        Some(target)
    }

    fn seek_by(&mut self, offset: f64, ripple_at: Option<(f64, f64)>) {
        if self.session.is_none() || !self.state.accepts_commands() {
            return;
        }
        let target = self.position() + offset;
        self.seek_core(target);
        let glyph = if offset < 0. {
            Glyph::Rewind
        } else {
            Glyph::Forward
        };
        let timers = self.env.timers.as_mut();
        self.overlays.ripple(timers, &self.config, glyph, ripple_at);
        self.overlays.show_controls(timers, &self.config);
    }

    fn jump_to_tenth(&mut self, tenth: u8) {
        let Some(duration) = self.session.as_ref().and_then(|s| s.duration) else {
            return;
        };
        self.seek_core(duration * f64::from(tenth) / 10.);
        self.overlays
            .show_controls(self.env.timers.as_mut(), &self.config);
    }

    pub(super) fn set_volume_core(&mut self, volume: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.apply_volume(volume);
        self.on_volume_updated();
    }

    fn step_volume(&mut self, delta: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let was_muted = session.muted;
        let volume = session.apply_volume(session.volume + delta);
        // Only raising the volume unmutes
        if was_muted && delta < 0. && volume > 0. {
            session.muted = true;
        }
        self.on_volume_updated();
    }

    pub(super) fn toggle_mute_core(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.toggle_mute(self.config.unmute_fallback_volume);
        self.on_volume_updated();
    }

    /// Push the session's volume to the media element, display it and persist it.
    fn on_volume_updated(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.env.media.set_volume(session.volume);
        self.env.media.set_muted(session.muted);
        self.overlays.show_volume(
            self.env.timers.as_mut(),
            &self.config,
            session.effective_volume(),
        );
        self.preferences.volume = Some(session.volume);
        preferences::save(self.env.store.as_mut(), &session.content.id, &self.preferences);
    }

    pub(super) fn set_playback_rate_core(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.) {
            log::warn!("Core: invalid playback rate {}", rate);
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.playback_rate = rate;
        self.env.media.set_playback_rate(rate);
        self.preferences.playback_rate = Some(rate);
        preferences::save(self.env.store.as_mut(), &session.content.id, &self.preferences);
        self.close_menu_core();
    }

    /// Switch to the `index`th quality option, keeping the current position and play
    /// state.
    pub(super) fn select_quality_core(&mut self, index: usize) {
        let Some(option) = self.catalog.quality_options.get(index).cloned() else {
            log::warn!("Core: no quality option at index {}", index);
            return;
        };
        let Some(session) = &self.session else {
            return;
        };
        let resume = session.duration.map(|_| ResumePoint {
            position: session.current_time,
            was_playing: self.state.is_playing(),
        });
        let switch = with_engine(&mut self.engine, &mut self.env, |e, host| {
            e.set_quality(host, &option.target, resume)
        });
        self.close_menu_core();
        match switch {
            None | Some(QualitySwitch::Unchanged) => return,
            Some(QualitySwitch::Seamless) => {}
            Some(QualitySwitch::SourceSwapped(point)) => {
                self.pending_resume = Some(point);
                self.apply_transition(Transition::LoadStarted);
            }
        }
        log::info!("Core: quality switched to {}", option.label);
        if let Some(session) = self.session.as_mut() {
            session.selected_quality = option.target;
        }
        self.env
            .analytics
            .emit(&AnalyticsEvent::QualityChange { label: option.label });
    }

    pub(super) fn select_audio_core(&mut self, index: usize) {
        let Some(option) = self.catalog.audio_options.get(index).cloned() else {
            log::warn!("Core: no audio option at index {}", index);
            return;
        };
        if self.session.is_none() {
            return;
        }
        let switched = with_engine(&mut self.engine, &mut self.env, |e, host| {
            e.set_audio_track(host, &option.id)
        });
        self.close_menu_core();
        if switched != Some(true) {
            log::warn!("Core: could not switch to audio track {}", option.display_name);
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.selected_audio = option.id;
        }
        self.overlays.show_language(
            self.env.timers.as_mut(),
            &self.config,
            option.display_name.clone(),
        );
        self.env.analytics.emit(&AnalyticsEvent::AudioChange {
            label: option.display_name,
        });
    }

    fn next_audio_track(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let next = self
            .catalog
            .next_audio(&session.selected_audio)
            .and_then(|next| self.catalog.audio_options.iter().position(|a| a == next));
        if let Some(index) = next {
            self.select_audio_core(index);
        }
    }

    /// Show the subtitles of `language`, or hide them all if `None`.
    pub(super) fn select_subtitle_core(&mut self, language: Option<String>) {
        if let Some(lang) = &language {
            if self.catalog.subtitle_label(lang).is_none() {
                log::warn!("Core: no subtitle track for language {}", lang);
                return;
            }
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.active_subtitle = language.clone();
        let content_id = session.content.id.clone();
        self.apply_subtitle_modes();

        self.preferences.active_subtitle_language = Some(language.clone());
        preferences::save(self.env.store.as_mut(), &content_id, &self.preferences);

        let label = language
            .as_deref()
            .and_then(|lang| self.catalog.subtitle_label(lang))
            .unwrap_or(SUBTITLES_OFF_LABEL)
            .to_owned();
        self.overlays
            .show_language(self.env.timers.as_mut(), &self.config, label);
        self.close_menu_core();
        self.env
            .analytics
            .emit(&AnalyticsEvent::SubtitleToggle { language });
    }

    /// Set the mode of every text track of the media element according to the active
    /// subtitle language.
    fn apply_subtitle_modes(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let decisions =
            tracks::select_subtitle(&self.text_tracks, session.active_subtitle.as_deref());
        for (index, mode) in decisions {
            self.env.media.set_text_track_mode(index, mode);
        }
    }

    pub(super) fn on_text_tracks_changed_core(&mut self, languages: &str) {
        if self.session.is_none() {
            return;
        }
        match serde_json::from_str::<Vec<Option<String>>>(languages) {
            Ok(languages) => {
                self.text_tracks = languages.into_iter().map(Option::unwrap_or_default).collect();
                log::debug!("Core: media element has {} text tracks", self.text_tracks.len());
                self.apply_subtitle_modes();
            }
            Err(e) => log::warn!("Core: invalid text track list: {}", e),
        }
    }

    fn toggle_subtitles(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if session.active_subtitle.is_some() {
            self.select_subtitle_core(None);
            return;
        }
        match self.catalog.subtitle_options.first() {
            Some(first) => {
                let lang = first.language_code.clone();
                self.select_subtitle_core(Some(lang));
            }
            None => log::debug!("Core: no subtitle track to toggle"),
        }
    }

    pub(super) fn on_key_down_core(&mut self, key: &str, in_editable: bool) -> bool {
        if self.state == PlayerState::Destroyed {
            return false;
        }
        let Some(command) = input::map_key(key, in_editable) else {
            return false;
        };
        log::debug!("Core: key command {:?}", command);
        match command {
            KeyCommand::TogglePlay => self.toggle_play_core(None),
            KeyCommand::ToggleMute => self.toggle_mute_core(),
            KeyCommand::SeekBackward => self.seek_by(-self.config.keyboard_seek_step, None),
            KeyCommand::SeekForward => self.seek_by(self.config.keyboard_seek_step, None),
            KeyCommand::VolumeUp => self.step_volume(self.config.volume_step),
            KeyCommand::VolumeDown => self.step_volume(-self.config.volume_step),
            KeyCommand::PictureInPicture => self.request_picture_in_picture_core(),
            KeyCommand::ToggleFullscreen => self.env.surface.toggle_fullscreen(),
            KeyCommand::ToggleSubtitles => self.toggle_subtitles(),
            KeyCommand::NextAudioTrack => self.next_audio_track(),
            KeyCommand::Close => self.close_core(),
            KeyCommand::JumpToTenth(tenth) => self.jump_to_tenth(tenth),
        }
        true
    }

    pub(super) fn request_picture_in_picture_core(&mut self) {
        if self.state.accepts_commands() {
            self.env.media.request_picture_in_picture();
        }
    }

    /// Close the open menu if one, the whole player otherwise.
    pub(super) fn close_core(&mut self) {
        if self.overlays.menu.open.is_some() && !self.overlays.menu.closing {
            self.close_menu_core();
            return;
        }
        self.unmount_core();
        self.env.surface.close();
    }

    pub(super) fn on_surface_click_core(&mut self, x: f64, y: f64) {
        let now = self.env.timers.now();
        if !self.tap_guard.accept(now, self.config.tap_guard_interval) {
            log::debug!("Core: ignoring tap too close to the previous one");
            return;
        }
        if self.overlays.menu.open.is_some() {
            self.close_menu_core();
            return;
        }
        self.toggle_play_core(Some((x, y)));
    }

    pub(super) fn on_surface_double_click_core(&mut self, x: f64, y: f64, width: f64) {
        if let Some(offset) = input::double_click_offset(x, width, self.config.double_click_seek_step) {
            self.seek_by(offset, Some((x, y)));
        }
    }

    pub(super) fn on_timeline_pointer_down_core(&mut self, x: f64, width: f64) {
        if !self.state.accepts_commands() {
            return;
        }
        let duration = self.session.as_ref().and_then(|s| s.duration);
        let Some(time) = input::timeline_time(x, width, duration) else {
            return;
        };
        if self.drag == TimelineDrag::Idle {
            self.env.surface.attach_drag_listeners();
        }
        let from = self.position();
        self.drag = TimelineDrag::Dragging { from };
        self.seek_media(time);
        self.overlays
            .show_controls(self.env.timers.as_mut(), &self.config);
    }

    pub(super) fn on_timeline_drag_move_core(&mut self, x: f64, width: f64) {
        if self.drag == TimelineDrag::Idle {
            return;
        }
        let duration = self.session.as_ref().and_then(|s| s.duration);
        if let Some(time) = input::timeline_time(x, width, duration) {
            self.seek_media(time);
        }
    }

    pub(super) fn on_timeline_drag_end_core(&mut self, x: f64, width: f64) {
        let TimelineDrag::Dragging { from } = self.drag else {
            return;
        };
        self.drag = TimelineDrag::Idle;
        self.env.surface.detach_drag_listeners();
        let duration = self.session.as_ref().and_then(|s| s.duration);
        if let Some(time) = input::timeline_time(x, width, duration) {
            if let Some(to) = self.seek_media(time) {
                self.env
                    .analytics
                    .emit(&AnalyticsEvent::VideoSeek { from, to });
            }
        }
    }

    pub(super) fn on_timeline_hover_core(&mut self, x: f64, width: f64) {
        let duration = self.session.as_ref().and_then(|s| s.duration);
        let (Some(ratio), Some(time)) = (
            input::pointer_ratio(x, width),
            input::timeline_time(x, width, duration),
        ) else {
            self.hover = None;
            return;
        };
        let thumbnail = self
            .thumbnails
            .as_ref()
            .and_then(|cues| cues.at(time))
            .map(|cue| cue.image.get_ref().to_owned());
        self.hover = Some(HoverPreview {
            ratio,
            time,
            label: format_time(time),
            thumbnail,
        });
    }

    pub(super) fn open_menu_core(&mut self, menu: MenuKind) {
        if self.session.is_none() {
            return;
        }
        let timers = self.env.timers.as_mut();
        self.overlays.open_menu(timers, menu);
        self.overlays.show_controls(timers, &self.config);
    }

    pub(super) fn close_menu_core(&mut self) {
        self.overlays
            .close_menu(self.env.timers.as_mut(), &self.config);
    }

    /// Play the content again from its start.
    pub(super) fn restart_core(&mut self) {
        if self.session.is_none() || !self.state.accepts_commands() {
            return;
        }
        self.up_next_visible = false;
        self.seek_core(0.);
        self.env.media.play();
    }

    pub(super) fn dismiss_up_next_core(&mut self) {
        self.up_next_visible = false;
    }

    pub(super) fn confirm_up_next_core(&mut self) {
        if self.up_next_visible {
            log::info!("Core: up next confirmed, episode chaining is left to the application");
        }
        self.up_next_visible = false;
    }

    pub(super) fn dismiss_error_core(&mut self) {
        self.banner.dismiss();
    }
}
