use serde::Serialize;

use super::Dispatcher;
use crate::{
    input::{format_time, TimelineDrag},
    media_source::PlayerError,
    overlays::{Glyph, MenuState, PausedInfo, Ripple},
    playback::{PlayerState, VolumeLevel},
    tracks::{AudioOption, AudioTrackId, QualityOption, QualityTarget, SubtitleOption},
};

/// Time tooltip, and optional thumbnail, displayed while hovering the timeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverPreview {
    /// Horizontal position of the pointer on the timeline, in `[0, 1]`.
    pub ratio: f64,
    pub time: f64,
    pub label: String,
    pub thumbnail: Option<String>,
}

/// Everything the JavaScript-side needs to render the player UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub state: PlayerState,
    pub is_playing: bool,
    pub is_loading: bool,

    pub title: Option<String>,
    pub episode_label: Option<String>,
    pub description: Option<String>,
    pub year: Option<u32>,
    pub poster_url: Option<String>,

    pub current_time: f64,
    pub duration: Option<f64>,
    pub progress_percent: Option<f64>,
    pub buffer_percent: Option<f64>,
    pub time_label: String,
    pub duration_label: Option<String>,

    pub volume: f64,
    pub muted: bool,
    pub volume_level: VolumeLevel,
    pub playback_rate: f64,

    pub controls_visible: bool,
    pub flash: Option<Glyph>,
    pub ripple: Option<Ripple>,
    pub volume_hud: Option<u8>,
    pub language_hud: Option<String>,
    pub paused_info: PausedInfo,
    pub notice: Option<String>,
    pub menu: MenuState,

    pub quality_options: Vec<QualityOption>,
    pub selected_quality: QualityTarget,
    pub audio_options: Vec<AudioOption>,
    pub selected_audio: AudioTrackId,
    pub subtitle_options: Vec<SubtitleOption>,
    pub active_subtitle: Option<String>,

    /// Offer to restart the content, shown once it ended.
    pub resume_overlay: bool,
    pub up_next: bool,
    pub error: Option<PlayerError>,
    pub hover: Option<HoverPreview>,
    pub dragging: bool,
}

impl Dispatcher {
    pub(super) fn snapshot(&self) -> UiSnapshot {
        let session = self.session.as_ref();
        let content = session.map(|s| &s.content);
        let current_time = session.map_or(0., |s| s.current_time);
        let duration = session.and_then(|s| s.duration);
        let (volume, muted) = session.map_or((1., false), |s| (s.volume, s.muted));
        UiSnapshot {
            state: self.state,
            is_playing: self.state.is_playing(),
            is_loading: self.state.is_loading() || session.map_or(false, |s| s.seeking),
            title: content.map(|c| c.title.clone()),
            episode_label: content.and_then(|c| c.episode_label()),
            description: content.and_then(|c| c.description.clone()),
            year: content.and_then(|c| c.year),
            poster_url: content.and_then(|c| c.poster_url.clone()),
            current_time,
            duration,
            progress_percent: session.and_then(|s| s.progress_percent()),
            buffer_percent: session.and_then(|s| s.buffer_percent()),
            time_label: format_time(current_time),
            duration_label: duration.map(format_time),
            volume,
            muted,
            volume_level: VolumeLevel::from_volume(
                volume,
                muted,
                self.config.volume_icon_thresholds,
            ),
            playback_rate: session.map_or(1., |s| s.playback_rate),
            controls_visible: self.overlays.controls_visible,
            flash: self.overlays.flash,
            ripple: self.overlays.ripple,
            volume_hud: self.overlays.volume_hud,
            language_hud: self.overlays.language_hud.clone(),
            paused_info: self.overlays.paused_info,
            notice: self.overlays.notice.clone(),
            menu: self.overlays.menu,
            quality_options: self.catalog.quality_options.clone(),
            selected_quality: session.map_or(QualityTarget::Auto, |s| s.selected_quality.clone()),
            audio_options: self.catalog.audio_options.clone(),
            selected_audio: session.map_or(AudioTrackId::Default, |s| s.selected_audio.clone()),
            subtitle_options: self.catalog.subtitle_options.clone(),
            active_subtitle: session.and_then(|s| s.active_subtitle.clone()),
            resume_overlay: self.state.has_ended(),
            up_next: self.up_next_visible,
            error: self.banner.current().cloned(),
            hover: self.hover.clone(),
            dragging: !matches!(self.drag, TimelineDrag::Idle),
        }
    }
}
