use crate::{
    content::ContentDescriptor,
    tracks::{AudioTrackId, QualityTarget},
    utils::{time_ranges::TimeRanges, url::Url},
};

/// Facts about the currently loaded content, as last reported by the media element, and
/// the selections made by the user.
#[derive(Clone, Debug)]
pub(crate) struct PlaybackSession {
    pub(crate) content: ContentDescriptor,
    pub(crate) source_url: Url,
    pub(crate) is_adaptive: bool,

    /// Only known once metadata is loaded.
    pub(crate) duration: Option<f64>,
    pub(crate) current_time: f64,
    pub(crate) buffered_end: Option<f64>,
    pub(crate) seeking: bool,

    pub(crate) playback_rate: f64,
    pub(crate) volume: f64,
    pub(crate) muted: bool,

    pub(crate) selected_quality: QualityTarget,
    pub(crate) selected_audio: AudioTrackId,
    pub(crate) active_subtitle: Option<String>,
}

impl PlaybackSession {
    pub(crate) fn new(content: ContentDescriptor, is_adaptive: bool) -> Self {
        let source_url = content.media_url();
        Self {
            content,
            source_url,
            is_adaptive,
            duration: None,
            current_time: 0.,
            buffered_end: None,
            seeking: false,
            playback_rate: 1.,
            volume: 1.,
            muted: false,
            selected_quality: QualityTarget::Auto,
            selected_audio: AudioTrackId::Default,
            active_subtitle: None,
        }
    }

    pub(crate) fn content_id(&self) -> &str {
        &self.content.id
    }

    /// Record a new duration. Non-finite or non-positive durations are not usable and are
    /// stored as unknown.
    pub(crate) fn update_duration(&mut self, duration: f64) {
        self.duration = (duration.is_finite() && duration > 0.).then_some(duration);
        if let Some(d) = self.duration {
            self.current_time = self.current_time.min(d);
        }
    }

    /// Record the position reported by the media element, kept within `[0, duration]`.
    pub(crate) fn update_position(&mut self, position: f64) {
        if !position.is_finite() {
            return;
        }
        self.current_time = self.clamp_position(position);
    }

    pub(crate) fn update_buffered(&mut self, buffered: &TimeRanges) {
        self.buffered_end = buffered.last_end();
    }

    /// Keep `position` within the seekable bounds of the content.
    pub(crate) fn clamp_position(&self, position: f64) -> f64 {
        let position = position.max(0.);
        match self.duration {
            Some(d) => position.min(d),
            None => position,
        }
    }

    /// Store `volume`, clamped to `[0, 1]`, muting if it is `0` and unmuting otherwise.
    ///
    /// Returns the volume stored. `NaN` leaves the volume untouched.
    pub(crate) fn apply_volume(&mut self, volume: f64) -> f64 {
        if !volume.is_nan() {
            self.volume = volume.clamp(0., 1.);
            self.muted = self.volume == 0.;
        }
        self.volume
    }

    /// Flip the mute state. Unmuting at a volume of `0` restores `fallback_volume`.
    pub(crate) fn toggle_mute(&mut self, fallback_volume: f64) {
        if self.muted {
            self.muted = false;
            if self.volume == 0. {
                self.volume = fallback_volume.clamp(0., 1.);
            }
        } else {
            self.muted = true;
        }
    }

    /// Volume actually heard, `0` when muted.
    pub(crate) fn effective_volume(&self) -> f64 {
        if self.muted {
            0.
        } else {
            self.volume
        }
    }

    pub(crate) fn progress_percent(&self) -> Option<f64> {
        super::progress_percent(self.current_time, self.duration.unwrap_or(f64::NAN))
    }

    pub(crate) fn buffer_percent(&self) -> Option<f64> {
        super::buffer_percent(self.buffered_end?, self.duration.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PlaybackSession {
        let content = ContentDescriptor::from_json(
            r#"{"id": "movie-1", "title": "Movie", "mediaUrl": "https://cdn.test/movie.mp4"}"#,
        )
        .unwrap();
        PlaybackSession::new(content, false)
    }

    #[test]
    fn test_volume_is_clamped_and_drives_mute() {
        let mut s = session();
        for (input, stored) in [
            (0.42, 0.42),
            (1.7, 1.),
            (-0.2, 0.),
            (0., 0.),
            (1., 1.),
            (f64::INFINITY, 1.),
            (f64::NEG_INFINITY, 0.),
        ] {
            assert_eq!(s.apply_volume(input), stored);
            assert_eq!(s.volume, stored);
            assert_eq!(s.muted, stored == 0.);
        }
        s.apply_volume(0.3);
        assert_eq!(s.apply_volume(f64::NAN), 0.3);
    }

    #[test]
    fn test_unmute_restores_audible_volume() {
        let mut s = session();
        s.apply_volume(0.);
        assert!(s.muted);
        s.toggle_mute(0.5);
        assert!(!s.muted);
        assert_eq!(s.volume, 0.5);

        s.apply_volume(0.8);
        s.toggle_mute(0.5);
        assert!(s.muted);
        assert_eq!(s.effective_volume(), 0.);
        s.toggle_mute(0.5);
        assert_eq!(s.volume, 0.8);
    }

    #[test]
    fn test_position_stays_within_duration() {
        let mut s = session();
        s.update_position(30.);
        assert_eq!(s.current_time, 30.);
        s.update_duration(20.);
        assert_eq!(s.current_time, 20.);
        s.update_position(-3.);
        assert_eq!(s.current_time, 0.);
        s.update_position(f64::NAN);
        assert_eq!(s.current_time, 0.);
        s.update_duration(f64::INFINITY);
        assert_eq!(s.duration, None);
        assert_eq!(s.progress_percent(), None);
    }
}
