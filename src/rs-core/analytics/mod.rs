use serde::Serialize;

/// Events reported to the analytics sink.
///
/// Emission is fire-and-forget: nothing in the player waits on, or reacts to, the sink.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    SessionStart {
        content_id: String,
        title: String,
        adaptive: bool,
    },
    VideoPlay {
        position: f64,
    },
    VideoPause {
        position: f64,
    },
    VideoSeek {
        from: f64,
        to: f64,
    },
    VideoBufferingStart {
        position: f64,
    },
    VideoBufferingEnd {
        position: f64,
        /// Time spent buffering, in milliseconds.
        stalled_for: f64,
    },
    QualityChange {
        label: String,
    },
    AudioChange {
        label: String,
    },
    SubtitleToggle {
        language: Option<String>,
    },
    Heartbeat {
        position: f64,
        duration: Option<f64>,
    },
    SessionEnd {
        content_id: String,
        position: f64,
    },
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::SessionStart { .. } => "session_start",
            AnalyticsEvent::VideoPlay { .. } => "video_play",
            AnalyticsEvent::VideoPause { .. } => "video_pause",
            AnalyticsEvent::VideoSeek { .. } => "video_seek",
            AnalyticsEvent::VideoBufferingStart { .. } => "video_buffering_start",
            AnalyticsEvent::VideoBufferingEnd { .. } => "video_buffering_end",
            AnalyticsEvent::QualityChange { .. } => "quality_change",
            AnalyticsEvent::AudioChange { .. } => "audio_change",
            AnalyticsEvent::SubtitleToggle { .. } => "subtitle_toggle",
            AnalyticsEvent::Heartbeat { .. } => "heartbeat",
            AnalyticsEvent::SessionEnd { .. } => "session_end",
        }
    }
}

/// Throttles heartbeats so that at most one is emitted per `interval` milliseconds,
/// driven by `timeupdate` events rather than by a timer of its own.
#[derive(Debug, Default)]
pub(crate) struct Heartbeat {
    last_emitted_at: Option<f64>,
}

impl Heartbeat {
    /// Returns `true` if a heartbeat should be emitted at `now`, in which case `now` becomes
    /// the reference for the next one.
    pub(crate) fn tick(&mut self, now: f64, interval: f64) -> bool {
        match self.last_emitted_at {
            Some(last) if now - last < interval => false,
            _ => {
                self.last_emitted_at = Some(now);
                true
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.last_emitted_at = None;
    }
}
