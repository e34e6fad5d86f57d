use serde::Serialize;

mod session;
mod state;

pub(crate) use session::PlaybackSession;
pub use state::PlayerState;
pub(crate) use state::Transition;

/// Played proportion of the content, in percents.
///
/// Only computed when `duration` is finite and strictly positive.
pub(crate) fn progress_percent(current_time: f64, duration: f64) -> Option<f64> {
    ratio_percent(current_time, duration)
}

/// Proportion of the content buffered, from the end of the last buffered range.
pub(crate) fn buffer_percent(buffered_end: f64, duration: f64) -> Option<f64> {
    ratio_percent(buffered_end, duration)
}

fn ratio_percent(value: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0. || value.is_nan() {
        return None;
    }
    Some((value / duration * 100.).clamp(0., 100.))
}

/// Icon displayed for the current volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeLevel {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeLevel {
    /// `thresholds` are the volumes under which the `Low` then `Medium` icons are used.
    pub(crate) fn from_volume(volume: f64, muted: bool, thresholds: (f64, f64)) -> Self {
        if muted || volume <= 0. {
            VolumeLevel::Muted
        } else if volume < thresholds.0 {
            VolumeLevel::Low
        } else if volume < thresholds.1 {
            VolumeLevel::Medium
        } else {
            VolumeLevel::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(30., 120.), Some(25.));
        assert_eq!(progress_percent(0., 596.), Some(0.));
        assert_eq!(progress_percent(700., 596.), Some(100.));
        assert_eq!(progress_percent(-1., 596.), Some(0.));
        assert_eq!(progress_percent(10., 0.), None);
        assert_eq!(progress_percent(10., f64::NAN), None);
        assert_eq!(progress_percent(10., f64::INFINITY), None);
        assert_eq!(progress_percent(10., -5.), None);
    }

    #[test]
    fn test_progress_percent_is_clamped_ratio() {
        let duration: f64 = 596.;
        let mut t: f64 = 0.;
        while t <= 700. {
            let expected = (t / duration * 100.).clamp(0., 100.);
            assert_eq!(progress_percent(t, duration), Some(expected));
            t += 7.3;
        }
    }

    #[test]
    fn test_buffer_percent() {
        assert_eq!(buffer_percent(60., 120.), Some(50.));
        assert_eq!(buffer_percent(60., 0.), None);
    }

    #[test]
    fn test_volume_level() {
        let thresholds = (0.33, 0.66);
        assert_eq!(VolumeLevel::from_volume(0.8, true, thresholds), VolumeLevel::Muted);
        assert_eq!(VolumeLevel::from_volume(0., false, thresholds), VolumeLevel::Muted);
        assert_eq!(VolumeLevel::from_volume(0.2, false, thresholds), VolumeLevel::Low);
        assert_eq!(VolumeLevel::from_volume(0.33, false, thresholds), VolumeLevel::Medium);
        assert_eq!(VolumeLevel::from_volume(0.66, false, thresholds), VolumeLevel::High);
        assert_eq!(VolumeLevel::from_volume(0.34, false, (0.35, 0.70)), VolumeLevel::Low);
    }
}
