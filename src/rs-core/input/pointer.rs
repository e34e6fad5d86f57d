/// Suppresses surface taps following the previous accepted one too closely.
#[derive(Debug, Default)]
pub(crate) struct TapGuard {
    last_accepted: Option<f64>,
}

impl TapGuard {
    /// Returns `true` if a tap at `now` should be acted upon.
    pub(crate) fn accept(&mut self, now: f64, min_interval: f64) -> bool {
        match self.last_accepted {
            Some(last) if now - last < min_interval => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Seek offset of a double-click at `x` on a surface `width` wide: backward on the left
/// half, forward on the right one.
pub(crate) fn double_click_offset(x: f64, width: f64, step: f64) -> Option<f64> {
    if !(width > 0.) || !x.is_finite() {
        return None;
    }
    Some(if x < width / 2. { -step } else { step })
}

/// Position, in `[0, 1]`, of a pointer at `x` on a timeline `width` wide.
pub(crate) fn pointer_ratio(x: f64, width: f64) -> Option<f64> {
    if !(width > 0.) || !x.is_finite() {
        return None;
    }
    Some((x / width).clamp(0., 1.))
}

/// Media time pointed at on the timeline.
pub(crate) fn timeline_time(x: f64, width: f64, duration: Option<f64>) -> Option<f64> {
    Some(pointer_ratio(x, width)? * duration?)
}

/// Timeline interaction in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) enum TimelineDrag {
    #[default]
    Idle,
    /// Mouse button held down on the timeline. Document-level listeners are attached for
    /// as long as we're in this state.
    Dragging {
        /// Position at which the drag started, in seconds.
        from: f64,
    },
}

/// Format `seconds` as `M:SS`, or `H:MM:SS` from one hour.
pub(crate) fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0. {
        seconds.floor() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
