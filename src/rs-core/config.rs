/// Every tunable delay and threshold of the player.
///
/// Can be updated at any time through the `Dispatcher`'s `set_*` methods; new values are
/// taken into account the next time they are needed.
#[derive(Clone, Debug)]
pub(crate) struct PlayerConfig {
    /// Delay, in milliseconds, after which the controls are hidden again after being shown.
    ///
    /// Controls stay visible while the media element is paused.
    pub(crate) controls_hide_delay: f64,

    /// Time, in milliseconds, the play/pause glyph is displayed after each toggle.
    pub(crate) flash_duration: f64,

    /// Time, in milliseconds, the ripple under the pointer is displayed.
    pub(crate) cursor_ripple_duration: f64,

    /// Time, in milliseconds, the volume HUD stays on screen after a volume or mute change.
    pub(crate) volume_hud_duration: f64,

    /// Time, in milliseconds, the language HUD stays on screen after a track switch.
    pub(crate) language_hud_duration: f64,

    /// Delay, in milliseconds, after a pause before the paused-info overlay is revealed.
    pub(crate) paused_info_delay: f64,

    /// Quiet period, in milliseconds, after which a paused-info overlay hidden by a mouse
    /// movement is shown again.
    pub(crate) paused_info_rearm_delay: f64,

    /// Time, in milliseconds, soft error notices stay on screen.
    pub(crate) notice_duration: f64,

    /// Duration, in milliseconds, of the fade-out of a selection menu.
    pub(crate) menu_fade_duration: f64,

    /// Minimum interval, in milliseconds, between two taps on the video surface for the
    /// second one to toggle playback.
    pub(crate) tap_guard_interval: f64,

    /// Minimum interval, in milliseconds, between two analytics heartbeats.
    pub(crate) heartbeat_interval: f64,

    /// Seek offset, in seconds, of the arrow keys.
    pub(crate) keyboard_seek_step: f64,

    /// Seek offset, in seconds, of a double-click on one half of the player.
    pub(crate) double_click_seek_step: f64,

    /// Volume offset of the arrow keys.
    pub(crate) volume_step: f64,

    /// Volume restored when unmuting while the volume is at `0`.
    pub(crate) unmute_fallback_volume: f64,

    /// Amount of network-class streaming errors tolerated (and recovered from) before
    /// giving up on the adaptive engine.
    pub(crate) max_network_recoveries: u32,

    /// Amount of media-class streaming errors tolerated (and recovered from) before giving
    /// up on the adaptive engine.
    pub(crate) max_media_recoveries: u32,

    /// Volume under which the "low" volume icon is displayed, and volume under which the
    /// "medium" one is.
    pub(crate) volume_icon_thresholds: (f64, f64),

    /// If `true`, an "up next" prompt is shown once an episode ends.
    pub(crate) autoplay_next: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            controls_hide_delay: 2200.,
            flash_duration: 600.,
            cursor_ripple_duration: 600.,
            volume_hud_duration: 1000.,
            language_hud_duration: 1500.,
            paused_info_delay: 10_000.,
            paused_info_rearm_delay: 2000.,
            notice_duration: 4000.,
            menu_fade_duration: 200.,
            tap_guard_interval: 300.,
            heartbeat_interval: 15_000.,
            keyboard_seek_step: 5.,
            double_click_seek_step: 10.,
            volume_step: 0.05,
            unmute_fallback_volume: 0.5,
            max_network_recoveries: 3,
            max_media_recoveries: 3,
            volume_icon_thresholds: (0.33, 0.66),
            autoplay_next: true,
        }
    }
}
