use serde::Serialize;

use crate::{bindings::TimerId, config::PlayerConfig, host::Timers, wasm_bindgen};

mod timer_table;

pub(crate) use timer_table::TimerTable;

/// Every auto-expiring piece of UI. Each one owns at most one pending timer.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Visibility of the control bar.
    Controls = 0,
    /// Play/pause glyph shown in the middle of the player on each toggle.
    Flash = 1,
    /// Ripple and transient icon shown under the pointer.
    Cursor = 2,
    VolumeHud = 3,
    LanguageHud = 4,
    /// Two-stage reveal of the content information while paused.
    PausedInfo = 5,
    /// Soft, auto-expiring error notice.
    Notice = 6,
    /// Fade-out of a selection menu.
    MenuFade = 7,
}

impl OverlayKind {
    pub(crate) const COUNT: usize = 8;

    pub(crate) const ALL: [OverlayKind; OverlayKind::COUNT] = [
        OverlayKind::Controls,
        OverlayKind::Flash,
        OverlayKind::Cursor,
        OverlayKind::VolumeHud,
        OverlayKind::LanguageHud,
        OverlayKind::PausedInfo,
        OverlayKind::Notice,
        OverlayKind::MenuFade,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Icon displayed by the flash and cursor overlays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Glyph {
    Play,
    Pause,
    Rewind,
    Forward,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ripple {
    pub glyph: Glyph,
    /// Pointer coordinates relative to the player. `None` for keyboard-triggered ripples,
    /// which are centered.
    pub position: Option<(f64, f64)>,
}

/// Stage of the paused-info overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PausedInfo {
    /// Not displayed, nothing scheduled. Always the case while playing.
    Hidden,
    /// Paused, waiting for the long reveal delay.
    Pending,
    /// Displayed and dimming the video.
    Shown,
    /// Hidden by a mouse movement, waiting for a quiet period to be shown again.
    Rearming,
}

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuKind {
    Quality = 0,
    Audio = 1,
    Subtitles = 2,
    Speed = 3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MenuState {
    pub open: Option<MenuKind>,
    /// `true` while the menu is fading out, before being removed.
    pub closing: bool,
}

/// State of every overlay alongside the timers driving them.
#[derive(Debug)]
pub(crate) struct Overlays {
    table: TimerTable,
    pub(crate) controls_visible: bool,
    pub(crate) flash: Option<Glyph>,
    pub(crate) ripple: Option<Ripple>,
    pub(crate) volume_hud: Option<u8>,
    pub(crate) language_hud: Option<String>,
    pub(crate) paused_info: PausedInfo,
    pub(crate) notice: Option<String>,
    pub(crate) menu: MenuState,
}

impl Overlays {
    pub(crate) fn new() -> Self {
        Self {
            table: TimerTable::new(),
            controls_visible: true,
            flash: None,
            ripple: None,
            volume_hud: None,
            language_hud: None,
            paused_info: PausedInfo::Hidden,
            notice: None,
            menu: MenuState::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn timers(&self) -> &TimerTable {
        &self.table
    }

    pub(crate) fn show_controls(&mut self, timers: &mut dyn Timers, config: &PlayerConfig) {
        self.controls_visible = true;
        self.table
            .arm(timers, OverlayKind::Controls, config.controls_hide_delay);
    }

    pub(crate) fn flash(&mut self, timers: &mut dyn Timers, config: &PlayerConfig, glyph: Glyph) {
        self.flash = Some(glyph);
        self.table
            .arm(timers, OverlayKind::Flash, config.flash_duration);
    }

    pub(crate) fn ripple(
        &mut self,
        timers: &mut dyn Timers,
        config: &PlayerConfig,
        glyph: Glyph,
        position: Option<(f64, f64)>,
    ) {
        self.ripple = Some(Ripple { glyph, position });
        self.table
            .arm(timers, OverlayKind::Cursor, config.cursor_ripple_duration);
    }

    pub(crate) fn show_volume(&mut self, timers: &mut dyn Timers, config: &PlayerConfig, volume: f64) {
        self.volume_hud = Some((volume.clamp(0., 1.) * 100.).round() as u8);
        self.table
            .arm(timers, OverlayKind::VolumeHud, config.volume_hud_duration);
    }

    pub(crate) fn show_language(&mut self, timers: &mut dyn Timers, config: &PlayerConfig, label: String) {
        self.language_hud = Some(label);
        self.table
            .arm(timers, OverlayKind::LanguageHud, config.language_hud_duration);
    }

    pub(crate) fn notice(&mut self, timers: &mut dyn Timers, config: &PlayerConfig, message: String) {
        self.notice = Some(message);
        self.table
            .arm(timers, OverlayKind::Notice, config.notice_duration);
    }

    /// Playback just paused: schedule the paused-info reveal.
    pub(crate) fn on_paused(&mut self, timers: &mut dyn Timers, config: &PlayerConfig) {
        self.paused_info = PausedInfo::Pending;
        self.table
            .arm(timers, OverlayKind::PausedInfo, config.paused_info_delay);
    }

    /// Playback (re)started: the paused-info overlay is fully suppressed.
    pub(crate) fn on_resumed(&mut self, timers: &mut dyn Timers) {
        self.paused_info = PausedInfo::Hidden;
        self.table.cancel(timers, OverlayKind::PausedInfo);
    }

    /// The pointer moved over the player.
    ///
    /// While paused, motion before the reveal restarts the long delay; motion after the
    /// reveal hides the overlay immediately and re-shows it after a quiet period.
    pub(crate) fn on_pointer_motion(&mut self, timers: &mut dyn Timers, config: &PlayerConfig, paused: bool) {
        self.show_controls(timers, config);
        if !paused {
            return;
        }
        match self.paused_info {
            PausedInfo::Pending => {
                self.table
                    .arm(timers, OverlayKind::PausedInfo, config.paused_info_delay);
            }
            PausedInfo::Shown | PausedInfo::Rearming => {
                self.paused_info = PausedInfo::Rearming;
                self.table
                    .arm(timers, OverlayKind::PausedInfo, config.paused_info_rearm_delay);
            }
            PausedInfo::Hidden => {}
        }
    }

    pub(crate) fn open_menu(&mut self, timers: &mut dyn Timers, menu: MenuKind) {
        self.table.cancel(timers, OverlayKind::MenuFade);
        self.menu = MenuState {
            open: Some(menu),
            closing: false,
        };
    }

    /// Begin fading out the open menu, if one.
    pub(crate) fn close_menu(&mut self, timers: &mut dyn Timers, config: &PlayerConfig) {
        if self.menu.open.is_none() || self.menu.closing {
            return;
        }
        self.menu.closing = true;
        self.table
            .arm(timers, OverlayKind::MenuFade, config.menu_fade_duration);
    }

    /// To call when the timer `id` of `kind` elapsed.
    ///
    /// Returns `false` if that timer was stale, in which case nothing changed.
    pub(crate) fn on_expired(&mut self, kind: OverlayKind, id: TimerId, media_paused: bool) -> bool {
        if !self.table.expire(kind, id) {
            return false;
        }
        match kind {
            // Controls must stay visible while paused.
            OverlayKind::Controls => self.controls_visible = media_paused,
            OverlayKind::Flash => self.flash = None,
            OverlayKind::Cursor => self.ripple = None,
            OverlayKind::VolumeHud => self.volume_hud = None,
            OverlayKind::LanguageHud => self.language_hud = None,
            OverlayKind::PausedInfo => {
                self.paused_info = if media_paused {
                    PausedInfo::Shown
                } else {
                    PausedInfo::Hidden
                };
            }
            OverlayKind::Notice => self.notice = None,
            OverlayKind::MenuFade => self.menu = MenuState::default(),
        }
        true
    }

    /// Clear every pending timer and go back to the initial overlay state.
    pub(crate) fn reset(&mut self, timers: &mut dyn Timers) {
        self.table.cancel_all(timers);
        let table = std::mem::take(&mut self.table);
        *self = Self { table, ..Self::new() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualTimers;

    fn fire(overlays: &mut Overlays, timers: &mut ManualTimers, kind: OverlayKind, paused: bool) {
        let id = timers
            .pending()
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.id)
            .unwrap();
        timers.remove(id);
        assert!(overlays.on_expired(kind, id, paused));
    }

    #[test]
    fn test_controls_hide_unless_paused() {
        let config = PlayerConfig::default();
        let mut timers = ManualTimers::default();
        let mut overlays = Overlays::new();

        overlays.show_controls(&mut timers, &config);
        fire(&mut overlays, &mut timers, OverlayKind::Controls, false);
        assert!(!overlays.controls_visible);

        overlays.show_controls(&mut timers, &config);
        fire(&mut overlays, &mut timers, OverlayKind::Controls, true);
        assert!(overlays.controls_visible);
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let config = PlayerConfig::default();
        let mut timers = ManualTimers::default();
        let mut overlays = Overlays::new();

        overlays.show_volume(&mut timers, &config, 0.3);
        let stale = timers.pending()[0].id;
        overlays.show_volume(&mut timers, &config, 0.35);
        assert!(!overlays.on_expired(OverlayKind::VolumeHud, stale, false));
        assert_eq!(overlays.volume_hud, Some(35));
    }

    #[test]
    fn test_paused_info_two_stages() {
        let config = PlayerConfig::default();
        let mut timers = ManualTimers::default();
        let mut overlays = Overlays::new();

        overlays.on_paused(&mut timers, &config);
        assert_eq!(overlays.paused_info, PausedInfo::Pending);
        fire(&mut overlays, &mut timers, OverlayKind::PausedInfo, true);
        assert_eq!(overlays.paused_info, PausedInfo::Shown);

        overlays.on_pointer_motion(&mut timers, &config, true);
        assert_eq!(overlays.paused_info, PausedInfo::Rearming);
        let rearm = timers
            .pending()
            .iter()
            .find(|t| t.kind == OverlayKind::PausedInfo)
            .map(|t| t.delay)
            .unwrap();
        assert_eq!(rearm, config.paused_info_rearm_delay);
        fire(&mut overlays, &mut timers, OverlayKind::PausedInfo, true);
        assert_eq!(overlays.paused_info, PausedInfo::Shown);

        overlays.on_resumed(&mut timers);
        assert_eq!(overlays.paused_info, PausedInfo::Hidden);
        assert!(!overlays.timers().is_pending(OverlayKind::PausedInfo));
    }

    #[test]
    fn test_motion_while_playing_does_not_touch_paused_info() {
        let config = PlayerConfig::default();
        let mut timers = ManualTimers::default();
        let mut overlays = Overlays::new();
        overlays.on_pointer_motion(&mut timers, &config, false);
        assert_eq!(overlays.paused_info, PausedInfo::Hidden);
        assert!(!overlays.timers().is_pending(OverlayKind::PausedInfo));
        assert!(overlays.timers().is_pending(OverlayKind::Controls));
    }

    #[test]
    fn test_menu_fade() {
        let config = PlayerConfig::default();
        let mut timers = ManualTimers::default();
        let mut overlays = Overlays::new();

        overlays.open_menu(&mut timers, MenuKind::Audio);
        overlays.close_menu(&mut timers, &config);
        assert!(overlays.menu.closing);
        assert_eq!(overlays.menu.open, Some(MenuKind::Audio));
        fire(&mut overlays, &mut timers, OverlayKind::MenuFade, false);
        assert_eq!(overlays.menu, MenuState::default());

        // Reopening during the fade cancels it.
        overlays.open_menu(&mut timers, MenuKind::Quality);
        overlays.close_menu(&mut timers, &config);
        overlays.open_menu(&mut timers, MenuKind::Subtitles);
        assert!(!overlays.timers().is_pending(OverlayKind::MenuFade));
        assert!(!overlays.menu.closing);
    }

    #[test]
    fn test_reset_clears_every_timer() {
        let config = PlayerConfig::default();
        let mut timers = ManualTimers::default();
        let mut overlays = Overlays::new();
        overlays.flash(&mut timers, &config, Glyph::Pause);
        overlays.ripple(&mut timers, &config, Glyph::Pause, Some((10., 20.)));
        overlays.notice(&mut timers, &config, "Network issue".to_owned());
        overlays.on_paused(&mut timers, &config);
        overlays.reset(&mut timers);
        assert!(timers.pending().is_empty());
        assert_eq!(overlays.timers().pending_count(), 0);
        assert_eq!(overlays.flash, None);
        assert_eq!(overlays.paused_info, PausedInfo::Hidden);
    }
}
