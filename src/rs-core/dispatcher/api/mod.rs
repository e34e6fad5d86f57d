use crate::{host::Environment, overlays::MenuKind, wasm_bindgen, Logger};

use super::Dispatcher;

/// Methods exposed to the JavaScript-side.
///
/// Note that these are not the only methods callable by JavaScript. There's
/// also "event_listeners" which as its name point at, should be called when particular
/// events happen. Such "event_listeners" are defined in its own file.
#[wasm_bindgen]
impl Dispatcher {
    /// Create a new `Dispatcher` driving the HTMLMediaElement and player surface linked to
    /// it on the JavaScript-side.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Logger::install();
        Self::with_environment(Environment::js())
    }

    /// Start loading a new content, described by a JSON `ContentDescriptor`.
    ///
    /// The previous content, if any, is entirely torn down first. Loading the content
    /// currently loaded does nothing.
    pub fn load_content(&mut self, descriptor: &str) {
        self.load_content_core(descriptor);
        self.render();
    }

    /// Load the current content again from scratch.
    pub fn reload(&mut self) {
        self.reload_core();
        self.render();
    }

    /// Release every resource of the player. Nothing is rendered anymore afterwards.
    pub fn unmount(&mut self) {
        self.unmount_core();
    }

    pub fn toggle_play(&mut self) {
        self.toggle_play_core(None);
        self.render();
    }

    /// Seek to `position`, in seconds. Out-of-bounds positions are clamped.
    pub fn seek(&mut self, position: f64) {
        self.seek_core(position);
        self.render();
    }

    /// Update the volume, from `0` to `1`. A volume of `0` also mutes.
    pub fn set_volume(&mut self, volume: f64) {
        self.set_volume_core(volume);
        self.render();
    }

    pub fn toggle_mute(&mut self) {
        self.toggle_mute_core();
        self.render();
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        self.set_playback_rate_core(rate);
        self.render();
    }

    /// Select the quality at `index` in the last rendered `quality_options`.
    pub fn select_quality(&mut self, index: usize) {
        self.select_quality_core(index);
        self.render();
    }

    /// Select the audio track at `index` in the last rendered `audio_options`.
    pub fn select_audio_track(&mut self, index: usize) {
        self.select_audio_core(index);
        self.render();
    }

    /// Show subtitles in the given language, or hide them if `None`.
    pub fn select_subtitle(&mut self, language: Option<String>) {
        self.select_subtitle_core(language);
        self.render();
    }

    pub fn open_menu(&mut self, menu: MenuKind) {
        self.open_menu_core(menu);
        self.render();
    }

    pub fn close_menu(&mut self) {
        self.close_menu_core();
        self.render();
    }

    /// Close the open menu if one, or the whole player if none.
    pub fn close(&mut self) {
        self.close_core();
        self.render();
    }

    /// Play the content again from its start, typically from the resume overlay.
    pub fn restart(&mut self) {
        self.restart_core();
        self.render();
    }

    pub fn dismiss_error(&mut self) {
        self.dismiss_error_core();
        self.render();
    }

    pub fn dismiss_up_next(&mut self) {
        self.dismiss_up_next_core();
        self.render();
    }

    pub fn confirm_up_next(&mut self) {
        self.confirm_up_next_core();
        self.render();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.env.surface.toggle_fullscreen();
    }

    pub fn request_picture_in_picture(&mut self) {
        self.request_picture_in_picture_core();
    }

    pub fn set_controls_hide_delay(&mut self, delay: f64) {
        self.config.controls_hide_delay = delay;
    }

    pub fn set_flash_duration(&mut self, duration: f64) {
        self.config.flash_duration = duration;
    }

    pub fn set_cursor_ripple_duration(&mut self, duration: f64) {
        self.config.cursor_ripple_duration = duration;
    }

    pub fn set_volume_hud_duration(&mut self, duration: f64) {
        self.config.volume_hud_duration = duration;
    }

    pub fn set_language_hud_duration(&mut self, duration: f64) {
        self.config.language_hud_duration = duration;
    }

    pub fn set_paused_info_delay(&mut self, delay: f64) {
        self.config.paused_info_delay = delay;
    }

    pub fn set_paused_info_rearm_delay(&mut self, delay: f64) {
        self.config.paused_info_rearm_delay = delay;
    }

    pub fn set_notice_duration(&mut self, duration: f64) {
        self.config.notice_duration = duration;
    }

    pub fn set_menu_fade_duration(&mut self, duration: f64) {
        self.config.menu_fade_duration = duration;
    }

    pub fn set_tap_guard_interval(&mut self, interval: f64) {
        self.config.tap_guard_interval = interval;
    }

    pub fn set_heartbeat_interval(&mut self, interval: f64) {
        self.config.heartbeat_interval = interval;
    }

    pub fn set_keyboard_seek_step(&mut self, step: f64) {
        self.config.keyboard_seek_step = step;
    }

    pub fn set_double_click_seek_step(&mut self, step: f64) {
        self.config.double_click_seek_step = step;
    }

    pub fn set_volume_step(&mut self, step: f64) {
        self.config.volume_step = step;
    }

    pub fn set_unmute_fallback_volume(&mut self, volume: f64) {
        self.config.unmute_fallback_volume = volume.clamp(0., 1.);
    }

    /// Update the amount of streaming errors of each class tolerated before giving up.
    /// Errors already counted are kept.
    pub fn set_max_recoveries(&mut self, network: u32, media: u32) {
        self.config.max_network_recoveries = network;
        self.config.max_media_recoveries = media;
        self.recovery.update_budget(network, media);
    }

    pub fn set_volume_icon_thresholds(&mut self, low: f64, medium: f64) {
        self.config.volume_icon_thresholds = (low, medium);
        self.render();
    }

    pub fn set_autoplay_next(&mut self, autoplay_next: bool) {
        self.config.autoplay_next = autoplay_next;
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
