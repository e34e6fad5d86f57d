use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::host::KeyValueStore;

const STORAGE_KEY_PREFIX: &str = "wasp-player:prefs:";

/// Error encountered when reading or writing persisted preferences.
///
/// Those are never surfaced to the user: callers log them and fall back to defaults.
#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Storage unavailable: {0}")]
    Storage(String),
    #[error("Stored preferences are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Stored preferences are not a JSON object")]
    NotAnObject,
}

/// User playback preferences, stored per content.
///
/// Every field is optional: an absent field leaves the corresponding setting untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<f64>,

    /// `Some(None)` means subtitles were explicitly turned off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_subtitle_language: Option<Option<String>>,
}

impl PersistedPreferences {
    /// Parse a stored record.
    ///
    /// Keys are validated one by one, so that a single malformed value doesn't discard
    /// the others.
    pub fn from_json(data: &str) -> Result<Self, PreferencesError> {
        let value: Value = serde_json::from_str(data)?;
        let obj = value.as_object().ok_or(PreferencesError::NotAnObject)?;

        let volume = obj
            .get("volume")
            .and_then(Value::as_f64)
            .filter(|v| (0. ..=1.).contains(v));
        let playback_rate = obj
            .get("playbackRate")
            .and_then(Value::as_f64)
            .filter(|r| r.is_finite() && *r > 0.);
        let active_subtitle_language = match obj.get("activeSubtitleLanguage") {
            Some(Value::Null) => Some(None),
            Some(Value::String(lang)) => Some(Some(lang.clone())),
            _ => None,
        };
        Ok(Self {
            volume,
            playback_rate,
            active_subtitle_language,
        })
    }
}

fn storage_key(content_id: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{content_id}")
}

/// Read the preferences stored for `content_id`.
///
/// Missing or malformed data is logged and replaced by empty preferences: this never fails.
pub(crate) fn load(store: &dyn KeyValueStore, content_id: &str) -> PersistedPreferences {
    let key = storage_key(content_id);
    match store.get(&key) {
        Ok(None) => PersistedPreferences::default(),
        Ok(Some(raw)) => PersistedPreferences::from_json(&raw).unwrap_or_else(|e| {
            log::warn!("Preferences: ignoring stored preferences for {}: {}", content_id, e);
            PersistedPreferences::default()
        }),
        Err(e) => {
            log::warn!("Preferences: could not read {}: {}", key, e);
            PersistedPreferences::default()
        }
    }
}

/// Write the preferences for `content_id`, replacing whatever was stored.
///
/// Failures are only logged.
pub(crate) fn save(store: &mut dyn KeyValueStore, content_id: &str, prefs: &PersistedPreferences) {
    let key = storage_key(content_id);
    let res = serde_json::to_string(prefs)
        .map_err(PreferencesError::from)
        .and_then(|data| store.set(&key, &data));
    if let Err(e) = res {
        log::warn!("Preferences: could not persist {}: {}", key, e);
    }
}
