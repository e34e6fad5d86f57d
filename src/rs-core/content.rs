use serde::Deserialize;
use thiserror::Error;

use crate::utils::url::Url;

/// Error returned when the content descriptor given by the JavaScript-side is not usable.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Invalid content descriptor: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Content descriptor has an empty `{0}`")]
    EmptyField(&'static str),
}

/// Everything the player knows about a content before loading it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentDescriptor {
    pub id: String,
    pub title: String,
    pub media_url: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub subtitle_tracks: Vec<SubtitleTrackDescriptor>,
    #[serde(default)]
    pub audio_tracks: Vec<AudioTrackDescriptor>,
    /// Alternative renditions for native playback. Ignored for adaptive streams, whose
    /// qualities come from the manifest.
    #[serde(default)]
    pub quality_options: Vec<QualityDescriptor>,
    #[serde(default)]
    pub thumbnail_cue_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub series_info: Option<SeriesInfo>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTrackDescriptor {
    #[serde(alias = "language", alias = "srclang")]
    pub language_code: String,
    pub label: String,
    #[serde(alias = "src")]
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrackDescriptor {
    pub id: String,
    #[serde(alias = "label")]
    pub display_name: String,
    #[serde(default, alias = "language")]
    pub language_code: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityDescriptor {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    #[serde(default)]
    pub series_title: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub episode_title: Option<String>,
}

impl ContentDescriptor {
    pub fn from_json(data: &str) -> Result<Self, DescriptorError> {
        let descriptor: ContentDescriptor = serde_json::from_str(data)?;
        if descriptor.id.trim().is_empty() {
            return Err(DescriptorError::EmptyField("id"));
        }
        if descriptor.media_url.trim().is_empty() {
            return Err(DescriptorError::EmptyField("mediaUrl"));
        }
        Ok(descriptor)
    }

    pub(crate) fn media_url(&self) -> Url {
        Url::new(self.media_url.clone())
    }

    /// Subtitle line shown under the title in the paused-info overlay, e.g. `S1:E4 Pilot`.
    pub(crate) fn episode_label(&self) -> Option<String> {
        let info = self.series_info.as_ref()?;
        let numbering = match (info.season, info.episode) {
            (Some(s), Some(e)) => Some(format!("S{s}:E{e}")),
            (None, Some(e)) => Some(format!("E{e}")),
            _ => None,
        };
        match (numbering, info.episode_title.as_deref()) {
            (Some(n), Some(t)) => Some(format!("{n} {t}")),
            (Some(n), None) => Some(n),
            (None, Some(t)) => Some(t.to_owned()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = ContentDescriptor::from_json(
            r#"{
                "id": "ep-4",
                "title": "The Show",
                "mediaUrl": "https://cdn.test/show/ep4/master.m3u8",
                "posterUrl": "https://cdn.test/show/ep4.jpg",
                "subtitleTracks": [{"language": "en", "label": "English", "src": "en.vtt"}],
                "audioTracks": [{"id": "fr", "label": "Français", "languageCode": "fr"}],
                "thumbnailCueUrl": "https://cdn.test/show/ep4/thumbs.vtt",
                "year": 2021,
                "seriesInfo": {"season": 1, "episode": 4, "episodeTitle": "Pilot"}
            }"#,
        )
        .unwrap();
        assert!(descriptor.media_url().is_adaptive_manifest());
        assert_eq!(descriptor.subtitle_tracks[0].language_code, "en");
        assert_eq!(descriptor.subtitle_tracks[0].url, "en.vtt");
        assert_eq!(descriptor.audio_tracks[0].display_name, "Français");
        assert!(descriptor.quality_options.is_empty());
        assert_eq!(descriptor.episode_label().as_deref(), Some("S1:E4 Pilot"));
    }

    #[test]
    fn test_reject_unusable_descriptor() {
        assert!(matches!(
            ContentDescriptor::from_json(r#"{"id": "a", "title": "A"}"#),
            Err(DescriptorError::InvalidJson(_))
        ));
        assert!(matches!(
            ContentDescriptor::from_json(r#"{"id": " ", "title": "A", "mediaUrl": "a.mp4"}"#),
            Err(DescriptorError::EmptyField("id"))
        ));
        assert!(matches!(
            ContentDescriptor::from_json(r#"{"id": "a", "title": "A", "mediaUrl": ""}"#),
            Err(DescriptorError::EmptyField("mediaUrl"))
        ));
    }
}
