use serde::{Deserialize, Serialize};

use crate::{
    bindings::TextTrackMode,
    content::{AudioTrackDescriptor, QualityDescriptor, SubtitleTrackDescriptor},
};

/// Label of the automatic quality option, always first in the list.
pub(crate) const AUTO_QUALITY_LABEL: &str = "Auto";

/// Label of the default audio option, always first in the list.
pub(crate) const DEFAULT_AUDIO_LABEL: &str = "Auto / Default";

/// Where a quality option leads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum QualityTarget {
    /// Adaptive selection for an adaptive stream, the descriptor's own URL otherwise.
    Auto,
    /// Index of a level advertised by the adaptive engine.
    Level(usize),
    /// Alternative media URL for native playback.
    Source(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualityOption {
    pub label: String,
    pub target: QualityTarget,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum AudioTrackId {
    /// Whatever the engine or the media element chose by default.
    Default,
    /// Track id advertised by the adaptive engine.
    Engine(u32),
    /// Track id from the content metadata, mapped to a native `AudioTrack`.
    Native(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioOption {
    pub id: AudioTrackId,
    pub display_name: String,
    pub language_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleOption {
    pub language_code: String,
    pub display_label: String,
    pub url: String,
}

/// A quality level as advertised by the adaptive engine after manifest parsing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineLevel {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bitrate: Option<u64>,
}

/// An audio track as advertised by the adaptive engine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineAudioTrack {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "lang")]
    pub language: Option<String>,
}

/// Everything the adaptive engine tells about a parsed manifest.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestInfo {
    pub levels: Vec<EngineLevel>,
    pub audio_tracks: Vec<EngineAudioTrack>,
}

/// Audio, quality and subtitle options available for the current content.
///
/// Quality and audio lists always start with their sentinel option.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCatalog {
    pub quality_options: Vec<QualityOption>,
    pub audio_options: Vec<AudioOption>,
    pub subtitle_options: Vec<SubtitleOption>,
}

impl TrackCatalog {
    /// Catalog built from the content metadata alone, used for native playback and as the
    /// initial state of adaptive playback before the manifest is parsed.
    pub(crate) fn from_metadata(
        qualities: &[QualityDescriptor],
        audio_tracks: &[AudioTrackDescriptor],
        subtitles: &[SubtitleTrackDescriptor],
    ) -> Self {
        let mut quality_options = vec![auto_quality()];
        quality_options.extend(qualities.iter().map(|q| QualityOption {
            label: q.label.clone(),
            target: QualityTarget::Source(q.url.clone()),
        }));
        Self {
            quality_options,
            audio_options: with_default_audio(static_audio_options(audio_tracks)),
            subtitle_options: subtitles
                .iter()
                .map(|s| SubtitleOption {
                    language_code: s.language_code.clone(),
                    display_label: s.label.clone(),
                    url: s.url.clone(),
                })
                .collect(),
        }
    }

    /// Replace quality and audio options by what the adaptive engine advertises.
    ///
    /// Engine audio tracks are only used if there are more than one of them, static
    /// metadata tracks are kept otherwise.
    pub(crate) fn apply_manifest(&mut self, manifest: &ManifestInfo, static_audio: &[AudioTrackDescriptor]) {
        let mut quality_options = vec![auto_quality()];
        quality_options.extend(manifest.levels.iter().enumerate().map(|(idx, level)| {
            QualityOption {
                label: level_label(level, idx),
                target: QualityTarget::Level(idx),
            }
        }));
        self.quality_options = quality_options;
        self.apply_engine_audio_tracks(&manifest.audio_tracks, static_audio);
    }

    pub(crate) fn apply_engine_audio_tracks(
        &mut self,
        tracks: &[EngineAudioTrack],
        static_audio: &[AudioTrackDescriptor],
    ) {
        let options = if tracks.len() > 1 {
            tracks
                .iter()
                .map(|t| AudioOption {
                    id: AudioTrackId::Engine(t.id),
                    display_name: t
                        .name
                        .clone()
                        .or_else(|| t.language.clone())
                        .unwrap_or_else(|| format!("Track {}", t.id)),
                    language_code: t.language.clone(),
                })
                .collect()
        } else {
            static_audio_options(static_audio)
        };
        self.audio_options = with_default_audio(options);
    }

    pub(crate) fn audio_option(&self, id: &AudioTrackId) -> Option<&AudioOption> {
        self.audio_options.iter().find(|a| &a.id == id)
    }

    pub(crate) fn subtitle_label(&self, language: &str) -> Option<&str> {
        self.subtitle_options
            .iter()
            .find(|s| s.language_code == language)
            .map(|s| s.display_label.as_str())
    }

    /// The audio option following `current`, wrapping around.
    ///
    /// The default sentinel is skipped as long as real tracks exist. Returns `None` if
    /// there is nothing to cycle through.
    pub(crate) fn next_audio(&self, current: &AudioTrackId) -> Option<&AudioOption> {
        let real: Vec<&AudioOption> = self
            .audio_options
            .iter()
            .filter(|a| a.id != AudioTrackId::Default)
            .collect();
        if real.is_empty() {
            return None;
        }
        let next_idx = match real.iter().position(|a| &a.id == current) {
            Some(idx) => (idx + 1) % real.len(),
            None => 0,
        };
        real.get(next_idx).copied()
    }
}

fn auto_quality() -> QualityOption {
    QualityOption {
        label: AUTO_QUALITY_LABEL.to_owned(),
        target: QualityTarget::Auto,
    }
}

fn static_audio_options(tracks: &[AudioTrackDescriptor]) -> Vec<AudioOption> {
    tracks
        .iter()
        .map(|t| AudioOption {
            id: AudioTrackId::Native(t.id.clone()),
            display_name: t.display_name.clone(),
            language_code: t.language_code.clone(),
        })
        .collect()
}

fn with_default_audio(mut options: Vec<AudioOption>) -> Vec<AudioOption> {
    options.insert(
        0,
        AudioOption {
            id: AudioTrackId::Default,
            display_name: DEFAULT_AUDIO_LABEL.to_owned(),
            language_code: None,
        },
    );
    options
}

/// Human-readable label of an adaptive level: its resolution if known, else its bitrate,
/// else its index.
pub(crate) fn level_label(level: &EngineLevel, idx: usize) -> String {
    match (level.height, level.bitrate) {
        (Some(height), _) if height > 0 => format!("{height}p"),
        (_, Some(bitrate)) if bitrate > 0 => {
            if bitrate >= 1_000_000 {
                format!("{:.1} Mbps", bitrate as f64 / 1_000_000.)
            } else {
                format!("{} kbps", bitrate / 1000)
            }
        }
        _ => format!("Level {idx}"),
    }
}

/// Decide the mode of every text track of the media element for `language` to be the
/// only one shown.
///
/// `tracks` lists the language of each of the element's text tracks, in order, including
/// the ones added by the adaptive library. The first track with that language is
/// `Showing`, every other one is `Hidden`. `None` hides them all. Applying the result
/// twice leaves exactly one track showing.
pub(crate) fn select_subtitle(tracks: &[String], language: Option<&str>) -> Vec<(usize, TextTrackMode)> {
    let showing = language.and_then(|lang| tracks.iter().position(|t| t == lang));
    (0..tracks.len())
        .map(|idx| {
            if Some(idx) == showing {
                (idx, TextTrackMode::Showing)
            } else {
                (idx, TextTrackMode::Hidden)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtitles(langs: &[&str]) -> Vec<String> {
        langs.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_select_subtitle() {
        let tracks = subtitles(&["en", "fr", "de"]);
        assert_eq!(
            select_subtitle(&tracks, Some("fr")),
            vec![
                (0, TextTrackMode::Hidden),
                (1, TextTrackMode::Showing),
                (2, TextTrackMode::Hidden)
            ]
        );
        assert!(select_subtitle(&tracks, None)
            .iter()
            .all(|(_, m)| *m == TextTrackMode::Hidden));
        assert!(select_subtitle(&tracks, Some("jp"))
            .iter()
            .all(|(_, m)| *m == TextTrackMode::Hidden));
        assert!(select_subtitle(&[], Some("en")).is_empty());
    }

    #[test]
    fn test_select_subtitle_hides_unlisted_tracks() {
        // A closed-caption track added by the adaptive library, without language
        let tracks = subtitles(&["en", "fr", ""]);
        assert_eq!(
            select_subtitle(&tracks, None),
            vec![
                (0, TextTrackMode::Hidden),
                (1, TextTrackMode::Hidden),
                (2, TextTrackMode::Hidden)
            ]
        );
        assert_eq!(
            select_subtitle(&tracks, Some("en"))[2],
            (2, TextTrackMode::Hidden)
        );
    }

    #[test]
    fn test_select_subtitle_is_idempotent() {
        let tracks = subtitles(&["en", "en", "fr"]);
        let first = select_subtitle(&tracks, Some("en"));
        let second = select_subtitle(&tracks, Some("en"));
        assert_eq!(first, second);
        let showing = first
            .iter()
            .filter(|(_, m)| *m == TextTrackMode::Showing)
            .count();
        assert_eq!(showing, 1);
    }

    #[test]
    fn test_level_labels() {
        let hd = EngineLevel {
            width: Some(1920),
            height: Some(1080),
            bitrate: Some(5_000_000),
        };
        assert_eq!(level_label(&hd, 0), "1080p");
        let audio_only = EngineLevel {
            bitrate: Some(640_000),
            ..Default::default()
        };
        assert_eq!(level_label(&audio_only, 1), "640 kbps");
        let high = EngineLevel {
            bitrate: Some(2_500_000),
            ..Default::default()
        };
        assert_eq!(level_label(&high, 1), "2.5 Mbps");
        assert_eq!(level_label(&EngineLevel::default(), 3), "Level 3");
    }

    #[test]
    fn test_manifest_audio_falls_back_to_metadata() {
        let static_audio = vec![AudioTrackDescriptor {
            id: "en".to_owned(),
            display_name: "English".to_owned(),
            language_code: Some("en".to_owned()),
        }];
        let mut catalog = TrackCatalog::from_metadata(&[], &static_audio, &[]);

        let single = ManifestInfo {
            levels: vec![EngineLevel::default()],
            audio_tracks: vec![EngineAudioTrack {
                id: 0,
                name: Some("Main".to_owned()),
                language: None,
            }],
        };
        catalog.apply_manifest(&single, &static_audio);
        assert_eq!(catalog.quality_options.len(), 2);
        assert_eq!(catalog.quality_options[0].target, QualityTarget::Auto);
        assert_eq!(catalog.audio_options.len(), 2);
        assert_eq!(catalog.audio_options[0].display_name, DEFAULT_AUDIO_LABEL);
        assert_eq!(catalog.audio_options[1].id, AudioTrackId::Native("en".to_owned()));

        let multi = ManifestInfo {
            levels: vec![],
            audio_tracks: vec![
                EngineAudioTrack {
                    id: 0,
                    name: Some("English".to_owned()),
                    language: Some("en".to_owned()),
                },
                EngineAudioTrack {
                    id: 1,
                    name: None,
                    language: Some("fr".to_owned()),
                },
            ],
        };
        catalog.apply_manifest(&multi, &static_audio);
        assert_eq!(catalog.audio_options.len(), 3);
        assert_eq!(catalog.audio_options[2].id, AudioTrackId::Engine(1));
        assert_eq!(catalog.audio_options[2].display_name, "fr");
    }

    #[test]
    fn test_next_audio_cycles_real_tracks() {
        let static_audio: Vec<AudioTrackDescriptor> = ["en", "fr"]
            .iter()
            .map(|id| AudioTrackDescriptor {
                id: id.to_string(),
                display_name: id.to_string(),
                language_code: None,
            })
            .collect();
        let catalog = TrackCatalog::from_metadata(&[], &static_audio, &[]);
        let en = AudioTrackId::Native("en".to_owned());
        let fr = AudioTrackId::Native("fr".to_owned());
        assert_eq!(catalog.next_audio(&AudioTrackId::Default).map(|a| &a.id), Some(&en));
        assert_eq!(catalog.next_audio(&en).map(|a| &a.id), Some(&fr));
        assert_eq!(catalog.next_audio(&fr).map(|a| &a.id), Some(&en));

        let empty = TrackCatalog::from_metadata(&[], &[], &[]);
        assert!(empty.next_audio(&AudioTrackId::Default).is_none());
    }

    #[test]
    fn test_manifest_payload_deserialization() {
        let manifest: ManifestInfo = serde_json::from_str(
            r#"{"levels":[{"height":720,"bitrate":2800000},{}],"audioTracks":[{"id":3,"lang":"es"}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.levels.len(), 2);
        assert_eq!(manifest.levels[0].height, Some(720));
        assert_eq!(manifest.audio_tracks[0].language.as_deref(), Some("es"));
    }
}
