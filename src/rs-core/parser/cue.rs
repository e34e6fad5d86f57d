use thiserror::Error;

use crate::utils::url::Url;

/// A time range of the content associated to the image previewing it.
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbnailCue {
    /// Start of the range, in seconds, inclusive.
    pub start: f64,
    /// End of the range, in seconds, exclusive.
    pub end: f64,
    /// Image URL, already resolved against the URL of the cue file.
    pub image: Url,
}

#[derive(Error, Debug, PartialEq)]
pub enum CueParseError {
    #[error("Invalid cue timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Cue starting at {0}s has no image")]
    MissingPayload(f64),
    #[error("No cue found")]
    Empty,
}

/// Ordered list of thumbnail cues, parsed from a WebVTT-like file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThumbnailCues {
    cues: Vec<ThumbnailCue>,
}

impl ThumbnailCues {
    /// Parse the thumbnail cue file `data`, fetched from `source_url`.
    ///
    /// The `WEBVTT` header is optional. Each cue is a `start --> end` timing line
    /// (`HH:MM:SS.mmm` or `MM:SS.mmm`) followed by the image URL on the next non-empty line;
    /// cue identifiers and `NOTE` blocks are skipped.
    pub fn parse(data: &str, source_url: &Url) -> Result<Self, CueParseError> {
        let data = data.strip_prefix('\u{FEFF}').unwrap_or(data);
        let mut lines = data.lines().map(str::trim).peekable();
        if lines.peek().map_or(false, |l| l.starts_with("WEBVTT")) {
            lines.next();
        }

        let mut cues = Vec::new();
        while let Some(line) = lines.next() {
            if line.starts_with("NOTE") {
                for l in lines.by_ref() {
                    if l.is_empty() {
                        break;
                    }
                }
                continue;
            }
            if !line.contains("-->") {
                continue;
            }
            let (start, end) = parse_timing(line)?;
            let payload = lines
                .by_ref()
                .find(|l| !l.is_empty())
                .ok_or(CueParseError::MissingPayload(start))?;
            if payload.contains("-->") {
                return Err(CueParseError::MissingPayload(start));
            }
            cues.push(ThumbnailCue {
                start,
                end,
                image: Url::from_relative(source_url, Url::new(payload.to_owned())),
            });
        }

        if cues.is_empty() {
            return Err(CueParseError::Empty);
        }
        cues.sort_by(|a, b| a.start.total_cmp(&b.start));
        Ok(Self { cues })
    }

    /// The first cue whose `[start, end)` range contains `time`, if one.
    pub fn at(&self, time: f64) -> Option<&ThumbnailCue> {
        self.cues.iter().find(|c| time >= c.start && time < c.end)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }
}

fn parse_timing(line: &str) -> Result<(f64, f64), CueParseError> {
    let (start, rest) = line
        .split_once("-->")
        .ok_or_else(|| CueParseError::InvalidTimestamp(line.to_owned()))?;
    // Cue settings may follow the end timestamp.
    let end = rest.split_whitespace().next().unwrap_or("");
    Ok((parse_timestamp(start.trim())?, parse_timestamp(end)?))
}

/// Parse `HH:MM:SS.mmm` or `MM:SS.mmm` into seconds.
fn parse_timestamp(s: &str) -> Result<f64, CueParseError> {
    let invalid = || CueParseError::InvalidTimestamp(s.to_owned());
    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] => (h.parse::<u64>().map_err(|_| invalid())?, *m, *s),
        _ => return Err(invalid()),
    };
    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    let (secs, millis) = seconds.split_once('.').unwrap_or((seconds, "0"));
    let secs: u64 = secs.parse().map_err(|_| invalid())?;
    if minutes >= 60 || secs >= 60 || millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let millis: u64 = format!("{:0<3}", millis)[..3].parse().map_err(|_| invalid())?;
    let whole_secs = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + secs))
        .ok_or_else(invalid)?;
    Ok(whole_secs as f64 + millis as f64 / 1000.)
}
