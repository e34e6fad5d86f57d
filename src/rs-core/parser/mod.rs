mod cue;

pub use cue::ThumbnailCues;
