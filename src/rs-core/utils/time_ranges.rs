/// Represent a range of time, from a start to an end, generally in seconds
#[derive(Clone, Debug, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

/// Abstracts non-contiguous chronological ranges of time, generally expressed in seconds,
/// such as the `buffered` attribute of an HTMLMediaElement.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TimeRanges {
    ranges: Vec<TimeRange>,
}

impl TimeRanges {
    /// Build a `TimeRanges` from the flattened `[start0, end0, start1, end1, ...]` form the
    /// JavaScript-side sends.
    ///
    /// A trailing unpaired value is ignored, as are ranges whose end is before their start.
    pub(crate) fn from_flat(flat: &[f64]) -> Self {
        let ranges = flat
            .chunks_exact(2)
            .filter(|pair| pair[1] >= pair[0])
            .map(|pair| TimeRange {
                start: pair[0],
                end: pair[1],
            })
            .collect();
        Self { ranges }
    }

    /// Returns the end of the last non-empty range, which is the furthest point buffered.
    ///
    /// Returns `None` if no such range is known.
    pub(crate) fn last_end(&self) -> Option<f64> {
        self.ranges
            .iter()
            .rev()
            .find(|r| r.end > r.start)
            .map(|r| r.end)
    }
}
