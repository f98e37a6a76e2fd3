//! Data gap detection over the epoch timeline.

/// Consecutive epochs farther apart than this many seconds open a gap.
pub const GAP_THRESHOLD_SECS: u64 = 2;

/// A hole in the nominal 1 Hz observation timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataGap {
    /// Last epoch before the hole.
    pub start_gws: u64,

    /// First epoch after the hole.
    pub end_gws: u64,

    /// Spacing between the two [s].
    pub duration_sec: u64,
}

/// Scans ascending epoch keys for spacings above [GAP_THRESHOLD_SECS].
/// Fewer than two keys never gap.
pub fn detect_data_gaps(keys: &[u64]) -> Vec<DataGap> {
    keys.windows(2)
        .filter_map(|pair| {
            let diff = pair[1].saturating_sub(pair[0]);
            (diff > GAP_THRESHOLD_SECS).then_some(DataGap {
                start_gws: pair[0],
                end_gws: pair[1],
                duration_sec: diff,
            })
        })
        .collect()
}
