//! Core observation records collected from one log pass.

use std::collections::{BTreeMap, BTreeSet};

use gnss::prelude::SV;

mod lock;

pub use lock::{LockHistory, LOCK_RESET_MAX, LOCK_STEADY_MIN};

pub(crate) use lock::is_slip;

/// One (satellite, signal) measurement within an epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct CellObservation {
    /// Measured satellite.
    pub sv: SV,

    /// Signal tag: `L1`/`L2` for the legacy bands, MSM cell code otherwise.
    pub signal: String,

    /// Carrier to noise density [dB-Hz], strictly positive.
    pub cn0: f64,

    /// Lock time indicator, non negative.
    pub lock_time: f64,
}

/// Observations sharing one GPS week-seconds key. Duplicate
/// (satellite, signal) pairs are kept as the stream delivered them.
#[derive(Debug, Clone, Default)]
pub struct EpochData {
    /// GPS week seconds, the epoch key.
    pub epoch_gws: u64,

    /// Observation cells, in order of appearance.
    pub observations: Vec<CellObservation>,

    /// Cycle slips detected while filling this epoch.
    pub cycle_slips: u32,
}

impl EpochData {
    pub fn new(epoch_gws: u64) -> Self {
        Self {
            epoch_gws,
            ..Default::default()
        }
    }
}

/// One antenna reference point report (1005/1006).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionReport {
    pub station_id: Option<u16>,
    pub ecef_x: Option<f64>,
    pub ecef_y: Option<f64>,
    pub ecef_z: Option<f64>,

    /// Only carried by the height bearing variant (1006).
    pub antenna_height: Option<f64>,
}

impl PositionReport {
    /// The ECEF triple, when complete.
    pub fn ecef(&self) -> Option<(f64, f64, f64)> {
        Some((self.ecef_x?, self.ecef_y?, self.ecef_z?))
    }
}

/// Everything collected from a single pass over one RTCM3 log.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Epoch buckets keyed by GPS week seconds (ascending iteration).
    pub epochs: BTreeMap<u64, EpochData>,

    /// Antenna reference point reports, in order of appearance.
    pub positions: Vec<PositionReport>,

    /// Message type to occurrence count.
    pub message_counts: BTreeMap<u16, u64>,

    /// Total count of valid frames, processed or not.
    pub total_messages: u64,
}

impl ParseResult {
    /// Existing bucket, or a fresh one for this key.
    pub(crate) fn epoch_mut(&mut self, gws: u64) -> &mut EpochData {
        self.epochs.entry(gws).or_insert_with(|| EpochData::new(gws))
    }

    /// Ascending epoch keys.
    pub fn epoch_keys(&self) -> Vec<u64> {
        self.epochs.keys().copied().collect()
    }

    /// Iterates all stored observations in ascending epoch order.
    pub fn observations_iter(&self) -> Box<dyn Iterator<Item = (u64, &CellObservation)> + '_> {
        Box::new(self.epochs.values().flat_map(|epoch| {
            epoch
                .observations
                .iter()
                .map(move |obs| (epoch.epoch_gws, obs))
        }))
    }

    /// Distinct satellites with at least one observation.
    pub fn unique_satellites(&self) -> BTreeSet<SV> {
        self.observations_iter().map(|(_, obs)| obs.sv).collect()
    }

    /// Cycle slips summed over all epochs.
    pub fn total_cycle_slips(&self) -> u64 {
        self.epochs
            .values()
            .map(|epoch| epoch.cycle_slips as u64)
            .sum()
    }
}
