//! Epoch aggregation and health statistics.

use std::collections::{BTreeMap, HashMap, HashSet};

use gnss::prelude::{Constellation, SV};
use serde::Serialize;

use crate::{
    epoch::{gws_to_timestamp, Session},
    observation::{is_slip, EpochData, ParseResult},
    report::format_datetime,
};

mod gaps;
mod position;

pub use gaps::{detect_data_gaps, DataGap, GAP_THRESHOLD_SECS};
pub use position::{analyze_positions, PositionStability};

/// Observations below this C/N0 [dB-Hz] count as weak.
pub const LOW_SNR_THRESHOLD: f64 = 35.0;

/// Epochs tracking fewer total satellites count as low coverage.
pub const LOW_COVERAGE_SATS: usize = 5;

/// The constellations this tool breaks out, with their report labels.
pub const TRACKED: [(Constellation, &str); 4] = [
    (Constellation::GPS, "GPS"),
    (Constellation::Glonass, "GLO"),
    (Constellation::Galileo, "GAL"),
    (Constellation::BeiDou, "BDS"),
];

/// Per constellation unique satellite counts within one epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SatCounts {
    pub gps: usize,
    pub glonass: usize,
    pub galileo: usize,
    pub beidou: usize,
}

impl SatCounts {
    pub fn total(&self) -> usize {
        self.gps + self.glonass + self.galileo + self.beidou
    }

    pub fn by(&self, constellation: Constellation) -> usize {
        match constellation {
            Constellation::GPS => self.gps,
            Constellation::Glonass => self.glonass,
            Constellation::Galileo => self.galileo,
            Constellation::BeiDou => self.beidou,
            _ => 0,
        }
    }
}

/// Unique satellites per constellation for one epoch.
pub fn sat_counts(epoch: &EpochData) -> SatCounts {
    let mut gps = HashSet::new();
    let mut glonass = HashSet::new();
    let mut galileo = HashSet::new();
    let mut beidou = HashSet::new();

    for obs in &epoch.observations {
        match obs.sv.constellation {
            Constellation::GPS => gps.insert(obs.sv),
            Constellation::Glonass => glonass.insert(obs.sv),
            Constellation::Galileo => galileo.insert(obs.sv),
            Constellation::BeiDou => beidou.insert(obs.sv),
            _ => false,
        };
    }

    SatCounts {
        gps: gps.len(),
        glonass: glonass.len(),
        galileo: galileo.len(),
        beidou: beidou.len(),
    }
}

/// One line of the per epoch summary table (and CSV row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochRow {
    pub epoch_time_gws: u64,
    pub timestamp: String,
    pub gps_sats: usize,
    pub glonass_sats: usize,
    pub galileo_sats: usize,
    pub beidou_sats: usize,
    pub total_sats: usize,
    pub mean_snr: f64,
    pub min_snr: f64,
    pub low_snr_count: usize,
    pub cycle_slips: u32,
}

/// Materializes the epoch rows, ascending by key.
pub fn build_epoch_rows(result: &ParseResult, session: &Session) -> Vec<EpochRow> {
    result
        .epochs
        .values()
        .map(|epoch| {
            let counts = sat_counts(epoch);

            let cn0: Vec<f64> = epoch
                .observations
                .iter()
                .map(|obs| obs.cn0)
                .filter(|cn0| *cn0 > 0.0)
                .collect();

            let mean_snr = if cn0.is_empty() {
                0.0
            } else {
                cn0.iter().sum::<f64>() / cn0.len() as f64
            };
            let min_snr = cn0.iter().copied().fold(f64::INFINITY, f64::min);
            let min_snr = if min_snr.is_finite() { min_snr } else { 0.0 };

            let timestamp = gws_to_timestamp(epoch.epoch_gws, session.file_date, session.gps_day)
                .map(format_datetime)
                .unwrap_or_default();

            EpochRow {
                epoch_time_gws: epoch.epoch_gws,
                timestamp,
                gps_sats: counts.gps,
                glonass_sats: counts.glonass,
                galileo_sats: counts.galileo,
                beidou_sats: counts.beidou,
                total_sats: counts.total(),
                mean_snr: round1(mean_snr),
                min_snr: round1(min_snr),
                low_snr_count: cn0.iter().filter(|cn0| **cn0 < LOW_SNR_THRESHOLD).count(),
                cycle_slips: epoch.cycle_slips,
            }
        })
        .collect()
}

/// Observation completeness against the nominal 1 Hz rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completeness {
    pub expected: u64,
    pub actual: u64,
    pub missing: u64,
}

impl Completeness {
    pub fn percent(&self) -> f64 {
        if self.expected == 0 {
            100.0
        } else {
            (self.expected - self.missing) as f64 / self.expected as f64 * 100.0
        }
    }

    pub fn missing_percent(&self) -> f64 {
        if self.expected == 0 {
            0.0
        } else {
            self.missing as f64 / self.expected as f64 * 100.0
        }
    }
}

/// Expected vs actual epoch counts over the observed span.
pub fn completeness(keys: &[u64]) -> Completeness {
    let expected = if keys.len() >= 2 {
        keys[keys.len() - 1] - keys[0] + 1
    } else {
        keys.len() as u64
    };
    let actual = keys.len() as u64;

    Completeness {
        expected,
        actual,
        missing: expected.saturating_sub(actual),
    }
}

/// Mean C/N0 per satellite across the whole pass.
pub fn satellite_mean_cn0(result: &ParseResult) -> BTreeMap<SV, f64> {
    let mut sums: BTreeMap<SV, (f64, usize)> = BTreeMap::new();

    for (_, obs) in result.observations_iter() {
        if obs.cn0 > 0.0 {
            let entry = sums.entry(obs.sv).or_insert((0.0, 0));
            entry.0 += obs.cn0;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(sv, (sum, count))| (sv, sum / count as f64))
        .collect()
}

/// Satellites whose mean C/N0 stays below [LOW_SNR_THRESHOLD].
pub fn persistently_low_satellites(result: &ParseResult) -> Vec<SV> {
    satellite_mean_cn0(result)
        .into_iter()
        .filter(|(_, mean)| *mean < LOW_SNR_THRESHOLD)
        .map(|(sv, _)| sv)
        .collect()
}

/// Cycle slip counts per satellite, replayed from the stored
/// observations with the same lock transition rule the parse applied.
pub fn slips_by_satellite(result: &ParseResult) -> HashMap<SV, u32> {
    let mut history: HashMap<(SV, String), f64> = HashMap::new();
    let mut slips: HashMap<SV, u32> = HashMap::new();

    for (_, obs) in result.observations_iter() {
        let key = (obs.sv, obs.signal.clone());
        if let Some(&previous) = history.get(&key) {
            if is_slip(previous, obs.lock_time) {
                *slips.entry(obs.sv).or_insert(0) += 1;
            }
        }
        history.insert(key, obs.lock_time);
    }

    slips
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
