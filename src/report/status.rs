//! Machine readable session status, written next to the input log.

use std::{fs::File, path::Path};

use hifitime::Epoch;
use serde::Serialize;

use crate::{
    analysis::{analyze_positions, detect_data_gaps, sat_counts},
    epoch::{gws_to_timestamp, Session},
    error::Error,
    geo::ecef_to_geodetic,
    observation::ParseResult,
    report::{format_colon_stamp, format_iso_utc},
};

/// Session status document.
#[derive(Debug, Clone, Serialize)]
pub struct StatusDocument {
    pub file: String,
    pub generated_utc: String,
    pub time_span: Option<TimeSpan>,
    pub position: Option<PositionStatus>,
    pub satellites: Option<SatelliteRange>,
    pub outages: Vec<Outage>,
}

/// Observed span, stamps in `YYYY:MM:DD:HH:MM:SS`.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSpan {
    pub start: String,
    pub end: String,
    pub duration_sec: u64,
}

/// Base position verdict with the initial and final fixes.
#[derive(Debug, Clone, Serialize)]
pub struct PositionStatus {
    pub status: String,
    pub spread_m: f64,
    pub position_init: GeodeticPosition,
    pub position_final: GeodeticPosition,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeodeticPosition {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub height_hae_m: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SatelliteRange {
    pub min: usize,
    pub max: usize,
}

/// One observation outage, bounds in `YYYY:MM:DD:HH:MM:SS` when the
/// session date is known, raw GWS keys otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct Outage {
    pub start: String,
    pub end: String,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn geodetic(ecef: (f64, f64, f64)) -> GeodeticPosition {
    let (lat, lon, height) = ecef_to_geodetic(ecef.0, ecef.1, ecef.2);
    GeodeticPosition {
        lat_deg: round_to(lat, 8),
        lon_deg: round_to(lon, 8),
        height_hae_m: round_to(height, 2),
    }
}

impl StatusDocument {
    /// Builds the status document for one completed pass.
    pub fn new(result: &ParseResult, session: &Session, generated: Epoch) -> Self {
        let keys = result.epoch_keys();

        let time_span = match (keys.first(), keys.last()) {
            (Some(&first), Some(&last)) => {
                let start = gws_to_timestamp(first, session.file_date, session.gps_day);
                let end = gws_to_timestamp(last, session.file_date, session.gps_day);
                start.zip(end).map(|(start, end)| TimeSpan {
                    start: format_colon_stamp(start),
                    end: format_colon_stamp(end),
                    duration_sec: last - first,
                })
            },
            _ => None,
        };

        let position = {
            let complete: Vec<(f64, f64, f64)> = result
                .positions
                .iter()
                .filter_map(|report| report.ecef())
                .collect();

            complete.first().zip(complete.last()).map(|(first, last)| {
                let stability = analyze_positions(&result.positions);
                PositionStatus {
                    status: if stability.stable { "STABLE" } else { "MOVED" }.to_string(),
                    spread_m: round_to(stability.spread_m, 4),
                    position_init: geodetic(*first),
                    position_final: geodetic(*last),
                }
            })
        };

        let satellites = if keys.is_empty() {
            None
        } else {
            let totals: Vec<usize> = result
                .epochs
                .values()
                .map(|epoch| sat_counts(epoch).total())
                .collect();
            Some(SatelliteRange {
                min: totals.iter().copied().min().unwrap_or(0),
                max: totals.iter().copied().max().unwrap_or(0),
            })
        };

        let outages = detect_data_gaps(&keys)
            .iter()
            .map(|gap| {
                let stamp = |gws: u64| {
                    gws_to_timestamp(gws, session.file_date, session.gps_day)
                        .map(format_colon_stamp)
                        .unwrap_or_else(|| gws.to_string())
                };
                Outage {
                    start: stamp(gap.start_gws),
                    end: stamp(gap.end_gws),
                }
            })
            .collect();

        Self {
            file: session.file_name.clone(),
            generated_utc: format_iso_utc(generated),
            time_span,
            position,
            satellites,
            outages,
        }
    }

    /// Serializes to pretty printed JSON at `path`.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let fd = File::create(path)?;
        serde_json::to_writer_pretty(fd, self)?;
        Ok(())
    }

    /// JSON rendering.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::observation::{CellObservation, PositionReport};
    use gnss::prelude::{Constellation, SV};

    #[test]
    fn empty_pass() {
        let result = ParseResult::default();
        let session = Session::default();
        let generated = Epoch::from_gregorian_utc(2026, 1, 16, 0, 5, 0, 0);

        let status = StatusDocument::new(&result, &session, generated);
        assert_eq!(status.generated_utc, "2026-01-16T00:05:00Z");
        assert!(status.time_span.is_none());
        assert!(status.position.is_none());
        assert!(status.satellites.is_none());
        assert!(status.outages.is_empty());

        let json = status.to_json().unwrap();
        assert!(json.contains("\"time_span\": null"));
        assert!(json.contains("\"position\": null"));
    }

    #[test]
    fn populated_pass() {
        let mut result = ParseResult::default();
        for gws in [4 * 86_400 + 100, 4 * 86_400 + 101, 4 * 86_400 + 110] {
            let epoch = result.epoch_mut(gws);
            epoch.observations.push(CellObservation {
                sv: SV::new(Constellation::GPS, 3),
                signal: "L1".to_string(),
                cn0: 44.0,
                lock_time: 50.0,
            });
        }
        result.positions.push(PositionReport {
            station_id: Some(2003),
            ecef_x: Some(-1288398.57),
            ecef_y: Some(-4721696.931),
            ecef_z: Some(4078625.3467),
            antenna_height: None,
        });

        let session = Session {
            file_name: "base_20260115083000.RTCM3".to_string(),
            file_date: Some(Epoch::from_gregorian_utc(2026, 1, 15, 8, 30, 0, 0)),
            gps_day: 4,
        };

        let status = StatusDocument::new(&result, &session, Epoch::from_gregorian_utc(2026, 1, 16, 0, 0, 0, 0));

        let span = status.time_span.unwrap();
        assert_eq!(span.duration_sec, 10);
        // gws 4*86400+100 - 4*86400 - 18 = 82 s past midnight
        assert_eq!(span.start, "2026:01:15:00:01:22");

        let position = status.position.unwrap();
        assert_eq!(position.status, "STABLE");
        assert_eq!(position.spread_m, 0.0);
        assert!((position.position_init.lat_deg - 39.99506637).abs() < 1e-6);
        assert!((position.position_init.height_hae_m - 1648.35).abs() < 0.01);

        let satellites = status.satellites.unwrap();
        assert_eq!(satellites.min, 1);
        assert_eq!(satellites.max, 1);

        assert_eq!(status.outages.len(), 1);
        assert_eq!(status.outages[0].start, "2026:01:15:00:01:23");
    }
}
