//! Compact (~20 line) terminal health summary.

use std::fmt::Write;
use std::path::Path;

use crate::{
    analysis::{analyze_positions, completeness, detect_data_gaps, sat_counts, SatCounts, TRACKED},
    epoch::{gws_to_timestamp, Session},
    geo::ecef_to_geodetic,
    observation::ParseResult,
    report::{format_date, format_datetime, format_hms, same_date},
};

/// Renders the compact health summary.
pub fn compact_summary(result: &ParseResult, session: &Session, output: Option<&Path>) -> String {
    let mut out = String::new();
    let keys = result.epoch_keys();

    let _ = writeln!(out, "\n=== Base Station Health Report ===");
    let _ = writeln!(out, "File: {}", session.file_name);

    // time span
    if let Some(file_date) = session.file_date {
        let span = if keys.len() >= 2 {
            let start = gws_to_timestamp(keys[0], Some(file_date), session.gps_day);
            let end = gws_to_timestamp(keys[keys.len() - 1], Some(file_date), session.gps_day);
            start.zip(end)
        } else {
            None
        };

        if let Some((start, end)) = span {
            let total = (end - start).to_seconds().round() as i64;
            let (hours, remainder) = (total / 3600, total % 3600);

            let end_fmt = if same_date(start, end) {
                format_hms(end)
            } else {
                format_datetime(end)
            };

            let _ = writeln!(
                out,
                "Date: {}  {} — {} ({}:{:02}:{:02})",
                format_date(start),
                format_hms(start),
                end_fmt,
                hours,
                remainder / 60,
                remainder % 60,
            );
        } else {
            let _ = writeln!(out, "Date: {}", format_date(file_date));
        }
    }

    // position
    if let Some(first) = result.positions.first() {
        let station = first
            .station_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(out, "\nPosition (Station {}):", station);

        if let Some((x, y, z)) = first.ecef() {
            let (lat, lon, height) = ecef_to_geodetic(x, y, z);
            let lat_dir = if lat >= 0.0 { "N" } else { "S" };
            let lon_dir = if lon >= 0.0 { "E" } else { "W" };
            let _ = writeln!(
                out,
                "  {:.8}°{}  {:.8}°{}  {:.2}m (HAE)",
                lat.abs(),
                lat_dir,
                lon.abs(),
                lon_dir,
                height,
            );
        }

        if let Some(height) = first.antenna_height {
            let _ = writeln!(out, "  Antenna height: {} m", height);
        }

        let stability = analyze_positions(&result.positions);
        if stability.num_reports > 0 {
            if stability.stable {
                let _ = writeln!(
                    out,
                    "  STABLE — {:.4}m spread across {} reports",
                    stability.spread_m, stability.num_reports,
                );
            } else {
                let (index, jump_m) = stability.jump.unwrap_or((0, stability.spread_m));
                let _ = writeln!(
                    out,
                    "  MOVED — {:.4}m jump at report ~{}, {} unique positions",
                    jump_m, index, stability.unique_count,
                );
            }
        }
    }

    if result.epochs.is_empty() {
        let _ = writeln!(out, "\nNo observation epochs found.");
        return out;
    }

    // tracking
    let per_epoch: Vec<SatCounts> = result.epochs.values().map(sat_counts).collect();
    let totals: Vec<usize> = per_epoch.iter().map(SatCounts::total).collect();
    let mean_total = totals.iter().sum::<usize>() as f64 / totals.len() as f64;
    let min_total = totals.iter().copied().min().unwrap_or(0);

    let mut active = Vec::new();
    for (constellation, short) in TRACKED {
        let mean = per_epoch.iter().map(|c| c.by(constellation)).sum::<usize>() as f64
            / per_epoch.len() as f64;
        if mean >= 0.5 {
            active.push(format!("{}: {:.0}", short, mean));
        }
    }
    let active = if active.is_empty() {
        "none".to_string()
    } else {
        active.join(", ")
    };
    let _ = writeln!(
        out,
        "\nTracking:  {:.0} mean sats ({} min)  —  {}",
        mean_total, min_total, active,
    );

    // signal
    let cn0: Vec<f64> = result
        .observations_iter()
        .map(|(_, obs)| obs.cn0)
        .filter(|cn0| *cn0 > 0.0)
        .collect();
    if !cn0.is_empty() {
        let mean = cn0.iter().sum::<f64>() / cn0.len() as f64;
        let min = cn0.iter().copied().fold(f64::INFINITY, f64::min);
        let _ = writeln!(out, "Signal:    {:.1} dB-Hz mean, {:.1} min", mean, min);
    }

    // phase
    let _ = writeln!(
        out,
        "Phase:     {} cycle slips across {} satellites",
        result.total_cycle_slips(),
        result.unique_satellites().len(),
    );

    // completeness
    let stats = completeness(&keys);
    let gaps = detect_data_gaps(&keys);
    let _ = writeln!(
        out,
        "Data:      {:.1}% complete ({} missing, {} gaps)",
        stats.percent(),
        stats.missing,
        gaps.len(),
    );

    if let Some(output) = output {
        let _ = writeln!(out, "\nOutput: {}", output.display());
    }
    out.push('\n');

    out
}
