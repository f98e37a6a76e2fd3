//! Full verbose terminal health report.

use std::fmt::Write;
use std::path::Path;

use itertools::Itertools;

use crate::{
    analysis::{
        analyze_positions, completeness, detect_data_gaps, persistently_low_satellites,
        sat_counts, slips_by_satellite, SatCounts, LOW_COVERAGE_SATS, LOW_SNR_THRESHOLD, TRACKED,
    },
    epoch::{gws_to_timestamp, Session},
    geo::ecef_to_geodetic,
    observation::ParseResult,
    report::{format_date, format_hms},
    rtcm::MESSAGE_DESCRIPTIONS,
};

/// Renders the full health report (`--detail` mode).
pub fn detail_summary(result: &ParseResult, session: &Session, output: Option<&Path>) -> String {
    let mut out = String::new();
    let keys = result.epoch_keys();
    let banner = "=".repeat(50);

    let _ = writeln!(out, "\n{}", banner);
    let _ = writeln!(out, "  RTCM3 Base Station Health Report");
    let _ = writeln!(out, "{}", banner);
    let _ = writeln!(out, "  File: {}", session.file_name);
    if let Some(file_date) = session.file_date {
        let _ = writeln!(out, "  Date: {}", format_date(file_date));
    }
    out.push('\n');

    // message inventory
    let _ = writeln!(out, "--- Message Inventory ---");
    let _ = writeln!(out, "  Total messages: {}", result.total_messages);
    for (number, count) in &result.message_counts {
        let mut label = format!("  {}", number);
        if let Some(description) = MESSAGE_DESCRIPTIONS.get(number) {
            label = format!("{} ({})", label, description);
        }
        let _ = writeln!(out, "{:<42}{:>8}", format!("{}:", label), count);
    }
    out.push('\n');

    if result.epochs.is_empty() {
        let _ = writeln!(out, "  No observation epochs found.");
        return out;
    }

    let per_epoch: Vec<SatCounts> = result.epochs.values().map(sat_counts).collect();
    let totals: Vec<usize> = per_epoch.iter().map(SatCounts::total).collect();

    // only constellations that actually showed up
    let active: Vec<(usize, &str)> = TRACKED
        .iter()
        .enumerate()
        .filter(|(_, (constellation, _))| per_epoch.iter().any(|c| c.by(*constellation) > 0))
        .map(|(i, (_, short))| (i, *short))
        .collect();

    // satellite tracking
    let _ = writeln!(out, "--- Satellite Tracking ---");
    let mut header = " ".repeat(17);
    for (_, short) in &active {
        let _ = write!(header, " {:>6}", short);
    }
    header.push_str("  Total");
    let _ = writeln!(out, "{}", header);

    let mean = |values: &[usize]| {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<usize>() as f64 / values.len() as f64
        }
    };

    for stat in ["Mean sats:", "Min sats:", "Max sats:"] {
        let mut line = format!("  {:<15}", stat);
        for (index, _) in &active {
            let values: Vec<usize> = per_epoch.iter().map(|c| c.by(TRACKED[*index].0)).collect();
            match stat {
                "Mean sats:" => {
                    let _ = write!(line, " {:>6.0}", mean(&values));
                },
                "Min sats:" => {
                    let _ = write!(line, " {:>6}", values.iter().min().copied().unwrap_or(0));
                },
                _ => {
                    let _ = write!(line, " {:>6}", values.iter().max().copied().unwrap_or(0));
                },
            }
        }
        match stat {
            "Mean sats:" => {
                let _ = write!(line, "  {:>5.0}", mean(&totals));
            },
            "Min sats:" => {
                let _ = write!(line, "  {:>5}", totals.iter().min().copied().unwrap_or(0));
            },
            _ => {
                let _ = write!(line, "  {:>5}", totals.iter().max().copied().unwrap_or(0));
            },
        }
        let _ = writeln!(out, "{}", line);
    }

    let low_coverage = totals.iter().filter(|t| **t < LOW_COVERAGE_SATS).count();
    let _ = writeln!(out, "  Low coverage (<{} sats) periods: {}", LOW_COVERAGE_SATS, low_coverage);
    out.push('\n');

    // signal quality
    let _ = writeln!(out, "--- Signal Quality ---");
    let cn0: Vec<f64> = result
        .observations_iter()
        .map(|(_, obs)| obs.cn0)
        .filter(|cn0| *cn0 > 0.0)
        .collect();

    if !cn0.is_empty() {
        let mean_snr = cn0.iter().sum::<f64>() / cn0.len() as f64;
        let min_snr = cn0.iter().copied().fold(f64::INFINITY, f64::min);

        let low_epochs = result
            .epochs
            .values()
            .filter(|epoch| {
                epoch
                    .observations
                    .iter()
                    .any(|obs| obs.cn0 > 0.0 && obs.cn0 < LOW_SNR_THRESHOLD)
            })
            .count();

        let _ = writeln!(out, "  Mean SNR:     {:.1} dB-Hz", mean_snr);
        let _ = writeln!(out, "  Min SNR:      {:.1} dB-Hz", min_snr);
        let _ = writeln!(
            out,
            "  Signals < {} dB-Hz:  {} / {} epochs",
            LOW_SNR_THRESHOLD, low_epochs, result.epochs.len(),
        );

        let low_sats = persistently_low_satellites(result);
        if !low_sats.is_empty() {
            let _ = writeln!(
                out,
                "  Persistently low SNR satellites: {}",
                low_sats.iter().map(|sv| sv.to_string()).join(", "),
            );
        }
    }
    out.push('\n');

    // carrier phase health
    let _ = writeln!(out, "--- Carrier Phase Health ---");
    let _ = writeln!(out, "  Total cycle slips: {}", result.total_cycle_slips());

    let slips = slips_by_satellite(result);
    if slips.is_empty() {
        let _ = writeln!(out, "  Affected satellites: none");
    } else {
        let ranked: Vec<_> = slips
            .iter()
            .sorted_by_key(|(sv, count)| (std::cmp::Reverse(**count), **sv))
            .map(|(sv, count)| (*sv, *count))
            .collect();
        let top = ranked
            .iter()
            .take(10)
            .map(|(sv, count)| format!("{} ({})", sv, count))
            .join(", ");

        let mut line = format!("  Affected satellites: {}", top);
        if ranked.len() > 10 {
            let _ = write!(line, " (and {} more)", ranked.len() - 10);
        }
        let _ = writeln!(out, "{}", line);
    }
    out.push('\n');

    // observation completeness
    let _ = writeln!(out, "--- Observation Completeness ---");
    let stats = completeness(&keys);
    let _ = writeln!(out, "  Expected epochs (1 Hz): {}", stats.expected);
    let _ = writeln!(out, "  Actual epochs:          {}", stats.actual);
    let _ = writeln!(
        out,
        "  Missing:                {} ({:.1}%)",
        stats.missing,
        stats.missing_percent(),
    );

    let gaps = detect_data_gaps(&keys);
    let _ = writeln!(out, "  Data gaps: {}", gaps.len());
    for gap in &gaps {
        let start = gws_to_timestamp(gap.start_gws, session.file_date, session.gps_day)
            .map(format_hms)
            .unwrap_or_else(|| gap.start_gws.to_string());
        let end = gws_to_timestamp(gap.end_gws, session.file_date, session.gps_day)
            .map(format_hms)
            .unwrap_or_else(|| gap.end_gws.to_string());
        let _ = writeln!(out, "    {} - {} ({}s)", start, end, gap.duration_sec);
    }
    out.push('\n');

    // base position
    let _ = writeln!(out, "--- Base Position ---");
    if let Some(first) = result.positions.first() {
        let station = first
            .station_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(out, "  Station ID: {}", station);

        if let Some((x, y, z)) = first.ecef() {
            let _ = writeln!(out, "  ECEF X: {:.4} m", x);
            let _ = writeln!(out, "  ECEF Y: {:.4} m", y);
            let _ = writeln!(out, "  ECEF Z: {:.4} m", z);

            let (lat, lon, height) = ecef_to_geodetic(x, y, z);
            let _ = writeln!(out, "  Latitude:  {:.8} deg", lat);
            let _ = writeln!(out, "  Longitude: {:.8} deg", lon);
            let _ = writeln!(out, "  Height:    {:.4} m", height);
        }

        if let Some(height) = first.antenna_height {
            let _ = writeln!(out, "  Antenna height: {} m", height);
        }

        if result.positions.len() > 1 {
            let stability = analyze_positions(&result.positions);
            if stability.num_reports > 0 {
                let label = if stability.spread_m < 0.01 {
                    "stable"
                } else {
                    "variable"
                };
                let _ = writeln!(
                    out,
                    "  Position spread: {:.4} m ({})",
                    stability.spread_m, label,
                );
            }
        }
    } else {
        let _ = writeln!(out, "  No position messages found.");
    }
    out.push('\n');

    if let Some(output) = output {
        let _ = writeln!(out, "Output: {}", output.display());
        out.push('\n');
    }

    out
}
