//! Base position stability over a session's ARP reports.

use crate::observation::PositionReport;

use std::collections::HashSet;

/// Position stability verdict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionStability {
    /// All reports collapse onto one rounded coordinate.
    pub stable: bool,

    /// Distinct coordinates at 0.1 mm resolution.
    pub unique_count: usize,

    /// Bounding box diagonal over the raw coordinates [m].
    pub spread_m: f64,

    /// Reports carrying a complete ECEF triple.
    pub num_reports: usize,

    /// Index and distance [m] of the first report departing from the
    /// initial coordinate. Only set when unstable.
    pub jump: Option<(usize, f64)>,
}

/// 0.1 mm resolution key: float coordinates are deduplicated on their
/// scaled integer images, never on raw float equality.
fn rounded_key(coord: (f64, f64, f64)) -> (i64, i64, i64) {
    (
        (coord.0 * 1.0e4).round() as i64,
        (coord.1 * 1.0e4).round() as i64,
        (coord.2 * 1.0e4).round() as i64,
    )
}

fn distance(a: (f64, f64, f64), b: (f64, f64, f64)) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2) + (b.2 - a.2).powi(2)).sqrt()
}

/// Detects whether the base station moved during the session.
/// Reports with incomplete ECEF triples are ignored.
pub fn analyze_positions(reports: &[PositionReport]) -> PositionStability {
    let coords: Vec<(f64, f64, f64)> = reports.iter().filter_map(PositionReport::ecef).collect();

    if coords.is_empty() {
        return PositionStability {
            stable: true,
            ..Default::default()
        };
    }

    let unique: HashSet<(i64, i64, i64)> = coords.iter().map(|c| rounded_key(*c)).collect();

    let first = coords[0];
    let (mut min, mut max) = (first, first);
    for c in &coords {
        min = (min.0.min(c.0), min.1.min(c.1), min.2.min(c.2));
        max = (max.0.max(c.0), max.1.max(c.1), max.2.max(c.2));
    }
    let spread_m = distance(min, max);

    let mut stability = PositionStability {
        stable: unique.len() == 1,
        unique_count: unique.len(),
        spread_m,
        num_reports: coords.len(),
        jump: None,
    };

    if unique.len() > 1 {
        let first_key = rounded_key(first);
        for (index, c) in coords.iter().enumerate().skip(1) {
            if rounded_key(*c) != first_key {
                stability.jump = Some((index, distance(first, *c)));
                break;
            }
        }
    }

    stability
}

#[cfg(test)]
mod test {
    use super::analyze_positions;
    use crate::observation::PositionReport;

    fn report(x: f64, y: f64, z: f64) -> PositionReport {
        PositionReport {
            station_id: Some(2003),
            ecef_x: Some(x),
            ecef_y: Some(y),
            ecef_z: Some(z),
            antenna_height: None,
        }
    }

    #[test]
    fn identical_reports_are_stable() {
        let reports = vec![
            report(1234567.1234, 2345678.2345, 3456789.3456),
            report(1234567.1234, 2345678.2345, 3456789.3456),
            report(1234567.1234, 2345678.2345, 3456789.3456),
        ];

        let stability = analyze_positions(&reports);
        assert!(stability.stable);
        assert_eq!(stability.unique_count, 1);
        assert_eq!(stability.spread_m, 0.0);
        assert_eq!(stability.num_reports, 3);
        assert!(stability.jump.is_none());
    }

    #[test]
    fn sub_resolution_noise_is_stable() {
        let reports = vec![
            report(1234567.12341, 0.0, 0.0),
            report(1234567.12339, 0.0, 0.0),
        ];

        let stability = analyze_positions(&reports);
        assert!(stability.stable);
        assert_eq!(stability.unique_count, 1);
        assert!(stability.spread_m < 1e-4);
    }

    #[test]
    fn antenna_move_detected() {
        let reports = vec![
            report(1000.0, 2000.0, 3000.0),
            report(1000.5, 2000.0, 3000.0),
        ];

        let stability = analyze_positions(&reports);
        assert!(!stability.stable);
        assert_eq!(stability.unique_count, 2);
        assert!((stability.spread_m - 0.5).abs() < 1e-9);

        let (index, dist) = stability.jump.unwrap();
        assert_eq!(index, 1);
        assert!((dist - 0.5).abs() < 1e-9);
    }

    #[test]
    fn incomplete_reports_dropped() {
        let incomplete = PositionReport {
            station_id: Some(2003),
            ecef_x: Some(1.0),
            ecef_y: None,
            ecef_z: Some(3.0),
            antenna_height: None,
        };

        let stability = analyze_positions(&[incomplete]);
        assert!(stability.stable);
        assert_eq!(stability.num_reports, 0);
        assert_eq!(stability.unique_count, 0);
    }
}
