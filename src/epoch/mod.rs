//! Epoch encodings and time normalization.
//!
//! Every observation message family is folded onto a single integer
//! GPS week-seconds (GWS) key. GPS, Galileo and BeiDou share the GPS
//! week time base; GLONASS reports milliseconds of the Moscow day and
//! needs offset removal, day-wrap tracking and the GPS-UTC leap shift.

use std::path::Path;

use hifitime::{Epoch, Unit};

/// GPS-UTC leap seconds (18 as of 2017, still current through 2026)
pub const GPS_LEAP_SECONDS: u64 = 18;

/// GLONASS time offset from UTC (Moscow time = UTC+3) [ms]
pub const GLONASS_UTC_OFFSET_MS: i64 = 3 * 3600 * 1000;

const MS_PER_DAY: i64 = 86_400_000;
const SECONDS_PER_DAY: u64 = 86_400;

/// Converts DF004 (milliseconds into the GPS week) to integer GPS week seconds.
pub fn gps_epoch_ms_to_gws(epoch_ms: u64) -> u64 {
    epoch_ms / 1000
}

/// Converts DF034 (milliseconds of the Moscow day) to integer GPS week seconds.
///
/// `glo_day_count` is the number of GLONASS day wraps observed so far
/// in the stream, tracked by [GlonassDayState].
pub fn glonass_epoch_ms_to_gws(epoch_ms: u64, gps_day: u32, glo_day_count: u32) -> u64 {
    let utc_sod = glonass_utc_sod(epoch_ms) as u64;
    (gps_day as u64 + glo_day_count as u64) * SECONDS_PER_DAY + utc_sod + GPS_LEAP_SECONDS
}

/// UTC seconds of day for a DF034 value. Early Moscow hours wrap into
/// the tail of the previous UTC day.
fn glonass_utc_sod(epoch_ms: u64) -> i64 {
    let mut utc_ms = epoch_ms as i64 - GLONASS_UTC_OFFSET_MS;
    if utc_ms < 0 {
        utc_ms += MS_PER_DAY;
    }
    utc_ms / 1000
}

/// GLONASS day-wrap state: wrap counter plus last observed UTC second
/// of day. Owned by the parse driver, fed by the GLONASS processor only.
#[derive(Debug, Clone, Default)]
pub struct GlonassDayState {
    day_count: u32,
    last_utc_sod: Option<i64>,
}

impl GlonassDayState {
    /// Feeds a new DF034 value through the wrap detector.
    /// The detection is noon anchored: a drop from the afternoon range
    /// to the morning range marks a day boundary, which keeps the
    /// counter robust to jitter right at the wrap.
    pub fn observe(&mut self, epoch_ms: u64) {
        let utc_sod = glonass_utc_sod(epoch_ms);
        if let Some(previous) = self.last_utc_sod {
            if previous > 43_200 && utc_sod < 43_200 {
                self.day_count += 1;
            }
        }
        self.last_utc_sod = Some(utc_sod);
    }

    /// Number of day wraps observed so far.
    pub fn day_count(&self) -> u32 {
        self.day_count
    }
}

/// Analysis session context, derived from the input file name.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Input file name, without directories.
    pub file_name: String,

    /// Session start, from the `_YYYYMMDDHHMMSS` suffix when present.
    pub file_date: Option<Epoch>,

    /// GPS day of week (Sunday = 0) of [Self::file_date], 0 when unknown.
    pub gps_day: u32,
}

impl Session {
    /// Builds the session context for one input log.
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file_date = parse_filename_stamp(&file_name);
        let gps_day = file_date.map(gps_day_of_week).unwrap_or(0);

        Self {
            file_name,
            file_date,
            gps_day,
        }
    }
}

/// Extracts the wall clock stamp from `*_YYYYMMDDHHMMSS.RTCM3` file
/// names (case insensitive, trailing `.gz` tolerated).
pub fn parse_filename_stamp(file_name: &str) -> Option<Epoch> {
    let lower = file_name.to_lowercase();
    let stem = lower.strip_suffix(".gz").unwrap_or(&lower);
    let stem = stem.strip_suffix(".rtcm3")?;

    if stem.len() < 14 {
        return None;
    }

    let stamp = &stem[stem.len() - 14..];
    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = stamp[0..4].parse::<i32>().ok()?;
    let month = stamp[4..6].parse::<u8>().ok()?;
    let day = stamp[6..8].parse::<u8>().ok()?;
    let hour = stamp[8..10].parse::<u8>().ok()?;
    let minute = stamp[10..12].parse::<u8>().ok()?;
    let second = stamp[12..14].parse::<u8>().ok()?;

    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0).ok()
}

/// GPS day of week (Sunday = 0). MJD 0 fell on a Wednesday.
pub fn gps_day_of_week(t: Epoch) -> u32 {
    let mjd = t.to_mjd_utc_days().floor() as i64;
    (mjd + 3).rem_euclid(7) as u32
}

/// Converts a GPS week-seconds key back to wall clock time using the
/// session date. `None` when the date is unknown or the arithmetic
/// leaves the representable range.
pub fn gws_to_timestamp(gws: u64, file_date: Option<Epoch>, gps_day: u32) -> Option<Epoch> {
    let file_date = file_date?;

    let gws = i64::try_from(gws).ok()?;
    let day_offset = (gps_day as i64).checked_mul(SECONDS_PER_DAY as i64)?;
    let seconds = gws
        .checked_sub(day_offset)?
        .checked_sub(GPS_LEAP_SECONDS as i64)?;

    let (y, m, d, _, _, _, _) = file_date.to_gregorian_utc();
    let midnight = Epoch::from_gregorian_utc_at_midnight(y, m, d);

    Some(midnight + (seconds as f64) * Unit::Second)
}

/// Current UTC time from the system clock, for report stamping.
pub fn now_utc() -> Epoch {
    let unix_seconds = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    Epoch::from_unix_seconds(unix_seconds)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn gps_ms_truncation() {
        assert_eq!(gps_epoch_ms_to_gws(0), 0);
        assert_eq!(gps_epoch_ms_to_gws(999), 0);
        assert_eq!(gps_epoch_ms_to_gws(3_600_000), 3_600);
        assert_eq!(gps_epoch_ms_to_gws(3_600_999), 3_600);
    }

    #[test]
    fn glonass_moscow_offset() {
        // 80,000,000 ms of the Moscow day = 69,200 s UTC of day
        assert_eq!(glonass_epoch_ms_to_gws(80_000_000, 0, 0), 69_200 + 18);
        assert_eq!(
            glonass_epoch_ms_to_gws(80_000_000, 5, 0),
            5 * 86_400 + 69_200 + 18
        );
    }

    #[test]
    fn glonass_early_moscow_hours_wrap_backwards() {
        // 01:06:40 Moscow maps into the previous UTC day (22:06:40)
        assert_eq!(glonass_epoch_ms_to_gws(4_000_000, 0, 0), 79_600 + 18);
    }

    #[test]
    fn day_wrap_detection() {
        let mut state = GlonassDayState::default();
        state.observe(89_000_000); // 78,200 s UTC
        assert_eq!(state.day_count(), 0);
        state.observe(14_000_000); // 3,200 s UTC, next day
        assert_eq!(state.day_count(), 1);
        state.observe(15_000_000);
        assert_eq!(state.day_count(), 1);
    }

    #[test]
    fn filename_stamp() {
        let stamp = parse_filename_stamp("TOP_HOUSE_B_base_20260115083000.RTCM3").unwrap();
        assert_eq!(stamp, Epoch::from_gregorian_utc(2026, 1, 15, 8, 30, 0, 0));

        // case insensitive, gz tolerated
        assert!(parse_filename_stamp("base_20260115083000.rtcm3").is_some());
        assert!(parse_filename_stamp("base_20260115083000.RTCM3.gz").is_some());

        // no stamp, bad stamp
        assert!(parse_filename_stamp("base.RTCM3").is_none());
        assert!(parse_filename_stamp("base_2026011508.RTCM3").is_none());
        assert!(parse_filename_stamp("base_20261315083000.RTCM3").is_none());
        assert!(parse_filename_stamp("notes.txt").is_none());
    }

    #[test]
    fn session_context() {
        let session = Session::from_path(&PathBuf::from(
            "/data/TOP_HOUSE_B_base_20260115083000.RTCM3",
        ));
        assert_eq!(session.file_name, "TOP_HOUSE_B_base_20260115083000.RTCM3");
        assert!(session.file_date.is_some());
        // 2026-01-15 is a Thursday
        assert_eq!(session.gps_day, 4);

        let session = Session::from_path(&PathBuf::from("unstamped.RTCM3"));
        assert!(session.file_date.is_none());
        assert_eq!(session.gps_day, 0);
    }

    #[test]
    fn day_of_week() {
        // GPS epoch 1980-01-06 was a Sunday
        assert_eq!(
            gps_day_of_week(Epoch::from_gregorian_utc_at_midnight(1980, 1, 6)),
            0
        );
        assert_eq!(
            gps_day_of_week(Epoch::from_gregorian_utc_at_midnight(2026, 1, 15)),
            4
        );
    }

    #[test]
    fn timestamp_recovery() {
        let file_date = Some(Epoch::from_gregorian_utc(2026, 1, 15, 8, 30, 0, 0));
        let gps_day = 4;

        // midnight of the file date, plus (gws - day*86400 - leap)
        let t = gws_to_timestamp(4 * 86_400 + 30_600 + 18, file_date, gps_day).unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2026, 1, 15, 8, 30, 0, 0));

        assert!(gws_to_timestamp(1234, None, 0).is_none());
    }
}
