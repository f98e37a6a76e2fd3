//! Report rendering: CSV table, terminal summaries, status document.

use hifitime::Epoch;

mod compact;
mod csv;
mod detail;
mod status;

pub use compact::compact_summary;
pub use csv::write_csv;
pub use detail::detail_summary;
pub use status::{GeodeticPosition, Outage, PositionStatus, SatelliteRange, StatusDocument, TimeSpan};

/// `YYYY-MM-DD HH:MM:SS`
pub(crate) fn format_datetime(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = t.to_gregorian_utc();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        y, m, d, hh, mm, ss
    )
}

/// `YYYY-MM-DD`
pub(crate) fn format_date(t: Epoch) -> String {
    let (y, m, d, _, _, _, _) = t.to_gregorian_utc();
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// `HH:MM:SS`
pub(crate) fn format_hms(t: Epoch) -> String {
    let (_, _, _, hh, mm, ss, _) = t.to_gregorian_utc();
    format!("{:02}:{:02}:{:02}", hh, mm, ss)
}

/// `YYYY:MM:DD:HH:MM:SS`, the status document stamp format.
pub(crate) fn format_colon_stamp(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = t.to_gregorian_utc();
    format!(
        "{:04}:{:02}:{:02}:{:02}:{:02}:{:02}",
        y, m, d, hh, mm, ss
    )
}

/// ISO-8601 with the `Z` suffix.
pub(crate) fn format_iso_utc(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = t.to_gregorian_utc();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        y, m, d, hh, mm, ss
    )
}

/// Same calendar day, UTC.
pub(crate) fn same_date(a: Epoch, b: Epoch) -> bool {
    let (ya, ma, da, _, _, _, _) = a.to_gregorian_utc();
    let (yb, mb, db, _, _, _, _) = b.to_gregorian_utc();
    (ya, ma, da) == (yb, mb, db)
}
