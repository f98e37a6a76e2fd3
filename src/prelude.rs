//! Most commonly needed types and operations.

pub use crate::{
    analysis::{
        analyze_positions, build_epoch_rows, completeness, detect_data_gaps, sat_counts,
        DataGap, EpochRow, PositionStability, SatCounts,
    },
    epoch::{gws_to_timestamp, now_utc, Session},
    error::Error,
    geo::{ecef_to_geodetic, geodetic_to_ecef},
    observation::{CellObservation, EpochData, LockHistory, ParseResult, PositionReport},
    report::{compact_summary, detail_summary, write_csv, StatusDocument},
    rtcm::{Frames, MessageFields, MessageKind, Value},
};

pub use gnss::prelude::{Constellation, SV};

pub use hifitime::{Duration, Epoch, Unit};
