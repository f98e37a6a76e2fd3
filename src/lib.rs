//! RTCM3 base station log analysis and daily health reporting.
//!
//! This crate ingests binary RTCM3 correction logs produced by a GNSS
//! base station and derives a per-epoch observation quality table plus
//! structured health reports: time coverage, satellite tracking,
//! signal quality, carrier phase integrity, observation completeness
//! and base position stability.
//!
//! Both the legacy observation messages (1001-1004, 1009-1012) and the
//! modern MSM7 messages (1077, 1087, 1097, 1127) are supported, along
//! with the station coordinate messages (1005/1006).
//!
//! ```no_run
//! use rtcm_health::prelude::*;
//!
//! let path = std::path::Path::new("TOP_HOUSE_B_base_20260115083000.RTCM3");
//! let session = Session::from_path(path);
//! let result = ParseResult::from_file(path).unwrap();
//!
//! let rows = build_epoch_rows(&result, &session);
//! println!("{}", compact_summary(&result, &session, None));
//! ```

extern crate gnss_rs as gnss;

pub mod analysis;
pub mod epoch;
pub mod geo;
pub mod observation;
pub mod report;
pub mod rtcm;

mod error;
mod parse;

pub mod prelude;

#[cfg(test)]
mod tests;

pub use error::Error;
