//! MSM7 observation processor (1077/1087/1097/1127).

use std::str::FromStr;

use gnss::prelude::{Constellation, SV};
use log::warn;

use super::ParseContext;
use crate::{
    epoch::gps_epoch_ms_to_gws,
    observation::{CellObservation, ParseResult},
    rtcm::{MessageFields, Value},
};

pub(crate) fn process(
    msg: &MessageFields,
    constellation: Constellation,
    result: &mut ParseResult,
    ctx: &mut ParseContext,
) {
    // GLONASS MSM keys its epoch as day + milliseconds of the Moscow
    // day instead; those messages are counted but not epoch-keyed.
    let Some(epoch_ms) = msg.int("DF004").and_then(|ms| u64::try_from(ms).ok()) else {
        return;
    };

    let ncell = msg.int("NCell").unwrap_or(0);
    if ncell <= 0 {
        return;
    }

    let gws = gps_epoch_ms_to_gws(epoch_ms);
    let epoch = result.epoch_mut(gws);

    for i in 1..=ncell as usize {
        let Some(sv) = cell_sv(msg, constellation, i) else {
            continue;
        };

        let Some(cn0) = msg.float_at("DF408", i) else {
            continue;
        };
        if cn0 <= 0.0 {
            continue;
        }

        let signal = msg.text_at("CELLSIG", i).unwrap_or("").to_string();

        let lock_time = msg.float_at("DF407", i);
        if let Some(lock) = lock_time {
            if ctx.locks.check_slip(sv, &signal, lock) {
                epoch.cycle_slips += 1;
            }
        }

        epoch.observations.push(CellObservation {
            sv,
            signal,
            cn0,
            lock_time: lock_time.unwrap_or(0.0),
        });
    }
}

/// Cell satellite identity. Numeric cells carry the bare PRN and get
/// the constellation attached. Textual cells are taken as delivered:
/// a full SV designation ("G05"), a bare slot number ("012"), or, for
/// anything else, a best-effort slot 0 under the message constellation
/// so the observation is never discarded on its identity alone.
fn cell_sv(msg: &MessageFields, constellation: Constellation, index: usize) -> Option<SV> {
    match msg.field("CELLPRN", index)? {
        Value::Int(prn) => u8::try_from(*prn).ok().map(|prn| SV::new(constellation, prn)),
        Value::Text(text) => {
            let text = text.trim();
            if let Ok(sv) = SV::from_str(text) {
                return Some(sv);
            }
            if let Ok(prn) = text.parse::<u8>() {
                return Some(SV::new(constellation, prn));
            }
            warn!("unrecognized cell PRN \"{}\", kept under {}", text, constellation);
            Some(SV::new(constellation, 0))
        },
        Value::Float(_) => None,
    }
}
