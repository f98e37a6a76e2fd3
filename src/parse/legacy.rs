//! Legacy observation processors (1001-1004, 1009-1012).
//!
//! Both families share the same shape: an epoch field, a satellite
//! count, then per satellite L1 fields with optional L2 fields on the
//! dual band variants. They differ in field names and time reference.

use gnss::prelude::{Constellation, SV};

use super::ParseContext;
use crate::{
    epoch::{glonass_epoch_ms_to_gws, gps_epoch_ms_to_gws},
    observation::{CellObservation, EpochData, ParseResult},
    rtcm::MessageFields,
};

pub(crate) fn process_gps(
    msg: &MessageFields,
    dual_band: bool,
    result: &mut ParseResult,
    ctx: &mut ParseContext,
) {
    let Some(epoch_ms) = msg.int("DF004").and_then(|ms| u64::try_from(ms).ok()) else {
        return;
    };

    let nsat = msg.int("DF006").unwrap_or(0);
    if nsat <= 0 {
        return;
    }

    let gws = gps_epoch_ms_to_gws(epoch_ms);
    let epoch = result.epoch_mut(gws);

    for i in 1..=nsat as usize {
        let Some(prn) = msg.int_at("DF009", i).and_then(|prn| u8::try_from(prn).ok()) else {
            continue;
        };
        let sv = SV::new(Constellation::GPS, prn);

        observe_band(msg, ctx, epoch, sv, "L1", "DF015", "DF013", i);
        if dual_band {
            observe_band(msg, ctx, epoch, sv, "L2", "DF020", "DF019", i);
        }
    }
}

pub(crate) fn process_glonass(
    msg: &MessageFields,
    dual_band: bool,
    result: &mut ParseResult,
    ctx: &mut ParseContext,
) {
    let Some(epoch_ms) = msg.int("DF034").and_then(|ms| u64::try_from(ms).ok()) else {
        return;
    };

    // day wrap bookkeeping precedes the conversion
    ctx.glonass_day.observe(epoch_ms);

    let nsat = msg.int("DF035").unwrap_or(0);
    if nsat <= 0 {
        return;
    }

    let gws = glonass_epoch_ms_to_gws(epoch_ms, ctx.session.gps_day, ctx.glonass_day.day_count());
    let epoch = result.epoch_mut(gws);

    for i in 1..=nsat as usize {
        let Some(slot) = msg.int_at("DF038", i).and_then(|slot| u8::try_from(slot).ok()) else {
            continue;
        };
        let sv = SV::new(Constellation::Glonass, slot);

        observe_band(msg, ctx, epoch, sv, "L1", "DF045", "DF043", i);
        if dual_band {
            observe_band(msg, ctx, epoch, sv, "L2", "DF050", "DF049", i);
        }
    }
}

/// Emits one band observation when its C/N0 is present and positive,
/// running the slip check when a lock indicator came along.
#[allow(clippy::too_many_arguments)]
fn observe_band(
    msg: &MessageFields,
    ctx: &mut ParseContext,
    epoch: &mut EpochData,
    sv: SV,
    signal: &str,
    cn0_field: &str,
    lock_field: &str,
    index: usize,
) {
    let Some(cn0) = msg.float_at(cn0_field, index) else {
        return;
    };
    if cn0 <= 0.0 {
        return;
    }

    let lock_time = msg.float_at(lock_field, index);
    if let Some(lock) = lock_time {
        if ctx.locks.check_slip(sv, signal, lock) {
            epoch.cycle_slips += 1;
        }
    }

    epoch.observations.push(CellObservation {
        sv,
        signal: signal.to_string(),
        cn0,
        lock_time: lock_time.unwrap_or(0.0),
    });
}
