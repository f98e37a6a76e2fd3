//! MSM7 bit unpacking (1077/1087/1097/1127).
//!
//! An MSM payload carries three mask fields (satellites, signals,
//! cells) followed by field-sequential satellite and signal blocks:
//! all DF397 first, then all DF398, and so on. Cells are numbered in
//! satellite major mask order, which fixes the `CELLPRN_i`/`CELLSIG_i`
//! pairing.

use gnss::prelude::Constellation;

use super::{bits::BitReader, signal::msm_signal_code, MessageFields, Value};

/// Widest cell mask a single MSM message may carry.
const MAX_CELLS: usize = 64;

pub(crate) fn unpack(
    number: u16,
    constellation: Constellation,
    payload: &[u8],
) -> Option<MessageFields> {
    let mut reader = BitReader::new(payload);
    let mut msg = MessageFields::new(number);

    reader.skip(12)?; // DF002
    msg.set("DF003", Value::Int(reader.take(12)? as i64));

    if constellation == Constellation::Glonass {
        // GLONASS MSM epochs are day-of-week + milliseconds of the Moscow day
        msg.set("DF416", Value::Int(reader.take(3)? as i64));
        msg.set("DF034", Value::Int(reader.take(27)? as i64));
    } else {
        // GPS, Galileo and BeiDou MSM share the week seconds time base
        msg.set("DF004", Value::Int(reader.take(30)? as i64));
    }

    reader.skip(1 + 3 + 7 + 2 + 2 + 1 + 3)?; // DF393, DF409, reserved, DF411, DF412, DF417, DF418

    let sat_mask = reader.take(64)?;
    let sig_mask = reader.take(32)?;

    // mask MSB carries id 1
    let sats: Vec<u8> = (0..64u8)
        .filter(|i| sat_mask >> (63 - i) & 1 == 1)
        .map(|i| i + 1)
        .collect();
    let sigs: Vec<u8> = (0..32u8)
        .filter(|i| sig_mask >> (31 - i) & 1 == 1)
        .map(|i| i + 1)
        .collect();

    if sats.len() * sigs.len() > MAX_CELLS {
        return None;
    }

    let mut cells: Vec<(u8, u8)> = Vec::new();
    for &sat in &sats {
        for &sig in &sigs {
            if reader.take(1)? == 1 {
                cells.push((sat, sig));
            }
        }
    }

    msg.set("NSat", Value::Int(sats.len() as i64));
    msg.set("NCell", Value::Int(cells.len() as i64));

    if cells.is_empty() {
        return Some(msg);
    }

    // satellite block
    for i in 1..=sats.len() {
        let rough_range_ms = reader.take(8)?;
        if rough_range_ms != 255 {
            msg.set_indexed("DF397", i, Value::Int(rough_range_ms as i64));
        }
    }
    reader.skip(4 * sats.len())?; // extended satellite info
    for i in 1..=sats.len() {
        msg.set_indexed("DF398", i, Value::Float(reader.take(10)? as f64 / 1024.0));
    }
    for i in 1..=sats.len() {
        let rate = reader.take_signed(14)?;
        if rate != -8192 {
            msg.set_indexed("DF399", i, Value::Int(rate));
        }
    }

    // signal block
    for i in 1..=cells.len() {
        let fine_range = reader.take_signed(20)?;
        if fine_range != -(1 << 19) {
            msg.set_indexed(
                "DF405",
                i,
                Value::Float(fine_range as f64 * (-29f64).exp2()),
            );
        }
    }
    for i in 1..=cells.len() {
        let fine_phase = reader.take_signed(24)?;
        if fine_phase != -(1 << 23) {
            msg.set_indexed(
                "DF406",
                i,
                Value::Float(fine_phase as f64 * (-31f64).exp2()),
            );
        }
    }
    for i in 1..=cells.len() {
        msg.set_indexed("DF407", i, Value::Int(reader.take(10)? as i64));
    }
    for i in 1..=cells.len() {
        msg.set_indexed("DF420", i, Value::Int(reader.take(1)? as i64));
    }
    for i in 1..=cells.len() {
        msg.set_indexed("DF408", i, Value::Float(reader.take(10)? as f64 * 0.0625));
    }
    for i in 1..=cells.len() {
        let rate = reader.take_signed(15)?;
        if rate != -16384 {
            msg.set_indexed("DF404", i, Value::Float(rate as f64 * 0.0001));
        }
    }

    // cell identity
    for (i, (sat, sig)) in cells.iter().enumerate() {
        msg.set_indexed("CELLPRN", i + 1, Value::Int(*sat as i64));
        msg.set_indexed(
            "CELLSIG",
            i + 1,
            Value::Text(msm_signal_code(constellation, *sig)),
        );
    }

    Some(msg)
}
