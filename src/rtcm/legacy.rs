//! Bit unpacking for the legacy observation messages (1001-1004,
//! 1009-1012) and the station coordinate messages (1005/1006).
//!
//! Field order and widths follow RTCM 10403; values are emitted with
//! their physical scaling applied (ranges in meters, C/N0 in dB-Hz).

use super::{bits::BitReader, MessageFields, Value};

/// Legacy GPS observables (1001-1004).
pub(crate) fn unpack_gps(number: u16, payload: &[u8]) -> Option<MessageFields> {
    let mut reader = BitReader::new(payload);
    let mut msg = MessageFields::new(number);

    reader.skip(12)?; // DF002
    msg.set("DF003", Value::Int(reader.take(12)? as i64));
    msg.set("DF004", Value::Int(reader.take(30)? as i64));
    reader.skip(1)?; // DF005 sync flag

    let nsat = reader.take(5)? as usize;
    msg.set("DF006", Value::Int(nsat as i64));
    reader.skip(4)?; // DF007 + DF008

    let extended = number == 1002 || number == 1004;
    let dual_band = number == 1003 || number == 1004;

    for i in 1..=nsat {
        msg.set_indexed("DF009", i, Value::Int(reader.take(6)? as i64));
        msg.set_indexed("DF010", i, Value::Int(reader.take(1)? as i64));
        msg.set_indexed("DF011", i, Value::Float(reader.take(24)? as f64 * 0.02));
        msg.set_indexed("DF012", i, Value::Float(reader.take_signed(20)? as f64 * 0.0005));
        msg.set_indexed("DF013", i, Value::Int(reader.take(7)? as i64));

        if extended {
            msg.set_indexed("DF014", i, Value::Int(reader.take(8)? as i64));
            msg.set_indexed("DF015", i, Value::Float(reader.take(8)? as f64 * 0.25));
        }

        if dual_band {
            msg.set_indexed("DF016", i, Value::Int(reader.take(2)? as i64));
            msg.set_indexed("DF017", i, Value::Float(reader.take_signed(14)? as f64 * 0.02));
            msg.set_indexed("DF018", i, Value::Float(reader.take_signed(20)? as f64 * 0.0005));
            msg.set_indexed("DF019", i, Value::Int(reader.take(7)? as i64));

            if extended {
                msg.set_indexed("DF020", i, Value::Float(reader.take(8)? as f64 * 0.25));
            }
        }
    }

    Some(msg)
}

/// Legacy GLONASS observables (1009-1012).
pub(crate) fn unpack_glonass(number: u16, payload: &[u8]) -> Option<MessageFields> {
    let mut reader = BitReader::new(payload);
    let mut msg = MessageFields::new(number);

    reader.skip(12)?; // DF002
    msg.set("DF003", Value::Int(reader.take(12)? as i64));
    msg.set("DF034", Value::Int(reader.take(27)? as i64));
    reader.skip(1)?; // DF005 sync flag

    let nsat = reader.take(5)? as usize;
    msg.set("DF035", Value::Int(nsat as i64));
    reader.skip(4)?; // DF036 + DF037

    let extended = number == 1010 || number == 1012;
    let dual_band = number == 1011 || number == 1012;

    for i in 1..=nsat {
        msg.set_indexed("DF038", i, Value::Int(reader.take(6)? as i64));
        msg.set_indexed("DF039", i, Value::Int(reader.take(1)? as i64));
        msg.set_indexed("DF040", i, Value::Int(reader.take(5)? as i64));
        msg.set_indexed("DF041", i, Value::Float(reader.take(25)? as f64 * 0.02));
        msg.set_indexed("DF042", i, Value::Float(reader.take_signed(20)? as f64 * 0.0005));
        msg.set_indexed("DF043", i, Value::Int(reader.take(7)? as i64));

        if extended {
            msg.set_indexed("DF044", i, Value::Int(reader.take(7)? as i64));
            msg.set_indexed("DF045", i, Value::Float(reader.take(8)? as f64 * 0.25));
        }

        if dual_band {
            msg.set_indexed("DF046", i, Value::Int(reader.take(2)? as i64));
            msg.set_indexed("DF047", i, Value::Float(reader.take_signed(14)? as f64 * 0.02));
            msg.set_indexed("DF048", i, Value::Float(reader.take_signed(20)? as f64 * 0.0005));
            msg.set_indexed("DF049", i, Value::Int(reader.take(7)? as i64));

            if extended {
                msg.set_indexed("DF050", i, Value::Float(reader.take(8)? as f64 * 0.25));
            }
        }
    }

    Some(msg)
}

/// Station antenna reference point (1005, 1006 with height).
/// ECEF components are 38 bit signed at 0.1 mm resolution.
pub(crate) fn unpack_station(number: u16, with_height: bool, payload: &[u8]) -> Option<MessageFields> {
    let mut reader = BitReader::new(payload);
    let mut msg = MessageFields::new(number);

    reader.skip(12)?; // DF002
    msg.set("DF003", Value::Int(reader.take(12)? as i64));
    reader.skip(10)?; // DF021 + GPS/GLO/GAL indicators + DF141

    msg.set("DF025", Value::Float(reader.take_signed(38)? as f64 * 0.0001));
    reader.skip(2)?; // DF142 + reserved
    msg.set("DF026", Value::Float(reader.take_signed(38)? as f64 * 0.0001));
    reader.skip(2)?; // DF364
    msg.set("DF027", Value::Float(reader.take_signed(38)? as f64 * 0.0001));

    if with_height {
        msg.set("DF028", Value::Float(reader.take(16)? as f64 * 0.0001));
    }

    Some(msg)
}
