//! RTCM3 decoding service.
//!
//! The analyzer core never touches bits: it consumes [MessageFields]
//! records, one per synchronized frame, and routes them by
//! [MessageKind]. This module supplies both the frame scanner and the
//! per-family bit unpackers that fill those records with named,
//! physically scaled data fields (pyrtcm compatible DF codes, repeat
//! fields indexed `FIELD_01`, `FIELD_02`, ...).

use std::collections::HashMap;

use gnss::prelude::Constellation;
use lazy_static::lazy_static;

mod bits;
mod crc;
mod frame;
mod legacy;
mod msm;
mod signal;

pub use frame::{Frame, Frames};

/// One decoded data field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric reading; integers widen to float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            Value::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One decoded RTCM3 message: numeric type plus named data fields.
/// Missing fields read back as `None`.
#[derive(Debug, Clone, Default)]
pub struct MessageFields {
    number: u16,
    fields: HashMap<String, Value>,
}

impl MessageFields {
    pub fn new(number: u16) -> Self {
        Self {
            number,
            fields: HashMap::new(),
        }
    }

    /// Numeric message type ("identity").
    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    /// Stores a repeat field, 1-based, rendered `BASE_01`, `BASE_02`, ...
    pub fn set_indexed(&mut self, base: &str, index: usize, value: Value) {
        self.fields.insert(format!("{}_{:02}", base, index), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Repeat field accessor, 1-based.
    pub fn field(&self, base: &str, index: usize) -> Option<&Value> {
        self.fields.get(&format!("{}_{:02}", base, index))
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    pub fn int_at(&self, base: &str, index: usize) -> Option<i64> {
        self.field(base, index)?.as_i64()
    }

    pub fn float_at(&self, base: &str, index: usize) -> Option<f64> {
        self.field(base, index)?.as_f64()
    }

    pub fn text_at(&self, base: &str, index: usize) -> Option<&str> {
        self.field(base, index)?.as_text()
    }
}

/// Known message families, dispatched by numeric message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Multiple Signal Message 7 for one constellation.
    Msm7(Constellation),

    /// Legacy GPS observables (1001-1004). The dual band variants
    /// (1003/1004) additionally carry L2 fields.
    LegacyGps { dual_band: bool },

    /// Legacy GLONASS observables (1009-1012), L2 on 1011/1012.
    LegacyGlonass { dual_band: bool },

    /// Station antenna reference point (1005, or 1006 with height).
    StationArp { with_height: bool },

    /// Valid frame, counted but not processed.
    Other,
}

impl MessageKind {
    pub fn from_number(number: u16) -> Self {
        match number {
            1001 | 1002 => Self::LegacyGps { dual_band: false },
            1003 | 1004 => Self::LegacyGps { dual_band: true },
            1009 | 1010 => Self::LegacyGlonass { dual_band: false },
            1011 | 1012 => Self::LegacyGlonass { dual_band: true },
            1005 => Self::StationArp { with_height: false },
            1006 => Self::StationArp { with_height: true },
            1077 => Self::Msm7(Constellation::GPS),
            1087 => Self::Msm7(Constellation::Glonass),
            1097 => Self::Msm7(Constellation::Galileo),
            1127 => Self::Msm7(Constellation::BeiDou),
            _ => Self::Other,
        }
    }
}

lazy_static! {
    /// Human readable labels for the message inventory.
    pub static ref MESSAGE_DESCRIPTIONS: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        map.insert(1001, "GPS L1 Obs");
        map.insert(1002, "GPS L1 Obs Extended");
        map.insert(1003, "GPS L1/L2 Obs");
        map.insert(1004, "GPS L1/L2 Obs Extended");
        map.insert(1005, "Ref Station ARP");
        map.insert(1006, "Ref Station ARP + Height");
        map.insert(1007, "Antenna Descriptor");
        map.insert(1008, "Antenna Descriptor + Serial");
        map.insert(1009, "GLONASS L1 Obs");
        map.insert(1010, "GLONASS L1 Obs Extended");
        map.insert(1011, "GLONASS L1/L2 Obs");
        map.insert(1012, "GLONASS L1/L2 Obs Extended");
        map.insert(1013, "System Parameters");
        map.insert(1033, "Receiver/Antenna Descriptors");
        map.insert(1077, "GPS MSM7");
        map.insert(1087, "GLONASS MSM7");
        map.insert(1097, "Galileo MSM7");
        map.insert(1107, "SBAS MSM7");
        map.insert(1117, "QZSS MSM7");
        map.insert(1127, "BeiDou MSM7");
        map.insert(1230, "GLONASS Code-Phase Biases");
        map
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn indexed_fields() {
        let mut msg = MessageFields::new(1077);
        msg.set("DF004", Value::Int(3_600_000));
        msg.set_indexed("DF408", 1, Value::Float(45.0));
        msg.set_indexed("CELLSIG", 1, Value::Text("1C".to_string()));

        assert_eq!(msg.number(), 1077);
        assert_eq!(msg.int("DF004"), Some(3_600_000));
        assert_eq!(msg.float("DF004"), Some(3_600_000.0));
        assert_eq!(msg.float_at("DF408", 1), Some(45.0));
        assert_eq!(msg.text_at("CELLSIG", 1), Some("1C"));
        assert!(msg.field("DF408", 2).is_none());
        assert!(msg.get("DF034").is_none());
    }

    #[test]
    fn dispatch_table() {
        assert_eq!(
            MessageKind::from_number(1004),
            MessageKind::LegacyGps { dual_band: true }
        );
        assert_eq!(
            MessageKind::from_number(1009),
            MessageKind::LegacyGlonass { dual_band: false }
        );
        assert_eq!(
            MessageKind::from_number(1006),
            MessageKind::StationArp { with_height: true }
        );
        assert_eq!(
            MessageKind::from_number(1097),
            MessageKind::Msm7(Constellation::Galileo)
        );
        assert_eq!(MessageKind::from_number(1230), MessageKind::Other);
    }
}
