//! RTCM3 frame synchronization.
//!
//! A frame is `0xD3`, 6 reserved bits, a 10 bit payload length, the
//! payload, and a CRC-24Q trailer. Corrupted or truncated regions are
//! skipped with single byte resynchronization so one bad frame never
//! aborts the pass.

use log::{debug, warn};

use super::{crc::crc24q, legacy, msm, MessageFields, MessageKind};

const PREAMBLE: u8 = 0xD3;
const OVERHEAD: usize = 6; // 3 byte header + 3 byte CRC

/// One synchronized frame: raw bytes plus the decode attempt.
pub struct Frame<'a> {
    /// The complete frame, header and CRC included.
    pub raw: &'a [u8],

    /// Decoded message. `None` when even the message number could not
    /// be recovered.
    pub message: Option<MessageFields>,
}

/// Iterator over the frames of an in-memory RTCM3 log.
pub struct Frames<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> Frames<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor + OVERHEAD <= self.data.len() {
            if self.data[self.cursor] != PREAMBLE {
                self.cursor += 1;
                continue;
            }

            let length = ((self.data[self.cursor + 1] & 0x03) as usize) << 8
                | self.data[self.cursor + 2] as usize;
            let total = OVERHEAD + length;

            if self.cursor + total > self.data.len() {
                // truncated candidate, maybe a preamble byte inside other data
                self.cursor += 1;
                continue;
            }

            let raw = &self.data[self.cursor..self.cursor + total];
            let expected = (raw[total - 3] as u32) << 16
                | (raw[total - 2] as u32) << 8
                | raw[total - 1] as u32;

            if crc24q(&raw[..total - 3]) != expected {
                debug!("crc mismatch at offset {}, resynchronizing", self.cursor);
                self.cursor += 1;
                continue;
            }

            self.cursor += total;
            return Some(Frame {
                raw,
                message: decode_payload(&raw[3..3 + length]),
            });
        }

        self.cursor = self.data.len();
        None
    }
}

/// Decodes a CRC validated payload into message fields.
fn decode_payload(payload: &[u8]) -> Option<MessageFields> {
    if payload.len() < 2 {
        return None;
    }

    let number = (payload[0] as u16) << 4 | (payload[1] >> 4) as u16;

    let decoded = match MessageKind::from_number(number) {
        MessageKind::Msm7(constellation) => msm::unpack(number, constellation, payload),
        MessageKind::LegacyGps { .. } => legacy::unpack_gps(number, payload),
        MessageKind::LegacyGlonass { .. } => legacy::unpack_glonass(number, payload),
        MessageKind::StationArp { with_height } => {
            legacy::unpack_station(number, with_height, payload)
        },
        MessageKind::Other => Some(MessageFields::new(number)),
    };

    match decoded {
        Some(fields) => Some(fields),
        None => {
            warn!(
                "malformed {} payload ({} bytes), keeping count only",
                number,
                payload.len()
            );
            Some(MessageFields::new(number))
        },
    }
}

#[cfg(test)]
mod test {
    use super::Frames;

    // synthetic frames, CRC sealed
    const FRAME_1005: &[u8] = &[
        0xD3, 0x00, 0x13, 0x3E, 0xD7, 0xD3, 0x03, 0x3D, 0x00, 0x0D, 0xFA, 0xDC, 0x35, 0x01, 0xA6,
        0x39, 0xA2, 0x09, 0x7F, 0x0C, 0xD6, 0x9B, 0x5B, 0x03, 0x26,
    ];
    const FRAME_1006: &[u8] = &[
        0xD3, 0x00, 0x15, 0x3E, 0xE7, 0xD3, 0x03, 0x3D, 0x00, 0x0D, 0xFA, 0xDC, 0x35, 0x01, 0xA6,
        0x39, 0xA2, 0x09, 0x7F, 0x0C, 0xD6, 0x9B, 0x3B, 0x7E, 0x3E, 0x05, 0xF9,
    ];
    const FRAME_1002: &[u8] = &[
        0xD3, 0x00, 0x12, 0x3E, 0xA7, 0xD3, 0x00, 0xDB, 0xBA, 0x00, 0x10, 0x30, 0x25, 0xAD, 0x0F,
        0xFD, 0xED, 0xD9, 0x00, 0xEA, 0x40, 0xF7, 0x50, 0x0D,
    ];
    const FRAME_1012: &[u8] = &[
        0xD3, 0x00, 0x18, 0x3F, 0x47, 0xD3, 0x98, 0x96, 0x80, 0x00, 0x80, 0x83, 0x83, 0xD0, 0x90,
        0x3F, 0xFE, 0x72, 0xD0, 0x2B, 0x40, 0x03, 0x7F, 0xFF, 0xB3, 0xAB, 0x30, 0xBE, 0x64, 0x7A,
    ];
    const FRAME_1077: &[u8] = &[
        0xD3, 0x00, 0x24, 0x43, 0x57, 0xD3, 0x00, 0xDB, 0xBA, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x52, 0xC2, 0x00, 0xFE, 0x70, 0x0C,
        0x0E, 0x7F, 0xE9, 0x18, 0x1F, 0x45, 0xA1, 0xE8, 0x90, 0xBE, 0xFF, 0x7A,
    ];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn station_arp() {
        let mut frames = Frames::new(FRAME_1005);
        let frame = frames.next().unwrap();
        let msg = frame.message.unwrap();

        assert_eq!(msg.number(), 1005);
        assert_eq!(msg.int("DF003"), Some(2003));
        assert!(close(msg.float("DF025").unwrap(), -1288398.5700));
        assert!(close(msg.float("DF026").unwrap(), -4721696.9310));
        assert!(close(msg.float("DF027").unwrap(), 4078625.3467));
        assert!(msg.get("DF028").is_none());
        assert!(frames.next().is_none());
    }

    #[test]
    fn station_arp_with_height() {
        let msg = Frames::new(FRAME_1006).next().unwrap().message.unwrap();
        assert_eq!(msg.number(), 1006);
        assert!(close(msg.float("DF028").unwrap(), 1.5230));
    }

    #[test]
    fn legacy_gps() {
        let msg = Frames::new(FRAME_1002).next().unwrap().message.unwrap();

        assert_eq!(msg.number(), 1002);
        assert_eq!(msg.int("DF004"), Some(3_600_000));
        assert_eq!(msg.int("DF006"), Some(1));
        assert_eq!(msg.int_at("DF009", 1), Some(12));
        assert_eq!(msg.int_at("DF013", 1), Some(100));
        assert!(close(msg.float_at("DF015", 1).unwrap(), 42.25));
        // 1002 carries no L2
        assert!(msg.field("DF020", 1).is_none());
    }

    #[test]
    fn legacy_glonass_dual_band() {
        let msg = Frames::new(FRAME_1012).next().unwrap().message.unwrap();

        assert_eq!(msg.number(), 1012);
        assert_eq!(msg.int("DF034"), Some(80_000_000));
        assert_eq!(msg.int("DF035"), Some(1));
        assert_eq!(msg.int_at("DF038", 1), Some(4));
        assert_eq!(msg.int_at("DF043", 1), Some(90));
        assert!(close(msg.float_at("DF045", 1).unwrap(), 45.0));
        assert_eq!(msg.int_at("DF049", 1), Some(85));
        assert!(close(msg.float_at("DF050", 1).unwrap(), 38.0));
    }

    #[test]
    fn msm7_single_cell() {
        let msg = Frames::new(FRAME_1077).next().unwrap().message.unwrap();

        assert_eq!(msg.number(), 1077);
        assert_eq!(msg.int("DF004"), Some(3_600_000));
        assert_eq!(msg.int("NSat"), Some(1));
        assert_eq!(msg.int("NCell"), Some(1));
        assert_eq!(msg.int_at("CELLPRN", 1), Some(5));
        assert_eq!(msg.text_at("CELLSIG", 1), Some("1C"));
        assert_eq!(msg.int_at("DF407", 1), Some(500));
        assert!(close(msg.float_at("DF408", 1).unwrap(), 45.0));
        assert_eq!(msg.int_at("DF397", 1), Some(75));
    }

    #[test]
    fn resynchronization() {
        // garbage, a corrupt frame, then two good frames back to back
        let mut stream = vec![0x00, 0xD3, 0x01];
        let mut corrupt = FRAME_1005.to_vec();
        corrupt[10] ^= 0xFF;
        stream.extend_from_slice(&corrupt);
        stream.extend_from_slice(FRAME_1002);
        stream.extend_from_slice(FRAME_1077);
        stream.extend_from_slice(&[0xD3]); // trailing junk

        let numbers: Vec<u16> = Frames::new(&stream)
            .filter_map(|frame| frame.message.map(|msg| msg.number()))
            .collect();
        assert_eq!(numbers, vec![1002, 1077]);
    }

    #[test]
    fn unknown_type_counted_only() {
        // 1230 frame: number-only payload, still CRC valid
        let payload = [0x4C, 0xE0];
        let mut frame = vec![0xD3, 0x00, payload.len() as u8];
        frame.extend_from_slice(&payload);
        let crc = super::crc24q(&frame);
        frame.extend_from_slice(&[(crc >> 16) as u8, (crc >> 8) as u8, crc as u8]);

        let msg = Frames::new(&frame).next().unwrap().message.unwrap();
        assert_eq!(msg.number(), 1230);
        assert!(msg.get("DF003").is_none());
    }
}
