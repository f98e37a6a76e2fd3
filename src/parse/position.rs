//! Station coordinate collection (1005/1006).

use crate::{
    observation::{ParseResult, PositionReport},
    rtcm::MessageFields,
};

pub(crate) fn process(msg: &MessageFields, with_height: bool, result: &mut ParseResult) {
    result.positions.push(PositionReport {
        station_id: msg.int("DF003").and_then(|id| u16::try_from(id).ok()),
        ecef_x: msg.float("DF025"),
        ecef_y: msg.float("DF026"),
        ecef_z: msg.float("DF027"),
        antenna_height: if with_height {
            msg.float("DF028")
        } else {
            None
        },
    });
}
