//! MSM signal mask identifiers.

use gnss::prelude::Constellation;

/// RINEX style code for an MSM signal mask position (DF395, 1-based).
/// Unassigned positions fall back to a generic `Sxx` tag so the cell
/// stays attributable.
pub(crate) fn msm_signal_code(constellation: Constellation, signal_id: u8) -> String {
    let code = match constellation {
        Constellation::GPS => match signal_id {
            2 => "1C",
            3 => "1P",
            4 => "1W",
            8 => "2C",
            9 => "2P",
            10 => "2W",
            15 => "2S",
            16 => "2L",
            17 => "2X",
            22 => "5I",
            23 => "5Q",
            24 => "5X",
            30 => "1S",
            31 => "1L",
            32 => "1X",
            _ => "",
        },
        Constellation::Glonass => match signal_id {
            2 => "1C",
            3 => "1P",
            8 => "2C",
            9 => "2P",
            _ => "",
        },
        Constellation::Galileo => match signal_id {
            2 => "1C",
            3 => "1A",
            4 => "1B",
            5 => "1X",
            6 => "1Z",
            8 => "6C",
            9 => "6A",
            10 => "6B",
            11 => "6X",
            12 => "6Z",
            14 => "7I",
            15 => "7Q",
            16 => "7X",
            18 => "8I",
            19 => "8Q",
            20 => "8X",
            22 => "5I",
            23 => "5Q",
            24 => "5X",
            _ => "",
        },
        Constellation::BeiDou => match signal_id {
            2 => "2I",
            3 => "2Q",
            4 => "2X",
            8 => "6I",
            9 => "6Q",
            10 => "6X",
            14 => "7I",
            15 => "7Q",
            16 => "7X",
            22 => "5D",
            23 => "5P",
            24 => "5X",
            25 => "7D",
            _ => "",
        },
        _ => "",
    };

    if code.is_empty() {
        format!("S{:02}", signal_id)
    } else {
        code.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::msm_signal_code;
    use gnss::prelude::Constellation;

    #[test]
    fn known_codes() {
        assert_eq!(msm_signal_code(Constellation::GPS, 2), "1C");
        assert_eq!(msm_signal_code(Constellation::GPS, 10), "2W");
        assert_eq!(msm_signal_code(Constellation::Glonass, 2), "1C");
        assert_eq!(msm_signal_code(Constellation::Galileo, 4), "1B");
        assert_eq!(msm_signal_code(Constellation::BeiDou, 2), "2I");
    }

    #[test]
    fn unknown_positions_stay_attributable() {
        assert_eq!(msm_signal_code(Constellation::GPS, 29), "S29");
        assert_eq!(msm_signal_code(Constellation::QZSS, 2), "S02");
    }
}
