//! Single pass log parsing: frame dispatch and observation collection.

use std::{fs::File, io::Read, path::Path};

use crate::{
    epoch::{GlonassDayState, Session},
    error::Error,
    observation::{LockHistory, ParseResult},
    rtcm::{Frames, MessageFields, MessageKind},
};

mod legacy;
mod msm;
mod position;

/// Transient per pass state shared by the processors, owned by the
/// driver and threaded by mutable reference.
pub(crate) struct ParseContext<'a> {
    pub session: &'a Session,
    pub locks: LockHistory,
    pub glonass_day: GlonassDayState,
}

impl ParseResult {
    /// Parses a plain RTCM3 log file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }

        let session = Session::from_path(path);

        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;

        Ok(Self::from_bytes(&buffer, &session))
    }

    /// Parses a gzip compressed RTCM3 log file.
    #[cfg(feature = "flate2")]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }

        let session = Session::from_path(path);

        let mut buffer = Vec::new();
        flate2::read::GzDecoder::new(File::open(path)?).read_to_end(&mut buffer)?;

        Ok(Self::from_bytes(&buffer, &session))
    }

    /// Parses an in-memory log under the given session context.
    pub fn from_bytes(data: &[u8], session: &Session) -> Self {
        Self::from_messages(Frames::new(data).filter_map(|frame| frame.message), session)
    }

    /// Runs the dispatch loop over already decoded messages.
    pub fn from_messages<I>(messages: I, session: &Session) -> Self
    where
        I: IntoIterator<Item = MessageFields>,
    {
        let mut result = ParseResult::default();
        let mut ctx = ParseContext {
            session,
            locks: LockHistory::new(),
            glonass_day: GlonassDayState::default(),
        };

        for message in messages {
            let number = message.number();
            *result.message_counts.entry(number).or_insert(0) += 1;
            result.total_messages += 1;

            match MessageKind::from_number(number) {
                MessageKind::Msm7(constellation) => {
                    msm::process(&message, constellation, &mut result, &mut ctx);
                },
                MessageKind::LegacyGps { dual_band } => {
                    legacy::process_gps(&message, dual_band, &mut result, &mut ctx);
                },
                MessageKind::LegacyGlonass { dual_band } => {
                    legacy::process_glonass(&message, dual_band, &mut result, &mut ctx);
                },
                MessageKind::StationArp { with_height } => {
                    position::process(&message, with_height, &mut result);
                },
                MessageKind::Other => {},
            }
        }

        result
    }
}
