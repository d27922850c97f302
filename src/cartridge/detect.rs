use std::error::Error;
use std::fmt;

use log::debug;

use crate::cartridge::cartridge_header::{CartridgeHeader, HEADER_CRC_COVERAGE, HEADER_SIZE};
use crate::cartridge::crc16::crc16;

pub const FORMAT_LABEL: &str = "Nintendo DS ROM";

#[derive(Clone, Debug)]
pub struct Detection {
    pub format_label: &'static str,
    pub header: CartridgeHeader,
}

// Probes arbitrary bytes for a DS header. Rejection is the common case, so it is cheap and quiet.
pub fn detect(rom: &[u8]) -> Result<Detection, NotRecognized> {
    let Some(raw_header) = rom.first_chunk::<HEADER_SIZE>() else {
        debug!("Not a DS ROM: {} bytes is shorter than the {HEADER_SIZE} byte header.", rom.len());
        return Err(NotRecognized { reason: RejectReason::TooShort { length: rom.len() } });
    };

    let computed = crc16(&raw_header[..HEADER_CRC_COVERAGE]);
    let header = CartridgeHeader::parse(raw_header);
    if computed != header.header_crc() {
        debug!("Not a DS ROM: header CRC is 0x{computed:04X} but the header claims 0x{:04X}.",
            header.header_crc());
        return Err(NotRecognized {
            reason: RejectReason::ChecksumMismatch { computed, stored: header.header_crc() },
        });
    }

    Ok(Detection { format_label: FORMAT_LABEL, header })
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NotRecognized {
    pub reason: RejectReason,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RejectReason {
    TooShort { length: usize },
    ChecksumMismatch { computed: u16, stored: u16 },
}

impl fmt::Display for NotRecognized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectReason::TooShort { length } =>
                write!(f, "Not a {FORMAT_LABEL}: {length} bytes is shorter than the {HEADER_SIZE} byte header."),
            RejectReason::ChecksumMismatch { computed, stored } =>
                write!(f, "Not a {FORMAT_LABEL}: header CRC 0x{computed:04X} does not match stored 0x{stored:04X}."),
        }
    }
}

impl Error for NotRecognized {}
