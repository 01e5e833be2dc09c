//! This submodule deals with turning raw bytes of a `.tt` file into usable values: code page 1250
//! text and the packed 32-bit departure words.
use crate::MAX_MINUTE;

use encoding_rs::WINDOWS_1250;

/// Decode a byte slice as Windows-1250 text. Invalid bytes become the
/// replacement character rather than failing the caller.
pub fn decode_cp1250(bytes: &[u8]) -> String {
    let (cow, _, _) = WINDOWS_1250.decode(bytes);
    cow.into_owned()
}

/// Decode a name field: code page 1250, trailing NUL padding stripped,
/// surrounding whitespace trimmed.
pub fn clean_name(bytes: &[u8]) -> String {
    let decoded = decode_cp1250(bytes);
    decoded.trim_end_matches('\0').trim().to_string()
}

/// Read a little-endian `u32` at `pos`, or `None` when the slice ends first.
pub fn read_u32_le(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// One departure word as packed into the file.
///
/// Layout (little-endian `u32`): the low byte carries the stop index, the
/// second byte is zero on real departures, and the upper half carries the
/// minute of day. The topmost bit of the minute half is dropped; it is set
/// on some records and its meaning is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWord {
    pub stop_index: u8,
    pub marker: u8,
    pub minutes: u16,
}

impl TimeWord {
    /// Unpack a raw little-endian word.
    pub fn unpack(raw: u32) -> Self {
        TimeWord {
            stop_index: (raw & 0xFF) as u8,
            marker: ((raw >> 8) & 0xFF) as u8,
            minutes: ((raw >> 16) & 0x7FFF) as u16,
        }
    }

    /// Read and unpack the word at `pos`, or `None` past the end of data.
    pub fn read(data: &[u8], pos: usize) -> Option<Self> {
        read_u32_le(data, pos).map(Self::unpack)
    }

    /// Whether the word looks like a real departure: marker byte clear and
    /// the minute within a day.
    pub fn is_plausible(&self) -> bool {
        self.marker == 0 && self.minutes <= MAX_MINUTE
    }

    /// Pack the word back into its on-disk form. Used by the test helpers
    /// that construct synthetic files.
    pub fn pack(stop_index: u8, minutes: u16) -> u32 {
        (stop_index as u32) | ((minutes as u32) << 16)
    }
}
