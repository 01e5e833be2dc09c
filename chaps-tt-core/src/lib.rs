//! This library is the foundation for the `chaps-tt-in` and `chaps-tt-out` crates. It holds the
//! record structures shared by the decoder and the GTFS writer, the error type, the code page
//! handling and the empirical keyword lists used to tell stop names from the other text that is
//! packed into a `.tt` file.
extern crate encoding_rs;
extern crate serde;
extern crate serde_json;

pub mod errors;
pub mod patterns;
pub mod records;
pub mod settings;
pub mod text;
#[cfg(test)]
mod tests;

pub use errors::TtError;

pub use records::*;
pub use settings::DecoderSettings;

/// Number of header bytes probed for the format markers.
pub const HEADER_PROBE_LEN: usize = 60;
/// Shortest byte sequence that can still carry the fixed header.
pub const MIN_FILE_LEN: usize = 66;
/// First offset at which a stop-name table may start.
pub const STOP_SCAN_START: usize = 0x40;
/// Largest accepted `item_count` of a stop-name table.
pub const MAX_STOP_ITEMS: u32 = 20_000;
/// First offset probed for departure-word sections.
pub const TIME_SCAN_START: usize = 0x100;
/// Coarse stride of the departure-section scan.
pub const TIME_SCAN_STRIDE: usize = 0x400;
/// Number of words inspected per section probe.
pub const SECTION_PROBE_WORDS: usize = 30;
/// Byte length of the window decoded from a chosen section.
pub const TRIP_DECODE_WINDOW: usize = 50_000;
/// Offset at which the P-record region starts.
pub const P_RECORD_START: usize = 0x1000;
/// Byte length of the P-record region.
pub const P_RECORD_WINDOW: usize = 50_000;
/// At most this many P-records are retained.
pub const MAX_P_RECORDS: usize = 50;
/// Largest valid minute-of-day value (a day has 1440 minutes; the value
/// itself shows up for trips that roll over midnight).
pub const MAX_MINUTE: u16 = 1440;
/// A forward time jump beyond this many minutes delimits two runs.
pub const MAX_MINUTE_JUMP: u16 = 240;
/// How many entries may share one minute before further ones are dropped.
pub const MAX_SAME_MINUTE_STREAK: u32 = 3;
/// How many of the best-scanning sections are fully decoded.
pub const MAX_SECTIONS_TRIED: usize = 16;
/// Travel times outside `MIN_TRAVEL_TIME..=MAX_TRAVEL_TIME` are discarded.
pub const MIN_TRAVEL_TIME: u16 = 1;
pub const MAX_TRAVEL_TIME: u16 = 60;

/// The stop-name table selected from a `.tt` file.
///
/// Names are referenced by index from [`records::Trip`] entries. After the decoder has scrubbed
/// the table the indices are final and the table is not modified again.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTable {
    /// The decoded stop names, in table order.
    pub(crate) names: Vec<String>,
    /// Byte offset at which the table layout was recognised.
    pub(crate) offset: usize,
    /// Composite quality score of the winning candidate.
    pub(crate) score: f64,
    /// Set when no candidate cleared the score threshold and the best
    /// available one was kept anyway.
    pub(crate) fallback: bool,
}

impl StopTable {
    pub fn new(names: Vec<String>, offset: usize, score: f64, fallback: bool) -> Self {
        StopTable {
            names,
            offset,
            score,
            fallback,
        }
    }

    /// Get the stop names in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get the name for a given stop index.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    /// Number of stops in the table.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Obligatory `is_empty` method.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Byte offset the table was found at.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The quality score the candidate received. Callers that care about
    /// data quality should check this together with [`Self::is_fallback`].
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Whether the table was kept despite scoring below the acceptance
    /// threshold.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Consume the table, returning the owned names.
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}
