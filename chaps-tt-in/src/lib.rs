//! This is a library for reading CHAPS `.tt` timetable containers into rust. The format is
//! proprietary and undocumented, so everything here is heuristic: the stop-name table and the
//! departure records are *found* by scanning and scoring candidate regions, not read from a
//! declared layout, and the decode reports failure rather than return obviously wrong data.
//!
//! The usual entry point is [`TtFile::open`], which maps the file, runs the whole pipeline and
//! surrenders the results; [`TtFile::from_bytes`] does the same for an in-memory buffer.
extern crate chaps_tt_core;
extern crate log;
extern crate memmap2;

pub mod edges;
pub mod memory_map;
pub mod p_records;
pub mod scrub;
pub mod stop_table;
pub mod time_records;

pub use chaps_tt_core::errors::*;
pub use chaps_tt_core::records::*;
pub use chaps_tt_core::{DecoderSettings, StopTable};

use std::path::Path;

/// One fully decoded `.tt` file.
///
/// Holds the scrubbed stop table, the reconstructed trips, the travel-time
/// edges and the decode diagnostics. The raw bytes are not retained; the
/// structure owns only the derived data.
#[derive(Debug)]
pub struct TtFile {
    pub(crate) source_file: String,
    pub(crate) stop_table: StopTable,
    pub(crate) trips: Vec<Trip>,
    pub(crate) edges: EdgeSamples,
    pub(crate) p_records: Vec<String>,
    pub(crate) time_section_offset: usize,
    pub(crate) settings: DecoderSettings,
}

impl TtFile {
    /// Attempt to open and decode a `.tt` file with the given settings.
    ///
    /// The file is mapped into memory, the header is checked, and the full
    /// pipeline runs: stop-table location, P-record extraction, departure
    /// section selection, trip reconstruction, stop scrubbing and edge
    /// extraction. Any failure is reported through [`TtError`].
    pub fn open<P: AsRef<Path>>(path: P, settings: DecoderSettings) -> Result<Self, TtError> {
        let path = path.as_ref();
        let mapped = memory_map::MappedTt::new(path)?;
        let source_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::decode(mapped.bytes(), source_file, settings)
    }

    /// Decode a `.tt` container already held in memory. `source_file` is
    /// used only to label the output.
    pub fn from_bytes(
        data: &[u8],
        source_file: &str,
        settings: DecoderSettings,
    ) -> Result<Self, TtError> {
        Self::decode(data, source_file.to_string(), settings)
    }

    fn decode(data: &[u8], source_file: String, settings: DecoderSettings) -> Result<Self, TtError> {
        memory_map::verify_header(data)?;

        let stop_table = stop_table::locate_stop_table(data, &settings)?;
        let p_records = p_records::find_p_records(data, &settings);

        let sections = time_records::find_time_sections(data, &settings);
        let (mut trips, time_section_offset) =
            time_records::select_trips(data, &sections, stop_table.len(), &settings)?;

        let offset = stop_table.offset();
        let score = stop_table.score();
        let fallback = stop_table.is_fallback();
        let mut names = stop_table.into_names();

        let mut edges = EdgeSamples::new();
        scrub::scrub_stops(&mut names, &mut trips, &mut edges);
        let edges = edges::extract_edges(&trips);

        Ok(TtFile {
            source_file,
            stop_table: StopTable::new(names, offset, score, fallback),
            trips,
            edges,
            p_records,
            time_section_offset,
            settings,
        })
    }

    /// The label of the decoded input, usually its file name.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Get the scrubbed stop table.
    pub fn get_stop_table(&self) -> &StopTable {
        &self.stop_table
    }

    /// Get the stop names in index order.
    pub fn get_stops(&self) -> &[String] {
        self.stop_table.names()
    }

    /// Get the reconstructed trips.
    pub fn get_trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Iterate over the reconstructed trips.
    pub fn trips_iter(&self) -> std::slice::Iter<Trip> {
        self.trips.iter()
    }

    /// Get the raw travel-time samples per directed stop pair.
    pub fn get_edges(&self) -> &EdgeSamples {
        &self.edges
    }

    /// Get the extracted P-records. Informational; may well be empty.
    pub fn get_p_records(&self) -> &[String] {
        &self.p_records
    }

    /// Byte offset of the departure section the trips were decoded from.
    pub fn time_section_offset(&self) -> usize {
        self.time_section_offset
    }

    /// Get the settings this file was decoded with.
    pub fn get_settings(&self) -> &DecoderSettings {
        &self.settings
    }

    /// Build the exportable record, cloning the decoded data.
    pub fn to_record(&self) -> DecodedTimetable {
        DecodedTimetable::assemble(
            self.source_file.clone(),
            self.stop_table.names().to_vec(),
            self.trips.clone(),
            &self.edges,
            self.p_records.len(),
            self.stop_table.offset(),
            self.time_section_offset,
            self.stop_table.score(),
        )
    }

    /// Consume the instance and build the exportable record without
    /// copying the trip data.
    pub fn into_record(self) -> DecodedTimetable {
        let TtFile {
            source_file,
            stop_table,
            trips,
            edges,
            p_records,
            time_section_offset,
            ..
        } = self;
        let offset = stop_table.offset();
        let score = stop_table.score();
        DecodedTimetable::assemble(
            source_file,
            stop_table.into_names(),
            trips,
            &edges,
            p_records.len(),
            offset,
            time_section_offset,
            score,
        )
    }
}
