//! This is a library for writing decoded `.tt` timetables as GTFS feeds. It covers the emission
//! of one feed per decoded file and the merging of many emitted feeds into a single combined
//! feed with deduplicated stops and freshly allocated identifiers.
//!
//! The tables follow the public GTFS schema; only the columns this toolchain produces or
//! consumes are modelled.
extern crate chaps_tt_core;
extern crate csv;
extern crate fnv;
extern crate log;
extern crate serde;
#[cfg(test)]
extern crate chaps_tt_in;
#[cfg(test)]
extern crate tempfile;

pub mod emit;
#[cfg(test)]
mod integration_tests;
pub mod merge;
pub mod tables;

pub use chaps_tt_core::errors::*;
pub use chaps_tt_core::records::*;

pub use emit::{write_feed, FeedSummary};
pub use merge::FeedMerger;
pub use tables::TransportCategory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

pub(crate) fn table_err(e: csv::Error) -> TtError {
    TtError::GtfsTable { msg: e.to_string() }
}

/// Open a CSV writer for one table of a feed directory.
pub(crate) fn open_table_writer(dir: &Path, name: &str) -> Result<csv::Writer<File>, TtError> {
    csv::Writer::from_path(dir.join(name)).map_err(table_err)
}

/// Read all rows of one table. A missing table reads as no rows; feeds in
/// the wild routinely omit tables they have nothing to say in.
pub fn read_table_rows<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>, TtError> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(&path).map_err(table_err)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.map_err(table_err)?);
    }
    Ok(rows)
}

/// Write `rows` as one table of a feed directory.
pub fn write_table_rows<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<(), TtError> {
    let mut writer = open_table_writer(dir, name)?;
    for row in rows {
        writer.serialize(row).map_err(table_err)?;
    }
    writer.flush()?;
    Ok(())
}
