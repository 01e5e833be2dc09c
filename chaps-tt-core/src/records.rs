//! This file contains the definitions of the records produced by decoding a timetable file.
//! These are what the decoder hands to callers and what the GTFS writer consumes; the JSON
//! form written to disk comes straight from serialising [`DecodedTimetable`].
use crate::errors::TtError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single `(stop index, minute of day)` departure within a trip.
pub type TripEntry = (u16, u16);

/// One reconstructed vehicle run: at least two entries, minutes weakly
/// increasing, stop indices referencing the selected stop table.
pub type Trip = Vec<TripEntry>;

/// Key of a directed travel edge between two stop indices.
pub type EdgeKey = (u16, u16);

/// Observed travel-time samples per directed stop pair, in minutes.
pub type EdgeSamples = BTreeMap<EdgeKey, Vec<u16>>;

/// Summary statistics for one travel edge, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSummary {
    pub from_stop: String,
    pub to_stop: String,
    pub travel_time_avg: f64,
    pub travel_time_min: u16,
    pub travel_time_max: u16,
    pub samples: usize,
}

/// Counters describing one decode, exported under `stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeStats {
    pub stops: usize,
    pub trips: usize,
    pub edges: usize,
    pub total_travel_times: usize,
    pub p_records: usize,
    pub best_stop_offset: usize,
    pub best_time_offset: usize,
    pub stop_quality_score: f64,
}

/// Everything recovered from one `.tt` file.
///
/// Field order is the order of the serialised JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedTimetable {
    pub source_file: String,
    pub stops: Vec<String>,
    pub trips: Vec<Trip>,
    pub stats: DecodeStats,
    pub edges: BTreeMap<String, EdgeSummary>,
}

impl DecodedTimetable {
    /// Assemble the exportable record from the decoder's parts. The edge
    /// summaries and the counters are computed here.
    pub fn assemble(
        source_file: String,
        stops: Vec<String>,
        trips: Vec<Trip>,
        edge_samples: &EdgeSamples,
        p_record_count: usize,
        stop_table_offset: usize,
        time_section_offset: usize,
        stop_quality_score: f64,
    ) -> Self {
        let edges = summarise_edges(edge_samples, &stops);
        let total_travel_times = edge_samples.values().map(Vec::len).sum();
        let stats = DecodeStats {
            stops: stops.len(),
            trips: trips.len(),
            edges: edge_samples.len(),
            total_travel_times,
            p_records: p_record_count,
            best_stop_offset: stop_table_offset,
            best_time_offset: time_section_offset,
            stop_quality_score: round_to(stop_quality_score, 100.0),
        };
        DecodedTimetable {
            source_file,
            stops,
            trips,
            stats,
            edges,
        }
    }

    /// Serialise the record as a pretty-printed UTF-8 JSON document.
    pub fn to_json(&self) -> Result<String, TtError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record back from its JSON form.
    pub fn from_json(text: &str) -> Result<Self, TtError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Build the exported `"from->to"` edge map from raw samples.
///
/// An index without a name (possible only if the caller passes a foreign
/// stop list) falls back to a `Stop#<n>` placeholder instead of failing.
pub fn summarise_edges(
    edge_samples: &EdgeSamples,
    stops: &[String],
) -> BTreeMap<String, EdgeSummary> {
    let stop_name = |idx: u16| {
        stops
            .get(idx as usize)
            .cloned()
            .unwrap_or_else(|| format!("Stop#{}", idx))
    };

    let mut out = BTreeMap::new();
    for (&(from, to), samples) in edge_samples {
        if samples.is_empty() {
            continue;
        }
        let sum: u32 = samples.iter().map(|&s| s as u32).sum();
        let avg = sum as f64 / samples.len() as f64;
        let summary = EdgeSummary {
            from_stop: stop_name(from),
            to_stop: stop_name(to),
            travel_time_avg: round_to(avg, 10.0),
            travel_time_min: *samples.iter().min().unwrap_or(&0),
            travel_time_max: *samples.iter().max().unwrap_or(&0),
            samples: samples.len(),
        };
        out.insert(format!("{}->{}", from, to), summary);
    }
    out
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
