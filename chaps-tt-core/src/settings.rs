//! This module contains the [`DecoderSettings`] structure which can be used to customise how hard
//! the heuristic scans work on a file.
//!
//! The defaults encode the scan budgets that keep multi-megabyte files fast; overriding them can
//! easily make decoding very slow or very blind, so it should be done with care.
use crate::{MAX_P_RECORDS, MAX_SECTIONS_TRIED, P_RECORD_WINDOW, TRIP_DECODE_WINDOW};

#[derive(Debug, Clone, PartialEq)]
/// Scan budgets of the decoder.
///
/// The two window limits default to a table keyed by file size; the other
/// fields are flat caps. All of them exist because the scans are heuristic:
/// they bound how much of a file is probed, not how much of it is valid.
pub struct DecoderSettings {
    /// Overrides the size-classed byte window of the stop-table scan.
    pub(crate) override_stop_scan_limit: Option<usize>,
    /// Overrides the size-classed byte window of the departure-section scan.
    pub(crate) override_time_scan_limit: Option<usize>,
    /// How many of the best-scanning sections get a full trip decode.
    pub(crate) max_sections_tried: usize,
    /// Byte length of the trip decode window from a chosen section.
    pub(crate) trip_decode_window: usize,
    /// Byte length of the P-record region.
    pub(crate) p_record_window: usize,
    /// At most this many P-records are kept.
    pub(crate) max_p_records: usize,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        DecoderSettings {
            override_stop_scan_limit: None,
            override_time_scan_limit: None,
            max_sections_tried: MAX_SECTIONS_TRIED,
            trip_decode_window: TRIP_DECODE_WINDOW,
            p_record_window: P_RECORD_WINDOW,
            max_p_records: MAX_P_RECORDS,
        }
    }
}

impl DecoderSettings {
    /// Byte window of the stop-table scan for a file of `file_size` bytes.
    ///
    /// Small files are scanned completely, larger ones only in a prefix
    /// where the table is found in practice.
    pub fn stop_scan_limit(&self, file_size: usize) -> usize {
        if let Some(limit) = self.override_stop_scan_limit {
            return limit;
        }
        if file_size < 1_000_000 {
            file_size
        } else if file_size < 10_000_000 {
            1_000_000
        } else if file_size < 40_000_000 {
            4_000_000
        } else {
            8_000_000
        }
    }

    /// Byte window of the departure-section scan for a file of `file_size`
    /// bytes.
    pub fn time_scan_limit(&self, file_size: usize) -> usize {
        if let Some(limit) = self.override_time_scan_limit {
            return limit;
        }
        if file_size < 1_000_000 {
            file_size
        } else if file_size < 10_000_000 {
            5_000_000
        } else {
            20_000_000
        }
    }

    pub fn set_override_stop_scan_limit(&mut self, limit: Option<usize>) {
        self.override_stop_scan_limit = limit;
    }

    pub fn set_override_time_scan_limit(&mut self, limit: Option<usize>) {
        self.override_time_scan_limit = limit;
    }

    pub fn get_max_sections_tried(&self) -> usize {
        self.max_sections_tried
    }

    pub fn set_max_sections_tried(&mut self, n: usize) {
        self.max_sections_tried = n;
    }

    pub fn get_trip_decode_window(&self) -> usize {
        self.trip_decode_window
    }

    pub fn set_trip_decode_window(&mut self, bytes: usize) {
        self.trip_decode_window = bytes;
    }

    pub fn get_p_record_window(&self) -> usize {
        self.p_record_window
    }

    pub fn set_p_record_window(&mut self, bytes: usize) {
        self.p_record_window = bytes;
    }

    pub fn get_max_p_records(&self) -> usize {
        self.max_p_records
    }

    pub fn set_max_p_records(&mut self, n: usize) {
        self.max_p_records = n;
    }
}
