//! Extraction of P-records: the secondary text records that carry route metadata.
//!
//! They are useful as hints and diagnostics only, so this scan is best effort; an empty result
//! never fails a decode.
use chaps_tt_core::text::decode_cp1250;
use chaps_tt_core::{DecoderSettings, P_RECORD_START};

/// The two-byte separator that terminates each record.
const SEPARATOR: [u8; 2] = [0xA4, 0xA4];

/// Scan the P-record region. Records begin with an ASCII `P` and run up to
/// the separator; the scan stops 100 bytes short of its window.
pub fn find_p_records(data: &[u8], settings: &DecoderSettings) -> Vec<String> {
    let start = P_RECORD_START;
    let end = (start.saturating_add(settings.get_p_record_window())).min(data.len());

    let mut records = Vec::new();
    let mut i = start;
    while i + 100 < end {
        if data[i] == b'P' {
            let mut record_end = i + 1;
            while record_end < end && data.get(record_end..record_end + 2) != Some(&SEPARATOR[..]) {
                record_end += 1;
            }
            let record = decode_cp1250(&data[i..record_end]);
            if record.starts_with('P') {
                records.push(record);
            }
            i = record_end + 2;
        } else {
            i += 1;
        }
    }

    records.truncate(settings.get_max_p_records());
    records
}
