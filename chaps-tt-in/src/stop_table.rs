//! Locating the stop-name table.
//!
//! A `.tt` file holds many string-table-like regions (stop names, but also legends, route notes
//! and points of interest), all in the same offset-table layout and at no fixed position. The
//! locator walks the header-prefixed region, tries to parse the layout at every step, scores
//! whatever parses, and keeps the best scoring candidate.
use chaps_tt_core::errors::TtError;
use chaps_tt_core::patterns::{is_route_note, is_service_text, is_vendor_text};
use chaps_tt_core::text::{clean_name, read_u32_le};
use chaps_tt_core::{DecoderSettings, StopTable, MAX_STOP_ITEMS, STOP_SCAN_START};

use log::{debug, warn};
use std::collections::HashSet;

/// Candidates with fewer names than this are never usable as a stop table.
const MIN_CANDIDATE_NAMES: usize = 10;
/// Composite score a candidate must reach to be accepted outright.
const ACCEPT_SCORE: f64 = 20.0;

/// Scan the configured window for the best stop-name table.
///
/// A candidate below [`ACCEPT_SCORE`] can still win: if nothing clears the
/// threshold the best candidate of usable length is kept and flagged, which
/// salvages partially corrupt files at the cost of quality. With no usable
/// candidate at all the decode fails with [`TtError::NoStopTable`].
pub fn locate_stop_table(
    data: &[u8],
    settings: &DecoderSettings,
) -> Result<StopTable, TtError> {
    let limit = settings.stop_scan_limit(data.len());
    let max_offset = (STOP_SCAN_START + limit).min(data.len().saturating_sub(8));

    let mut best: Option<(f64, usize, Vec<String>)> = None;
    let mut candidates_found = 0usize;

    // The vendor's alignment varies from file to file, so each 4-byte step
    // is tried at all four 1-byte shifts.
    for alignment in 0..4usize {
        let mut offset = STOP_SCAN_START + alignment;
        while offset < max_offset {
            if let Some(names) = extract_candidate(data, offset) {
                candidates_found += 1;
                let score = score_candidate(&names);
                if best.as_ref().map_or(true, |(s, _, _)| score > *s) {
                    best = Some((score, offset, names));
                }
            }
            offset += 4;
        }
    }

    match best {
        Some((score, offset, names)) if names.len() >= MIN_CANDIDATE_NAMES => {
            let fallback = score < ACCEPT_SCORE;
            if fallback {
                warn!(
                    "low-quality stop table kept at 0x{:06X}: {} stops, score {:.1}",
                    offset,
                    names.len(),
                    score
                );
            } else {
                debug!(
                    "stop candidates={}, selected offset=0x{:06X}, stops={}, score={:.1}",
                    candidates_found,
                    offset,
                    names.len(),
                    score
                );
            }
            Ok(StopTable::new(names, offset, score, fallback))
        }
        _ => Err(TtError::NoStopTable),
    }
}

/// Try to parse the canonical string-table layout at `offset`.
///
/// Layout, all words little-endian: `total_bytes`, `item_count` (where
/// `total_bytes == item_count * 4`), `item_count` weakly increasing string
/// offsets, the blob size twice, then the string blob itself. The last
/// string offset must equal the blob size; offsets bound `item_count - 1`
/// names. Any failed check rejects the candidate; nothing here is an error.
pub(crate) fn extract_candidate(data: &[u8], offset: usize) -> Option<Vec<String>> {
    let total_bytes = read_u32_le(data, offset)? as usize;
    let item_count = read_u32_le(data, offset.checked_add(4)?)?;
    if total_bytes != (item_count as usize).checked_mul(4)? {
        return None;
    }
    if item_count < 2 || item_count > MAX_STOP_ITEMS {
        return None;
    }

    let offsets_start = offset.checked_add(8)?;
    let offsets_end = offsets_start.checked_add(total_bytes)?;
    if offsets_end.checked_add(8)? > data.len() {
        return None;
    }

    let mut offsets = Vec::with_capacity(item_count as usize);
    let mut prev = 0u32;
    for i in 0..item_count as usize {
        let off = read_u32_le(data, offsets_start + i * 4)?;
        if i > 0 && off < prev {
            return None;
        }
        offsets.push(off);
        prev = off;
    }

    let blob_size = read_u32_le(data, offsets_end)?;
    let blob_size_check = read_u32_le(data, offsets_end + 4)?;
    if blob_size != blob_size_check || blob_size == 0 {
        return None;
    }
    if *offsets.last()? != blob_size {
        return None;
    }

    let blob_start = offsets_end.checked_add(8)?;
    let blob_end = blob_start.checked_add(blob_size as usize)?;
    if blob_end > data.len() {
        return None;
    }
    let blob = &data[blob_start..blob_end];

    let mut names = Vec::with_capacity(item_count as usize - 1);
    for pair in offsets.windows(2) {
        let bytes = blob.get(pair[0] as usize..pair[1] as usize)?;
        names.push(clean_name(bytes));
    }
    Some(names)
}

/// Composite quality score of a candidate name list.
///
/// Rewards size, average name length and uniqueness; penalises every kind
/// of non-stop text the format is known to mix into string tables. The
/// fraction-based penalties exist because a table that is one quarter
/// legend text is junk no matter how many real names it also carries.
pub(crate) fn score_candidate(names: &[String]) -> f64 {
    if names.len() < MIN_CANDIDATE_NAMES {
        return f64::NEG_INFINITY;
    }
    let count = names.len() as f64;

    let mut vendor_hits = 0usize;
    let mut service_hits = 0usize;
    let mut note_hits = 0usize;
    let mut empty_count = 0usize;
    let mut short_count = 0usize;
    let mut very_long_count = 0usize;
    let mut markup_count = 0usize;
    let mut total_chars = 0usize;
    let mut alpha_chars = 0usize;

    for name in names {
        if is_vendor_text(name) {
            vendor_hits += 1;
        }
        if is_service_text(name) {
            service_hits += 1;
        }
        if is_route_note(name) {
            note_hits += 1;
        }
        if name.is_empty() {
            empty_count += 1;
        }
        let char_len = name.chars().count();
        if name.trim().chars().count() <= 1 {
            short_count += 1;
        }
        if char_len > 45 {
            very_long_count += 1;
        }
        if name.contains('{') || name.contains('}') || name.contains('¤') || name.contains('|') {
            markup_count += 1;
        }
        total_chars += char_len;
        alpha_chars += name.chars().filter(|c| c.is_alphabetic()).count();
    }

    let unique: HashSet<&str> = names.iter().map(String::as_str).collect();
    let unique_ratio = unique.len() as f64 / count;
    let avg_len = total_chars as f64 / count;
    let alpha_ratio = alpha_chars as f64 / total_chars.max(1) as f64;

    let mut score = count;
    score += avg_len.min(30.0) * 2.0;
    score += unique_ratio * 35.0;
    score -= vendor_hits as f64 * 15.0;
    score -= service_hits as f64 * 10.0;
    score -= note_hits as f64 * 10.0;
    score -= empty_count as f64 * 20.0;
    score -= short_count as f64 * 4.0;
    score -= very_long_count as f64 * 6.0;
    score -= markup_count as f64 * 15.0;

    if service_hits as f64 / count > 0.25 {
        score -= 80.0;
    }
    if note_hits as f64 / count > 0.2 {
        score -= 80.0;
    }
    if alpha_ratio < 0.45 {
        score -= 30.0;
    }
    if unique_ratio < 0.6 {
        score -= 25.0;
    }
    if very_long_count as f64 / count > 0.2 {
        score -= 50.0;
    }

    score
}
