//! Locating and decoding the departure-word sections.
//!
//! Departure records are packed 32-bit words somewhere in the file, again at no fixed position.
//! A coarse scan first collects offsets whose next 30 words look like departures; the best
//! sections are then fully decoded into trips and the decode whose shape scores highest wins.
use chaps_tt_core::errors::TtError;
use chaps_tt_core::text::TimeWord;
use chaps_tt_core::{
    DecoderSettings, Trip, MAX_MINUTE, MAX_MINUTE_JUMP, MAX_SAME_MINUTE_STREAK,
    SECTION_PROBE_WORDS, TIME_SCAN_START, TIME_SCAN_STRIDE,
};

use log::debug;
use std::collections::HashSet;

/// A probe must see at least this many plausible words,
const MIN_PROBE_VALID: usize = 10;
/// strictly more than this many distinct minute values,
const MIN_PROBE_MINUTES: usize = 5;
/// and strictly more than this many distinct stop indices.
const MIN_PROBE_STOPS: usize = 3;

/// A candidate departure section as recorded by the coarse scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCandidate {
    /// Byte offset the probe succeeded at.
    pub offset: usize,
    /// `valid_words * unique_minutes * unique_stops`.
    pub scan_score: u64,
    pub valid_words: usize,
    pub unique_minutes: usize,
    pub unique_stops: usize,
}

/// Probe the configured window with a coarse stride (at all four byte
/// alignments) and return the passing candidates, best scan score first.
pub fn find_time_sections(data: &[u8], settings: &DecoderSettings) -> Vec<SectionCandidate> {
    let limit = settings.time_scan_limit(data.len()).min(data.len());

    let mut sections = Vec::new();
    let mut start = TIME_SCAN_START;
    while start < limit {
        for alignment in 0..4usize {
            if let Some(candidate) = probe_section(data, start + alignment) {
                sections.push(candidate);
            }
        }
        start += TIME_SCAN_STRIDE;
    }

    sections.sort_by(|a, b| b.scan_score.cmp(&a.scan_score));
    sections
}

fn probe_section(data: &[u8], offset: usize) -> Option<SectionCandidate> {
    let mut valid_words = 0usize;
    let mut minutes_seen: HashSet<u16> = HashSet::new();
    let mut stops_seen: HashSet<u8> = HashSet::new();

    for i in 0..SECTION_PROBE_WORDS {
        match TimeWord::read(data, offset + i * 4) {
            Some(word) => {
                if word.is_plausible() {
                    valid_words += 1;
                    minutes_seen.insert(word.minutes);
                    stops_seen.insert(word.stop_index);
                }
            }
            None => break,
        }
    }

    if valid_words >= MIN_PROBE_VALID
        && minutes_seen.len() > MIN_PROBE_MINUTES
        && stops_seen.len() > MIN_PROBE_STOPS
    {
        Some(SectionCandidate {
            offset,
            scan_score: (valid_words * minutes_seen.len() * stops_seen.len()) as u64,
            valid_words,
            unique_minutes: minutes_seen.len(),
            unique_stops: stops_seen.len(),
        })
    } else {
        None
    }
}

/// Decode trips from a section by streaming words forward.
///
/// Words with a set marker byte, an out-of-day minute or a stop index
/// beyond the table are skipped without touching the running state. A trip
/// boundary is a time regression or a forward jump of more than
/// [`MAX_MINUTE_JUMP`] minutes; a closed trip is kept only with two or more
/// entries. Exact repeats of the previous entry and long same-minute runs
/// are binary noise and are dropped.
pub fn decode_trips_at(
    data: &[u8],
    start: usize,
    stop_count: usize,
    settings: &DecoderSettings,
) -> Vec<Trip> {
    let mut trips: Vec<Trip> = Vec::new();
    let mut current: Trip = Vec::new();
    let mut prev_minutes: Option<u16> = None;
    let mut same_minute_streak = 0u32;

    let end = start
        .saturating_add(settings.get_trip_decode_window())
        .min(data.len());

    let mut offset = start;
    while offset + 4 <= end {
        let word = match TimeWord::read(data, offset) {
            Some(w) => w,
            None => break,
        };
        offset += 4;

        if word.marker != 0 || word.minutes > MAX_MINUTE {
            continue;
        }
        if stop_count == 0 || (word.stop_index as usize) >= stop_count {
            continue;
        }
        let entry = (word.stop_index as u16, word.minutes);

        if let Some(prev) = prev_minutes {
            // Time going backwards ends the current run.
            if word.minutes < prev {
                if current.len() >= 2 {
                    trips.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                same_minute_streak = 0;
            }
            // Huge forward jumps mark a transition between blocks.
            if word.minutes > prev && word.minutes - prev > MAX_MINUTE_JUMP {
                if current.len() >= 2 {
                    trips.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                same_minute_streak = 0;
            }
        }

        if current.last() == Some(&entry) {
            prev_minutes = Some(word.minutes);
            continue;
        }

        if prev_minutes == Some(word.minutes) {
            same_minute_streak += 1;
            // More than a few stop changes within one minute is noise.
            if same_minute_streak > MAX_SAME_MINUTE_STREAK {
                prev_minutes = Some(word.minutes);
                continue;
            }
        } else {
            same_minute_streak = 1;
        }

        current.push(entry);
        prev_minutes = Some(word.minutes);
    }

    if current.len() >= 2 {
        trips.push(current);
    }
    trips
}

/// Shape score of a decoded trip list. Only trips visiting at least two
/// distinct stops count; a list with none scores negative infinity.
pub(crate) fn score_trips(trips: &[Trip]) -> f64 {
    if trips.is_empty() {
        return f64::NEG_INFINITY;
    }

    let valid: Vec<&Trip> = trips
        .iter()
        .filter(|trip| {
            let distinct: HashSet<u16> = trip.iter().map(|&(stop, _)| stop).collect();
            distinct.len() >= 2
        })
        .collect();
    if valid.is_empty() {
        return f64::NEG_INFINITY;
    }

    let total_records: usize = valid.iter().map(|trip| trip.len()).sum();
    let unique_stops: HashSet<u16> = valid
        .iter()
        .flat_map(|trip| trip.iter().map(|&(stop, _)| stop))
        .collect();
    let avg_len = total_records as f64 / valid.len() as f64;
    let long_trips = valid.iter().filter(|trip| trip.len() >= 6).count();

    let mut score = total_records as f64;
    score += valid.len() as f64 * 5.0;
    score += unique_stops.len() as f64 * 2.0;
    score += avg_len * 3.0;
    score += long_trips as f64 * 8.0;

    if avg_len < 2.2 {
        score -= 120.0;
    }
    if unique_stops.len() < 4 {
        score -= 80.0;
    }

    score
}

/// Fully decode the best-scanning sections and keep the trip list whose
/// combined score (shape score plus a small scan-score tiebreaker) is
/// highest. Fails with [`TtError::NoTrips`] when nothing usable decodes.
pub fn select_trips(
    data: &[u8],
    sections: &[SectionCandidate],
    stop_count: usize,
    settings: &DecoderSettings,
) -> Result<(Vec<Trip>, usize), TtError> {
    let mut best: Option<(f64, Vec<Trip>, usize)> = None;

    for section in sections.iter().take(settings.get_max_sections_tried()) {
        let trips = decode_trips_at(data, section.offset, stop_count, settings);
        if trips.is_empty() {
            continue;
        }

        let trip_score = score_trips(&trips);
        if trip_score == f64::NEG_INFINITY {
            continue;
        }
        let combined = trip_score + section.scan_score as f64 / 1000.0;

        if best.as_ref().map_or(true, |(score, _, _)| combined > *score) {
            best = Some((combined, trips, section.offset));
        }
    }

    match best {
        Some((score, trips, offset)) => {
            debug!(
                "time sections={}, selected offset=0x{:06X}, trips={}, score={:.1}",
                sections.len(),
                offset,
                trips.len(),
                score
            );
            Ok((trips, offset))
        }
        None => Err(TtError::NoTrips),
    }
}
