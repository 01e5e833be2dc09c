//! Scrubbing the selected stop table.
//!
//! Even a winning table carries entries that are not stops: points of interest, legend text and
//! the vendor's internal control strings. Trips also reference only part of the table. The
//! scrubber drops both kinds of junk, densely re-indexes the survivors and rewrites trips and
//! edges to the new indices.
use chaps_tt_core::patterns::is_bad_stop_name;
use chaps_tt_core::{EdgeSamples, Trip};

use log::debug;
use std::collections::HashSet;

/// The old-index to new-index mapping built while scrubbing. Owned by the
/// scrub pass and dropped with it; indices it hands out are final.
pub(crate) struct StopRemap {
    forward: Vec<Option<u16>>,
}

impl StopRemap {
    fn new(old_len: usize) -> Self {
        StopRemap {
            forward: vec![None; old_len],
        }
    }

    fn insert(&mut self, old: usize, new: u16) {
        self.forward[old] = Some(new);
    }

    fn get(&self, old: u16) -> Option<u16> {
        self.forward.get(old as usize).copied().flatten()
    }
}

/// Scrub `stops` in place, rewriting `trips` and `edges` to the surviving
/// indices. Returns the number of stops removed.
///
/// Entries naming a bad stop are dropped from their trips first, and trips
/// that shrink below two entries or a single distinct stop are discarded; a
/// stop then survives iff it still has a reference and a clean name. When
/// nothing would survive the pass leaves the state untouched, so a
/// junk-heavy fallback table still produces output.
pub fn scrub_stops(
    stops: &mut Vec<String>,
    trips: &mut Vec<Trip>,
    edges: &mut EdgeSamples,
) -> usize {
    if stops.is_empty() || trips.is_empty() {
        return 0;
    }

    let bad: Vec<bool> = stops.iter().map(|name| is_bad_stop_name(name)).collect();

    // Rewrite trips against the bad-name set alone first; what remains
    // referenced afterwards decides which stops survive.
    let filtered_trips: Vec<Trip> = trips
        .iter()
        .map(|trip| {
            trip.iter()
                .filter(|&&(stop, _)| !bad.get(stop as usize).copied().unwrap_or(true))
                .copied()
                .collect::<Trip>()
        })
        .filter(|trip| trip.len() >= 2 && distinct_stops(trip) >= 2)
        .collect();

    let mut referenced = vec![false; stops.len()];
    for trip in &filtered_trips {
        for &(stop, _) in trip {
            referenced[stop as usize] = true;
        }
    }

    let mut remap = StopRemap::new(stops.len());
    let mut kept: Vec<String> = Vec::new();
    for (old, name) in stops.iter().enumerate() {
        if referenced[old] {
            remap.insert(old, kept.len() as u16);
            kept.push(name.clone());
        }
    }

    if kept.is_empty() {
        debug!("stop scrub skipped: no stop would survive");
        return 0;
    }
    let removed = stops.len() - kept.len();
    let dropped_trips = trips.len() - filtered_trips.len();

    *trips = filtered_trips
        .into_iter()
        .map(|trip| {
            trip.into_iter()
                .filter_map(|(stop, minute)| remap.get(stop).map(|new| (new, minute)))
                .collect()
        })
        .collect();

    let old_edges = std::mem::take(edges);
    for ((from, to), samples) in old_edges {
        if let (Some(new_from), Some(new_to)) = (remap.get(from), remap.get(to)) {
            edges.insert((new_from, new_to), samples);
        }
    }

    *stops = kept;

    if removed > 0 || dropped_trips > 0 {
        debug!(
            "scrubbed stops: removed {}, dropped {} trips",
            removed, dropped_trips
        );
    }
    removed
}

fn distinct_stops(trip: &Trip) -> usize {
    trip.iter().map(|&(stop, _)| stop).collect::<HashSet<u16>>().len()
}
