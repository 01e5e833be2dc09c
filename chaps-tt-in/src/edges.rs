//! Flattening trips into the directed travel-time graph.
use chaps_tt_core::{EdgeSamples, Trip, MAX_TRAVEL_TIME, MIN_TRAVEL_TIME};

/// Collect a travel-time sample for every adjacent stop pair of every trip.
/// Self-loops and implausible durations (outside one minute to one hour)
/// are discarded.
pub fn extract_edges(trips: &[Trip]) -> EdgeSamples {
    let mut edges = EdgeSamples::new();
    for trip in trips {
        for pair in trip.windows(2) {
            let (from, depart) = pair[0];
            let (to, arrive) = pair[1];
            if from == to {
                continue;
            }
            let travel_time = match arrive.checked_sub(depart) {
                Some(delta) => delta,
                None => continue,
            };
            if !(MIN_TRAVEL_TIME..=MAX_TRAVEL_TIME).contains(&travel_time) {
                continue;
            }
            edges.entry((from, to)).or_insert_with(Vec::new).push(travel_time);
        }
    }
    edges
}
