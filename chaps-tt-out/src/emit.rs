//! Writing one decoded timetable as a GTFS feed directory.
use crate::tables::*;
use crate::{open_table_writer, table_err};

use chaps_tt_core::errors::TtError;
use chaps_tt_core::records::DecodedTimetable;

use log::debug;
use std::path::Path;

/// Nominal validity window stamped on emitted calendars. The binary input
/// has no recoverable service days, so the window is a placeholder that
/// keeps the feed structurally valid.
pub const SERVICE_START_DATE: &str = "20250101";
pub const SERVICE_END_DATE: &str = "20261231";

/// Row counts of one written feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSummary {
    pub stops: usize,
    pub trips: usize,
    pub stop_times: usize,
}

/// Write the six GTFS tables for one decoded timetable into `dir`.
///
/// The binary delimits neither agencies nor routes, so the feed gets one
/// synthetic agency and one route per source file; every decoded trip runs
/// on that route under a single every-day service.
pub fn write_feed(
    record: &DecodedTimetable,
    category: TransportCategory,
    dir: &Path,
) -> Result<FeedSummary, TtError> {
    std::fs::create_dir_all(dir)?;

    let stem = feed_stem(&record.source_file);
    let agency_id = format!("{}_{}", category.code(), stem);
    let route_id = "R1".to_string();
    let service_id = "SV1".to_string();

    let mut agencies = open_table_writer(dir, "agency.txt")?;
    agencies
        .serialize(AgencyRow {
            agency_id: agency_id.clone(),
            agency_name: format!("{} ({})", stem, category.code()),
            agency_url: "https://www.chaps.cz".to_string(),
            agency_timezone: "Europe/Prague".to_string(),
            agency_lang: Some("cs".to_string()),
        })
        .map_err(table_err)?;
    agencies.flush()?;

    let mut stops = open_table_writer(dir, "stops.txt")?;
    for (idx, name) in record.stops.iter().enumerate() {
        stops
            .serialize(StopRow {
                stop_id: stop_id(idx),
                stop_name: name.clone(),
                stop_lat: Some("0.0".to_string()),
                stop_lon: Some("0.0".to_string()),
            })
            .map_err(table_err)?;
    }
    stops.flush()?;

    let mut routes = open_table_writer(dir, "routes.txt")?;
    routes
        .serialize(RouteRow {
            route_id: route_id.clone(),
            agency_id,
            route_short_name: stem.to_string(),
            route_long_name: Some(format!("{} ({})", stem, category.code())),
            route_type: category.route_type(),
        })
        .map_err(table_err)?;
    routes.flush()?;

    let mut trips = open_table_writer(dir, "trips.txt")?;
    let mut stop_times = open_table_writer(dir, "stop_times.txt")?;
    let mut stop_time_count = 0usize;
    for (trip_no, trip) in record.trips.iter().enumerate() {
        let trip_id = format!("T{}", trip_no + 1);
        trips
            .serialize(TripRow {
                route_id: route_id.clone(),
                service_id: service_id.clone(),
                trip_id: trip_id.clone(),
            })
            .map_err(table_err)?;

        for (seq, &(stop_index, minute)) in trip.iter().enumerate() {
            let time = minute_to_hms(minute);
            stop_times
                .serialize(StopTimeRow {
                    trip_id: trip_id.clone(),
                    arrival_time: time.clone(),
                    departure_time: time,
                    stop_id: stop_id(stop_index as usize),
                    stop_sequence: (seq + 1) as u32,
                })
                .map_err(table_err)?;
            stop_time_count += 1;
        }
    }
    trips.flush()?;
    stop_times.flush()?;

    let mut calendar = open_table_writer(dir, "calendar.txt")?;
    calendar
        .serialize(CalendarRow::all_days(
            service_id,
            SERVICE_START_DATE,
            SERVICE_END_DATE,
        ))
        .map_err(table_err)?;
    calendar.flush()?;

    debug!(
        "wrote feed for {} into {}: {} stops, {} trips",
        record.source_file,
        dir.display(),
        record.stops.len(),
        record.trips.len()
    );

    Ok(FeedSummary {
        stops: record.stops.len(),
        trips: record.trips.len(),
        stop_times: stop_time_count,
    })
}

/// The identifier stem of a source file: its name without the extension.
pub(crate) fn feed_stem(source_file: &str) -> &str {
    source_file
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source_file)
}

fn stop_id(index: usize) -> String {
    format!("S{}", index + 1)
}

/// Render a minute of day as `HH:MM:SS`. GTFS times past midnight keep
/// counting hours, so minute 1440 renders as `24:00:00`.
pub fn minute_to_hms(minute: u16) -> String {
    format!("{:02}:{:02}:00", minute / 60, minute % 60)
}
