//! Merging several emitted GTFS feeds into one combined feed.
//!
//! Every source keeps its own identifier space, so the merger rewrites all identifiers through
//! freshly allocated ones and per-source old-to-new maps. Stops are deduplicated by exact name;
//! the first source to name a stop wins and later sources map onto its identifier. Rows that
//! reference an identifier the merger never saw are dropped with a warning rather than invented.
use crate::tables::*;
use crate::{read_table_rows, write_table_rows};

use chaps_tt_core::errors::TtError;

use fnv::FnvHashMap;
use log::{info, warn};
use std::path::Path;

/// Monotonic identifier allocation for merged entities. Owned by the
/// merger; identifiers are never reused.
#[derive(Debug, Default)]
struct IdAllocator {
    next_agency: u32,
    next_stop: u32,
    next_route: u32,
    next_trip: u32,
    next_service: u32,
}

impl IdAllocator {
    fn agency(&mut self) -> String {
        self.next_agency += 1;
        format!("AG_{}", self.next_agency)
    }

    fn stop(&mut self) -> String {
        self.next_stop += 1;
        format!("ST_{}", self.next_stop)
    }

    fn route(&mut self) -> String {
        self.next_route += 1;
        format!("RT_{}", self.next_route)
    }

    fn trip(&mut self) -> String {
        self.next_trip += 1;
        format!("TR_{}", self.next_trip)
    }

    fn service(&mut self) -> String {
        self.next_service += 1;
        format!("SV_{}", self.next_service)
    }
}

/// Accumulates feeds added with [`FeedMerger::add_feed`] and writes the
/// combined result with [`FeedMerger::export`].
#[derive(Default)]
pub struct FeedMerger {
    ids: IdAllocator,
    agencies: Vec<AgencyRow>,
    stops: Vec<StopRow>,
    routes: Vec<RouteRow>,
    trips: Vec<TripRow>,
    stop_times: Vec<StopTimeRow>,
    calendars: Vec<CalendarRow>,
    /// Merged stop id per exact stop name, for deduplication.
    stop_by_name: FnvHashMap<String, String>,
    /// `"<source>:<old_id>"` to merged id, per entity kind.
    agency_map: FnvHashMap<String, String>,
    stop_map: FnvHashMap<String, String>,
    route_map: FnvHashMap<String, String>,
    trip_map: FnvHashMap<String, String>,
    service_map: FnvHashMap<String, String>,
}

impl FeedMerger {
    pub fn new() -> Self {
        Default::default()
    }

    /// Ingest one feed directory. `source` labels the feed's identifier
    /// space; it must be unique across added feeds.
    pub fn add_feed(&mut self, dir: &Path, source: &str) -> Result<(), TtError> {
        let new_stops = self.load_agencies_and_stops(dir, source)?;
        self.load_routes(dir, source)?;
        self.load_calendars(dir, source)?;
        self.load_trips(dir, source)?;
        self.load_stop_times(dir, source)?;
        info!(
            "merged feed {}: {} new stops, totals now {} stops / {} trips",
            source,
            new_stops,
            self.stops.len(),
            self.trips.len()
        );
        Ok(())
    }

    fn source_key(source: &str, old_id: &str) -> String {
        format!("{}:{}", source, old_id)
    }

    fn load_agencies_and_stops(&mut self, dir: &Path, source: &str) -> Result<usize, TtError> {
        for row in read_table_rows::<AgencyRow>(dir, "agency.txt")? {
            let new_id = self.ids.agency();
            self.agency_map
                .insert(Self::source_key(source, &row.agency_id), new_id.clone());
            self.agencies.push(AgencyRow {
                agency_id: new_id,
                ..row
            });
        }

        let mut new_stops = 0usize;
        for row in read_table_rows::<StopRow>(dir, "stops.txt")? {
            let key = Self::source_key(source, &row.stop_id);
            if let Some(existing) = self.stop_by_name.get(&row.stop_name) {
                self.stop_map.insert(key, existing.clone());
                continue;
            }
            let new_id = self.ids.stop();
            self.stop_map.insert(key, new_id.clone());
            self.stop_by_name
                .insert(row.stop_name.clone(), new_id.clone());
            self.stops.push(StopRow {
                stop_id: new_id,
                stop_name: row.stop_name,
                stop_lat: Some(row.stop_lat.unwrap_or_else(|| "0.0".to_string())),
                stop_lon: Some(row.stop_lon.unwrap_or_else(|| "0.0".to_string())),
            });
            new_stops += 1;
        }
        Ok(new_stops)
    }

    fn load_routes(&mut self, dir: &Path, source: &str) -> Result<(), TtError> {
        for row in read_table_rows::<RouteRow>(dir, "routes.txt")? {
            let new_id = self.ids.route();
            self.route_map
                .insert(Self::source_key(source, &row.route_id), new_id.clone());
            // An unknown agency id is carried through unchanged; agencies
            // are reference data, not a join that may drop rows.
            let long_name = row.long_name_or_default().to_string();
            let agency_id = self
                .agency_map
                .get(&Self::source_key(source, &row.agency_id))
                .cloned()
                .unwrap_or(row.agency_id);
            self.routes.push(RouteRow {
                route_id: new_id,
                agency_id,
                route_short_name: row.route_short_name,
                route_long_name: Some(long_name),
                route_type: row.route_type,
            });
        }
        Ok(())
    }

    fn load_calendars(&mut self, dir: &Path, source: &str) -> Result<(), TtError> {
        for row in read_table_rows::<CalendarRow>(dir, "calendar.txt")? {
            let new_id = self.ids.service();
            self.service_map
                .insert(Self::source_key(source, &row.service_id), new_id.clone());
            self.calendars.push(CalendarRow {
                service_id: new_id,
                ..row
            });
        }
        Ok(())
    }

    fn load_trips(&mut self, dir: &Path, source: &str) -> Result<(), TtError> {
        for row in read_table_rows::<TripRow>(dir, "trips.txt")? {
            let route_id = match self.route_map.get(&Self::source_key(source, &row.route_id)) {
                Some(id) => id.clone(),
                None => {
                    warn!(
                        "{}: trip {} references unknown route {}, dropped",
                        source, row.trip_id, row.route_id
                    );
                    continue;
                }
            };
            let service_id = self
                .service_map
                .get(&Self::source_key(source, &row.service_id))
                .cloned()
                .unwrap_or(row.service_id);
            let new_id = self.ids.trip();
            self.trip_map
                .insert(Self::source_key(source, &row.trip_id), new_id.clone());
            self.trips.push(TripRow {
                route_id,
                service_id,
                trip_id: new_id,
            });
        }
        Ok(())
    }

    fn load_stop_times(&mut self, dir: &Path, source: &str) -> Result<(), TtError> {
        for row in read_table_rows::<StopTimeRow>(dir, "stop_times.txt")? {
            let trip_id = match self.trip_map.get(&Self::source_key(source, &row.trip_id)) {
                Some(id) => id.clone(),
                None => {
                    warn!(
                        "{}: stop time references unknown trip {}, dropped",
                        source, row.trip_id
                    );
                    continue;
                }
            };
            let stop_id = match self.stop_map.get(&Self::source_key(source, &row.stop_id)) {
                Some(id) => id.clone(),
                None => {
                    warn!(
                        "{}: stop time references unknown stop {}, dropped",
                        source, row.stop_id
                    );
                    continue;
                }
            };
            self.stop_times.push(StopTimeRow {
                trip_id,
                stop_id,
                ..row
            });
        }
        Ok(())
    }

    /// Write the merged feed into `dir`.
    pub fn export(&self, dir: &Path) -> Result<(), TtError> {
        std::fs::create_dir_all(dir)?;

        write_table_rows(dir, "agency.txt", &self.agencies)?;
        write_table_rows(dir, "stops.txt", &self.stops)?;
        write_table_rows(dir, "routes.txt", &self.routes)?;
        write_table_rows(dir, "trips.txt", &self.trips)?;
        write_table_rows(dir, "stop_times.txt", &self.stop_times)?;
        write_table_rows(dir, "calendar.txt", &self.calendars)?;

        info!(
            "exported merged feed to {}: {} agencies, {} stops, {} routes, {} trips, {} stop times",
            dir.display(),
            self.agencies.len(),
            self.stops.len(),
            self.routes.len(),
            self.trips.len(),
            self.stop_times.len()
        );
        Ok(())
    }

    pub fn get_agencies(&self) -> &[AgencyRow] {
        &self.agencies
    }

    pub fn get_stops(&self) -> &[StopRow] {
        &self.stops
    }

    pub fn get_routes(&self) -> &[RouteRow] {
        &self.routes
    }

    pub fn get_trips(&self) -> &[TripRow] {
        &self.trips
    }

    pub fn get_stop_times(&self) -> &[StopTimeRow] {
        &self.stop_times
    }

    pub fn get_calendars(&self) -> &[CalendarRow] {
        &self.calendars
    }
}
