//! Row definitions for the emitted GTFS tables.
//!
//! Only the columns this toolchain produces or consumes are modelled. Columns that are optional
//! in the wild are optional here too, each with its documented default; a feed written by
//! another tool and read back must not fail on a missing column.
use serde::{Deserialize, Serialize};

/// The tables making up one feed, in emission order.
pub const GTFS_FILES: [&str; 6] = [
    "agency.txt",
    "stops.txt",
    "routes.txt",
    "trips.txt",
    "stop_times.txt",
    "calendar.txt",
];

/// Transport category of a KOMPLET data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCategory {
    /// Data1: national and international rail.
    Rail,
    /// Data2: regional and long-distance buses.
    RegionalBus,
    /// Data3: city transit systems.
    CityTransit,
}

impl TransportCategory {
    /// Category of a KOMPLET subdirectory name, if it is one.
    pub fn from_data_dir(name: &str) -> Option<Self> {
        match name {
            "Data1" => Some(TransportCategory::Rail),
            "Data2" => Some(TransportCategory::RegionalBus),
            "Data3" => Some(TransportCategory::CityTransit),
            _ => None,
        }
    }

    /// The short code used in identifiers and output paths.
    pub fn code(&self) -> &'static str {
        match self {
            TransportCategory::Rail => "VL",
            TransportCategory::RegionalBus => "BUS",
            TransportCategory::CityTransit => "MHD",
        }
    }

    /// The GTFS `route_type` for routes of this category.
    pub fn route_type(&self) -> u8 {
        match self {
            TransportCategory::Rail => 2,
            TransportCategory::RegionalBus | TransportCategory::CityTransit => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyRow {
    pub agency_id: String,
    pub agency_name: String,
    pub agency_url: String,
    pub agency_timezone: String,
    #[serde(default)]
    pub agency_lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRow {
    pub stop_id: String,
    pub stop_name: String,
    #[serde(default)]
    pub stop_lat: Option<String>,
    #[serde(default)]
    pub stop_lon: Option<String>,
}

impl StopRow {
    /// Coordinates default to `0.0`: the binary format carries none, and
    /// downstream consumers expect the columns to be present.
    pub fn lat_or_default(&self) -> &str {
        self.stop_lat.as_deref().unwrap_or("0.0")
    }

    pub fn lon_or_default(&self) -> &str {
        self.stop_lon.as_deref().unwrap_or("0.0")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRow {
    pub route_id: String,
    pub agency_id: String,
    pub route_short_name: String,
    #[serde(default)]
    pub route_long_name: Option<String>,
    pub route_type: u8,
}

impl RouteRow {
    /// The long name defaults to the short name.
    pub fn long_name_or_default(&self) -> &str {
        self.route_long_name
            .as_deref()
            .unwrap_or(&self.route_short_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRow {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopTimeRow {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRow {
    pub service_id: String,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    pub start_date: String,
    pub end_date: String,
}

impl CalendarRow {
    /// The binary format yields no service days, so emitted feeds carry a
    /// single service running every day of a nominal validity window.
    pub fn all_days(service_id: String, start_date: &str, end_date: &str) -> Self {
        CalendarRow {
            service_id,
            monday: 1,
            tuesday: 1,
            wednesday: 1,
            thursday: 1,
            friday: 1,
            saturday: 1,
            sunday: 1,
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        }
    }
}
