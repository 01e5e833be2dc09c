/// Basic Error types.
#[derive(Debug)]
pub enum TtError {
    /// IoError from the std library.
    StdIoError(std::io::Error),
    /// Map file error (this is just a `std::io` error when mapping files).
    MapFile(std::io::Error),
    /// The fixed header is missing the TT/TimeTable/CHAPS markers, or the
    /// file is too short to carry it at all.
    HeaderMismatch,
    /// No candidate region in the scanned window parsed as a usable
    /// stop-name table.
    NoStopTable,
    /// None of the departure-word sections yielded a usable trip list.
    NoTrips,
    /// Serialisation/Deserialisation error.
    SerdeError(serde_json::Error),
    /// An error while reading or writing a GTFS table.
    GtfsTable { msg: String },
}

impl TtError {
    /// Whether this is one of the per-file decode failures, as opposed to an
    /// environment problem. Batch callers report these and carry on.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            TtError::HeaderMismatch | TtError::NoStopTable | TtError::NoTrips
        )
    }
}

impl From<std::io::Error> for TtError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}

impl From<serde_json::Error> for TtError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerdeError(e)
    }
}

impl std::fmt::Display for TtError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::TtError::*;
        match self {
            StdIoError(x) => write!(fmt, "{}", x),
            MapFile(e) => write!(fmt, "Could not create file map: {}", e),
            HeaderMismatch => write!(fmt, "File does not carry a CHAPS TimeTable header"),
            NoStopTable => write!(fmt, "No usable stop-name table was found"),
            NoTrips => write!(fmt, "No departure section decoded into usable trips"),
            SerdeError(x) => write!(fmt, "{}", x),
            GtfsTable { msg } => write!(fmt, "GTFS table error: {}", msg),
        }
    }
}

impl From<TtError> for String {
    fn from(e: TtError) -> String {
        e.to_string()
    }
}

impl std::error::Error for TtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::TtError::*;
        match self {
            StdIoError(x) | MapFile(x) => x.source(),
            SerdeError(x) => x.source(),
            _ => None,
        }
    }
}
