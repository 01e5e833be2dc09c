//! Roundtrip tests: feeds are written with this crate, read back through the same row
//! definitions, and merged the way the batch driver merges them.
use chaps_tt_core::records::{DecodedTimetable, EdgeSamples};

mod feed_roundtrip;

/// A decoded timetable built directly from parts, bypassing the decoder.
fn record(source_file: &str, stops: &[&str], trips: Vec<Vec<(u16, u16)>>) -> DecodedTimetable {
    DecodedTimetable::assemble(
        source_file.to_string(),
        stops.iter().map(|s| s.to_string()).collect(),
        trips,
        &EdgeSamples::new(),
        0,
        0x40,
        0x400,
        42.0,
    )
}

mod times {
    use crate::emit::minute_to_hms;

    #[test]
    fn minutes_render_as_hms() {
        assert_eq!(minute_to_hms(0), "00:00:00");
        assert_eq!(minute_to_hms(480), "08:00:00");
        assert_eq!(minute_to_hms(1439), "23:59:00");
        // GTFS times past midnight keep counting hours.
        assert_eq!(minute_to_hms(1440), "24:00:00");
    }
}

mod optional_columns {
    use crate::read_table_rows;
    use crate::tables::StopRow;
    use std::io::Write;

    #[test]
    fn missing_coordinates_read_as_defaults() {
        let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
        let mut file = std::fs::File::create(dir.path().join("stops.txt")).unwrap();
        writeln!(file, "stop_id,stop_name").unwrap();
        writeln!(file, "S1,Brno hl.n.").unwrap();
        drop(file);

        let rows: Vec<StopRow> = read_table_rows(dir.path(), "stops.txt").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stop_lat, None);
        assert_eq!(rows[0].lat_or_default(), "0.0");
        assert_eq!(rows[0].lon_or_default(), "0.0");
    }

    #[test]
    fn missing_table_reads_as_empty() {
        let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
        let rows: Vec<StopRow> = read_table_rows(dir.path(), "stops.txt").unwrap();
        assert!(rows.is_empty());
    }
}
