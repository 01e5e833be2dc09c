mod text {
    use crate::text::*;

    #[test]
    fn cp1250_diacritics() {
        // "Nádraží" in code page 1250.
        let raw = [b'N', 0xE1, b'd', b'r', b'a', 0x9E, 0xED];
        assert_eq!(decode_cp1250(&raw), "Nádraží");
    }

    #[test]
    fn clean_name_strips_padding() {
        let raw = [b' ', b'B', b'r', b'n', b'o', 0, 0, 0];
        assert_eq!(clean_name(&raw), "Brno");
    }

    #[test]
    fn clean_name_handles_undefined_bytes() {
        // 0x81 is unassigned in cp1250 and must not fail the decode.
        let raw = [0x81, b'X'];
        let name = clean_name(&raw);
        assert!(name.ends_with('X'));
    }

    #[test]
    fn read_u32_le_bounds() {
        let data = [1u8, 0, 0, 0, 2];
        assert_eq!(read_u32_le(&data, 0), Some(1));
        assert_eq!(read_u32_le(&data, 2), None);
        assert_eq!(read_u32_le(&data, usize::MAX), None);
    }

    #[test]
    fn time_word_unpack() {
        let word = TimeWord::unpack(TimeWord::pack(7, 480));
        assert_eq!(word.stop_index, 7);
        assert_eq!(word.marker, 0);
        assert_eq!(word.minutes, 480);
        assert!(word.is_plausible());
    }

    #[test]
    fn time_word_drops_top_minute_bit() {
        let raw = TimeWord::pack(3, 600) | 0x8000_0000;
        let word = TimeWord::unpack(raw);
        assert_eq!(word.minutes, 600);
        assert!(word.is_plausible());
    }

    #[test]
    fn time_word_plausibility() {
        assert!(!TimeWord::unpack(0x0000_0100).is_plausible()); // marker byte set
        assert!(!TimeWord::unpack(TimeWord::pack(0, 1441)).is_plausible());
        assert!(TimeWord::unpack(TimeWord::pack(0, 1440)).is_plausible());
    }
}

mod patterns {
    use crate::patterns::*;

    #[test]
    fn service_text_is_case_insensitive() {
        assert!(is_service_text("Jede v Pracovních dnech"));
        assert!(is_service_text("PREMÁVA denne"));
        assert!(is_service_text("an Arbeitstagen"));
        assert!(!is_service_text("Praha hl.n."));
    }

    #[test]
    fn vendor_text() {
        assert!(is_vendor_text("Copyright CHAPS spol. s r.o."));
        assert!(is_vendor_text("https://example.com"));
        assert!(!is_vendor_text("Kolín"));
    }

    #[test]
    fn route_notes() {
        assert!(is_route_note("Na lince platí tarif IDS"));
        assert!(is_route_note("{l}poznámka"));
        assert!(!is_route_note("Ostrava-Svinov"));
    }

    #[test]
    fn poi_names() {
        assert!(is_poi("UniCredit Bank, pobočka Praha"));
        assert!(is_poi("Česká spořitelna a.s."));
        assert!(!is_poi("Plzeň hl.n."));
    }

    #[test]
    fn bad_stop_star_marker() {
        // Short all-alphabetic starred strings are internal control codes.
        assert!(is_bad_stop_name("*AB"));
        assert!(is_bad_stop_name("*abcde"));
        // A bare star, digits after the star, or long tails are kept.
        assert!(!is_bad_stop_name("*"));
        assert!(!is_bad_stop_name("*A1"));
        assert!(!is_bad_stop_name("*abcdef"));
    }

    #[test]
    fn bad_stop_markup_and_empties() {
        assert!(is_bad_stop_name(""));
        assert!(is_bad_stop_name("   "));
        assert!(is_bad_stop_name("¤¤legenda"));
        assert!(is_bad_stop_name("text {L} text"));
        assert!(!is_bad_stop_name("Brno, Mendlovo nám."));
    }
}

mod records {
    use crate::records::*;

    fn samples() -> EdgeSamples {
        let mut edges = EdgeSamples::new();
        edges.insert((0, 1), vec![5]);
        edges.insert((1, 2), vec![1, 2, 2]);
        edges
    }

    #[test]
    fn edge_summary_statistics() {
        let stops = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let summaries = summarise_edges(&samples(), &stops);

        let first = &summaries["0->1"];
        assert_eq!(first.from_stop, "A");
        assert_eq!(first.to_stop, "B");
        assert_eq!(first.travel_time_avg, 5.0);
        assert_eq!(first.samples, 1);

        let second = &summaries["1->2"];
        assert_eq!(second.travel_time_avg, 1.7);
        assert_eq!(second.travel_time_min, 1);
        assert_eq!(second.travel_time_max, 2);
        assert_eq!(second.samples, 3);
    }

    #[test]
    fn edge_summary_placeholder_name() {
        let stops = vec!["A".to_string()];
        let summaries = summarise_edges(&samples(), &stops);
        assert_eq!(summaries["1->2"].from_stop, "Stop#1");
        assert_eq!(summaries["1->2"].to_stop, "Stop#2");
    }

    #[test]
    fn assemble_counts() {
        let stops = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let trips = vec![vec![(0u16, 480u16), (1, 485), (2, 487)]];
        let record = DecodedTimetable::assemble(
            "demo.tt".to_string(),
            stops,
            trips,
            &samples(),
            4,
            0x40,
            0x400,
            123.456,
        );
        assert_eq!(record.stats.stops, 3);
        assert_eq!(record.stats.trips, 1);
        assert_eq!(record.stats.edges, 2);
        assert_eq!(record.stats.total_travel_times, 4);
        assert_eq!(record.stats.p_records, 4);
        assert_eq!(record.stats.stop_quality_score, 123.46);
    }

    #[test]
    fn json_field_order() {
        let record = DecodedTimetable::assemble(
            "demo.tt".to_string(),
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec![vec![(0, 480), (1, 485)]],
            &samples(),
            0,
            64,
            1024,
            50.0,
        );
        let json = record.to_json().unwrap();
        let pos = |needle: &str| json.find(needle).unwrap();
        assert!(pos("\"source_file\"") < pos("\"stops\""));
        assert!(pos("\"stops\"") < pos("\"trips\""));
        assert!(pos("\"trips\"") < pos("\"stats\""));
        assert!(pos("\"stats\"") < pos("\"edges\""));

        let back = DecodedTimetable::from_json(&json).unwrap();
        assert_eq!(back, record);
    }
}

mod settings {
    use crate::settings::DecoderSettings;

    #[test]
    fn stop_scan_size_classes() {
        let s = DecoderSettings::default();
        assert_eq!(s.stop_scan_limit(999_999), 999_999);
        assert_eq!(s.stop_scan_limit(1_000_000), 1_000_000);
        assert_eq!(s.stop_scan_limit(9_999_999), 1_000_000);
        assert_eq!(s.stop_scan_limit(39_999_999), 4_000_000);
        assert_eq!(s.stop_scan_limit(40_000_000), 8_000_000);
    }

    #[test]
    fn time_scan_size_classes() {
        let s = DecoderSettings::default();
        assert_eq!(s.time_scan_limit(500_000), 500_000);
        assert_eq!(s.time_scan_limit(2_000_000), 5_000_000);
        assert_eq!(s.time_scan_limit(50_000_000), 20_000_000);
    }

    #[test]
    fn overrides_win() {
        let mut s = DecoderSettings::default();
        s.set_override_stop_scan_limit(Some(4096));
        s.set_override_time_scan_limit(Some(8192));
        assert_eq!(s.stop_scan_limit(50_000_000), 4096);
        assert_eq!(s.time_scan_limit(50_000_000), 8192);
    }
}
