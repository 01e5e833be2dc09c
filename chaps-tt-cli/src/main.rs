//! Batch driver for the `.tt` decoding toolchain.
//!
//! Three modes share one pipeline per file: decode, write the JSON record, optionally emit a
//! GTFS feed. Files are independent, so batch modes decode them in parallel; summary lines are
//! printed afterwards in input order. `RUST_LOG=debug` surfaces the decoder's diagnostics.
use chaps_tt_core::records::DecodedTimetable;
use chaps_tt_core::{DecoderSettings, TtError};
use chaps_tt_in::TtFile;
use chaps_tt_out::{write_feed, FeedMerger, TransportCategory};

use clap::Parser;
use log::info;
use rayon::prelude::*;

use std::path::{Path, PathBuf};
use std::process::exit;

const EXIT_OK: i32 = 0;
const EXIT_ALL_FAILED: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "chaps-tt",
    version,
    about = "Decode CHAPS .tt timetable containers to JSON records and GTFS feeds"
)]
struct Cli {
    /// A single .tt file; a directory of .tt files with --batch; a KOMPLET
    /// directory with --komplet.
    input: PathBuf,

    /// Decode every *.tt directly inside the input directory.
    #[arg(long, conflicts_with = "komplet")]
    batch: bool,

    /// Walk the Data1/Data2/Data3 subdirectories of an unpacked KOMPLET
    /// download, emit one GTFS feed per decoded file, and merge all feeds.
    #[arg(long)]
    komplet: bool,

    /// Where the JSON records and GTFS feeds are written.
    #[arg(long, value_name = "DIR", default_value = "data/decoded_tt")]
    output_dir: PathBuf,
}

/// The per-file result carried from the parallel decode to the sequential
/// reporting pass.
struct FileOutcome {
    name: String,
    result: Result<DecodedTimetable, TtError>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_USAGE
        }
    };
    exit(code);
}

fn run(cli: &Cli) -> Result<i32, TtError> {
    if !cli.input.exists() {
        eprintln!("input path does not exist: {}", cli.input.display());
        return Ok(EXIT_USAGE);
    }
    if cli.komplet {
        run_komplet(cli)
    } else if cli.batch {
        run_batch(&cli.input, &cli.output_dir)
    } else {
        run_single(cli)
    }
}

fn run_single(cli: &Cli) -> Result<i32, TtError> {
    if cli.input.is_dir() {
        eprintln!(
            "{} is a directory; use --batch or --komplet",
            cli.input.display()
        );
        return Ok(EXIT_USAGE);
    }
    std::fs::create_dir_all(&cli.output_dir)?;

    let outcome = decode_one(&cli.input, &cli.output_dir)?;
    print_outcome(&outcome);
    match outcome.result {
        Ok(_) => Ok(EXIT_OK),
        Err(_) => Ok(EXIT_ALL_FAILED),
    }
}

fn run_batch(dir: &Path, output_dir: &Path) -> Result<i32, TtError> {
    let files = tt_files_in(dir)?;
    if files.is_empty() {
        eprintln!("no .tt files in {}", dir.display());
        return Ok(EXIT_USAGE);
    }
    std::fs::create_dir_all(output_dir)?;
    info!("decoding {} files from {}", files.len(), dir.display());

    let outcomes = files
        .par_iter()
        .map(|path| decode_one(path, output_dir))
        .collect::<Result<Vec<_>, TtError>>()?;

    let success = report(&outcomes);
    Ok(if success > 0 { EXIT_OK } else { EXIT_ALL_FAILED })
}

fn run_komplet(cli: &Cli) -> Result<i32, TtError> {
    let mut merger = FeedMerger::new();
    let mut all_outcomes: Vec<FileOutcome> = Vec::new();
    let mut data_dirs_seen = 0usize;

    for sub in ["Data1", "Data2", "Data3"].iter() {
        let data_dir = cli.input.join(sub);
        if !data_dir.is_dir() {
            continue;
        }
        data_dirs_seen += 1;
        let category = match TransportCategory::from_data_dir(sub) {
            Some(category) => category,
            None => continue,
        };

        let files = tt_files_in(&data_dir)?;
        if files.is_empty() {
            continue;
        }
        let category_dir = cli.output_dir.join(category.code());
        std::fs::create_dir_all(&category_dir)?;
        info!(
            "decoding {} files from {} as {}",
            files.len(),
            data_dir.display(),
            category.code()
        );

        let outcomes = files
            .par_iter()
            .map(|path| decode_one(path, &category_dir))
            .collect::<Result<Vec<_>, TtError>>()?;

        for outcome in &outcomes {
            if let Ok(record) = &outcome.result {
                let stem = feed_stem(&outcome.name).to_string();
                let feed_dir = category_dir.join(&stem);
                write_feed(record, category, &feed_dir)?;
                merger.add_feed(&feed_dir, &format!("{}/{}", category.code(), stem))?;
            }
        }
        all_outcomes.extend(outcomes);
    }

    if data_dirs_seen == 0 {
        eprintln!(
            "{} has none of Data1/, Data2/, Data3/",
            cli.input.display()
        );
        return Ok(EXIT_USAGE);
    }
    if all_outcomes.is_empty() {
        eprintln!("no .tt files under {}", cli.input.display());
        return Ok(EXIT_USAGE);
    }

    let success = report(&all_outcomes);
    if success > 0 {
        merger.export(&cli.output_dir.join("merged"))?;
        Ok(EXIT_OK)
    } else {
        Ok(EXIT_ALL_FAILED)
    }
}

/// Decode one file and write its JSON record. Decode failures become part
/// of the outcome; environment problems abort the run.
fn decode_one(path: &Path, output_dir: &Path) -> Result<FileOutcome, TtError> {
    let name = file_label(path);
    match TtFile::open(path, DecoderSettings::default()) {
        Ok(file) => {
            let record = file.into_record();
            let json_path = output_dir.join(format!("{}.json", feed_stem(&name)));
            std::fs::write(&json_path, record.to_json()?)?;
            Ok(FileOutcome {
                name,
                result: Ok(record),
            })
        }
        Err(e) if e.is_decode_failure() => Ok(FileOutcome {
            name,
            result: Err(e),
        }),
        Err(e) => Err(e),
    }
}

/// Print the per-file lines and the aggregate summary; returns the number
/// of successfully decoded files.
fn report(outcomes: &[FileOutcome]) -> usize {
    let mut success = 0usize;
    let mut total_stops = 0usize;
    let mut total_trips = 0usize;
    let mut total_edges = 0usize;

    for outcome in outcomes {
        print_outcome(outcome);
        if let Ok(record) = &outcome.result {
            success += 1;
            total_stops += record.stats.stops;
            total_trips += record.stats.trips;
            total_edges += record.stats.edges;
        }
    }

    println!();
    println!("decoded {}/{} files", success, outcomes.len());
    println!(
        "  {} stops, {} trips, {} travel-time edges",
        total_stops, total_trips, total_edges
    );
    success
}

fn print_outcome(outcome: &FileOutcome) {
    match &outcome.result {
        Ok(record) => println!(
            "ok   {:<30} {:>4} stops, {:>4} trips, {:>5} edges",
            outcome.name, record.stats.stops, record.stats.trips, record.stats.edges
        ),
        Err(e) => println!("FAIL {:<30} {}", outcome.name, e),
    }
}

/// The `*.tt` files directly inside `dir`, sorted by name.
fn tt_files_in(dir: &Path) -> Result<Vec<PathBuf>, TtError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("tt"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn feed_stem(name: &str) -> &str {
    name.rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(name)
}
