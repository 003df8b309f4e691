//! Standalone checker for record store files.
//!
//! Verifies that a store written by the bot has the expected header and
//! that every row matches the record field formats.

use std::process::ExitCode;

use clap::Parser;

use fake_data_bot::record::{HEADER, Record};
use fake_data_bot::store::{CsvStore, RecordStore};

/// Record store checker.
#[derive(Parser, Debug)]
#[command(name = "check_store")]
#[command(about = "Checks a fake data CSV store for malformed rows")]
#[command(version)]
struct Args {
    /// Path to the CSV store to check.
    #[arg(short, long, default_value = "fake_data.csv")]
    file: String,

    /// Print every record, not just problems.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    check_store(&args.file, args.verbose)
}

fn check_store(path: &str, verbose: bool) -> ExitCode {
    println!("Checking: {path}");
    println!();

    let store = CsvStore::new(path);

    let content = match store.read_all() {
        Ok(content) => content,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };

    let header_ok = std::str::from_utf8(&content)
        .ok()
        .and_then(|text| text.lines().next())
        .is_some_and(|line| line == HEADER.join(","));
    if !header_ok {
        eprintln!("✗ Missing or unexpected header (expected: {})", HEADER.join(","));
        return ExitCode::FAILURE;
    }

    let records: Vec<Record> = match store.records() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut problems = 0usize;
    for (i, record) in records.iter().enumerate() {
        // Row 1 is the header.
        let row = i + 2;
        match record.check() {
            Ok(()) if verbose => {
                println!(
                    "  ✓ row {row}: {} ({})",
                    record.full_name,
                    record.masked_mobile()
                );
            }
            Ok(()) => {}
            Err(e) => {
                problems += 1;
                println!("  ✗ row {row}: {e}");
            }
        }
    }

    println!();
    if problems == 0 {
        println!("✓ {} records, all well-formed", records.len());
        ExitCode::SUCCESS
    } else {
        println!("✗ {problems} of {} records are malformed", records.len());
        ExitCode::FAILURE
    }
}
