//! playql command line: load songs, run queries, print the projections.
//!
//! Usage: `playql [--config PATH] [QUERY...]`
//!
//! Queries given on the command line replace the ones from the settings.
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use playql::engine::{QueryEngine, QueryOutcome};
use playql::ingest;
use playql::record::Song;
use playql::settings::{OutputFormat, Settings};

fn main() -> ExitCode {
    let mut config_path = None;
    let mut queries = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next();
        } else {
            queries.push(arg);
        }
    }

    let mut settings = match Settings::load(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if !queries.is_empty() {
        settings.queries = queries;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let engine = match QueryEngine::for_record::<Song>(settings.grammar_mode) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to build the query grammar: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let (playlist, report) = match ingest::load_file(&settings.data_file) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load songs: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(loaded = report.loaded, skipped = report.skipped, "playlist ready");

    // a failing query is reported and does not stop the remaining ones
    let mut failures = 0;
    for query in &settings.queries {
        match engine.execute(query, &playlist) {
            Ok(outcome) => print_outcome(&outcome, settings.output),
            Err(e) => {
                error!(query = %query, "{}", e);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_outcome(outcome: &QueryOutcome, output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            println!("Query Results:");
            for row in &outcome.rows {
                println!("{}", row);
            }
        }
        OutputFormat::Json => {
            for row in &outcome.rows {
                match serde_json::to_string(row) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!("Failed to serialize row: {}", e),
                }
            }
        }
    }
}
