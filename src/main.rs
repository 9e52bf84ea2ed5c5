//! # chatstats CLI
//!
//! Command-line interface for the chatstats library.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatstats::StatsError;
use chatstats::cli::Args;
use chatstats::format::write_report;
use chatstats::pipeline::Pipeline;
use chatstats::progress::stderr_progress;
use chatstats::report::Report;
use chatstats::stats::AggregationEngine;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatstats={}", args.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), StatsError> {
    let format = args.report_format()?;

    let mut pipeline = Pipeline::new(args.pipeline_config());
    if args.progress {
        pipeline = pipeline.with_progress(stderr_progress());
    }
    let dataset = pipeline.load_dataset(&args.input)?;

    let engine = AggregationEngine::with_config(args.analysis_config());
    let report = Report::build(&dataset, &engine);

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_report(&report, format, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), %format, "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_report(&report, format, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}
