//! SegmentForge: customer segmentation CLI
//!
//! This is the main entrypoint that orchestrates loading purchase records,
//! aggregating and segmenting them, and writing the report and CSV output.

use anyhow::Result;
use clap::Parser;
use segmentforge::{
    aggregate_purchases, load_purchase_data, report, segment_customers, Args, ColumnNames,
};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();
    setup_logging(args.verbose);

    let columns = args.column_names()?;
    run_pipeline(&args, &columns)
}

/// Log to stderr; `RUST_LOG` takes precedence over the `-v` count
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run the segmentation pipeline once
fn run_pipeline(args: &Args, columns: &ColumnNames) -> Result<()> {
    let start_time = Instant::now();
    debug!(?columns, "Using column names");

    // Step 1: Load purchase records
    info!(input = %args.input, "Reading customer data from input file");
    let purchases = load_purchase_data(&args.input, columns)?;
    debug!(records = purchases.height(), "Loaded purchase records");

    // Step 2: Total purchase amount per customer
    info!("Calculating total purchase amount per customer");
    let totals = aggregate_purchases(&purchases, columns)?;
    debug!(customers = totals.height(), "Aggregated customer totals");

    // Step 3: Segment customers
    info!("Segmenting customers by total purchase amount");
    let segmented = segment_customers(&totals, columns)?;

    // Step 4: Console report
    info!("Listing rows of the segmented data set");
    report::configure_display(args.report_row_limit());
    println!("{}", report::render_report(&segmented));
    println!();
    let summaries = report::segment_summary(&segmented, columns)?;
    println!("{}", report::render_segment_summary(&summaries));

    // Step 5: CSV output
    info!(output = %args.output, "Writing data set to a CSV file");
    report::write_csv_file(&args.output, &segmented)?;

    debug!(
        elapsed_secs = start_time.elapsed().as_secs_f64(),
        "Pipeline complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_run_pipeline() {
        let mut input = NamedTempFile::new().unwrap();
        write!(
            input,
            r#"[{{"customer_id": 1, "purchase_amount": 100}},
                {{"customer_id": 2, "purchase_amount": 700}}]"#
        )
        .unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let output = output_dir.path().join("CustSeg.csv");

        let args = Args::try_parse_from([
            "segmentforge",
            "--input",
            input.path().to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        let columns = args.column_names().unwrap();

        run_pipeline(&args, &columns).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "customer_id,total_purchase_amount,customer_segment\n1,100,Medium\n2,700,High\n"
        );
    }
}
