//! Console report and CSV output for segmented customers

use crate::model::{ColumnNames, Segment};
use anyhow::Context;
use polars::prelude::*;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Environment variable Polars reads for the number of rows it displays
const FMT_MAX_ROWS: &str = "POLARS_FMT_MAX_ROWS";

/// Customer count and spend of one segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub customers: usize,
    pub total_purchase_amount: f64,
}

/// Set how many rows `render_report` shows; `None` shows every row
///
/// Polars reads this from the environment at display time, so call it once
/// before rendering, while the process is still single-threaded.
pub fn configure_display(max_rows: Option<usize>) {
    let value = max_rows.map_or_else(|| "-1".to_string(), |rows| rows.to_string());
    std::env::set_var(FMT_MAX_ROWS, value);
}

/// Render the segmented frame as a text table
pub fn render_report(segmented: &DataFrame) -> String {
    format!("{}", segmented)
}

/// Count customers and sum spend per segment, listing every segment in rank order
pub fn segment_summary(
    segmented: &DataFrame,
    columns: &ColumnNames,
) -> crate::Result<Vec<SegmentSummary>> {
    let grouped = segmented
        .clone()
        .lazy()
        .group_by([col(&columns.customer_segment)])
        .agg([
            col(&columns.customer_id).count().alias("customers"),
            col(&columns.total_purchase_amount)
                .cast(DataType::Float64)
                .sum()
                .alias("spend"),
        ])
        .collect()?;

    let labels = grouped.column(&columns.customer_segment)?.str()?;
    let counts = grouped.column("customers")?.cast(&DataType::UInt64)?;
    let spend = grouped.column("spend")?.f64()?;

    let mut summaries: Vec<SegmentSummary> = Segment::ALL
        .iter()
        .map(|&segment| SegmentSummary {
            segment,
            customers: 0,
            total_purchase_amount: 0.0,
        })
        .collect();

    for ((label, count), total) in labels
        .into_no_null_iter()
        .zip(counts.u64()?.into_no_null_iter())
        .zip(spend.into_no_null_iter())
    {
        let segment = Segment::from_label(label)
            .with_context(|| format!("Unknown segment label '{}'", label))?;
        let summary = &mut summaries[segment.rank() as usize];
        summary.customers = count as usize;
        summary.total_purchase_amount = total;
    }

    Ok(summaries)
}

pub fn render_segment_summary(summaries: &[SegmentSummary]) -> String {
    let label_width = summaries
        .iter()
        .map(|summary| summary.segment.as_str().len())
        .max()
        .unwrap_or(0);

    summaries
        .iter()
        .map(|summary| {
            format!(
                "{:<label_width$}  {} customers, total {}",
                summary.segment.as_str(),
                summary.customers,
                summary.total_purchase_amount,
                label_width = label_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the frame as CSV: one header row, then one row per customer
pub fn write_csv<W: io::Write>(writer: W, segmented: &DataFrame) -> crate::Result<()> {
    let mut segmented = segmented.clone();
    CsvWriter::new(writer).finish(&mut segmented)?;
    Ok(())
}

/// Write the frame to a CSV file, creating missing parent directories
pub fn write_csv_file(output_path: impl AsRef<Path>, segmented: &DataFrame) -> crate::Result<()> {
    let output_path = output_path.as_ref();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file {}", output_path.display()))?;
    write_csv(file, segmented).with_context(|| format!("Failed to write {}", output_path.display()))
}
