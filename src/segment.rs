//! Spending-tier segmentation of customer totals

use crate::model::{ColumnNames, Segment};
use polars::prelude::*;

/// Temporary sort key; dropped before the frame is returned
const RANK_COLUMN: &str = "__segment_rank";

/// Label every customer total and sort the result
///
/// # Arguments
/// * `totals` - Frame with the customer id and total purchase amount columns
/// * `columns` - Column names; the label is written under `customer_segment`
///
/// # Returns
/// * Frame with columns (id, total, segment), sorted by segment rank and then
///   customer id. With no input rows the frame is empty but still has the
///   segment column. An existing segment column is recomputed from the totals.
pub fn segment_customers(totals: &DataFrame, columns: &ColumnNames) -> crate::Result<DataFrame> {
    let amounts = totals
        .column(&columns.total_purchase_amount)?
        .cast(&DataType::Float64)?;
    let segments: Vec<Segment> = amounts
        .f64()?
        .into_no_null_iter()
        .map(Segment::for_amount)
        .collect();

    let ranks: Vec<u32> = segments.iter().map(|segment| segment.rank()).collect();
    let labels: Vec<&str> = segments.iter().map(|segment| segment.as_str()).collect();

    let mut segmented = totals.select([
        columns.customer_id.as_str(),
        columns.total_purchase_amount.as_str(),
    ])?;
    segmented.with_column(Series::new(RANK_COLUMN, ranks))?;
    segmented.with_column(Series::new(&columns.customer_segment, labels))?;

    let segmented = segmented.sort(
        [RANK_COLUMN, columns.customer_id.as_str()],
        SortMultipleOptions::default(),
    )?;

    Ok(segmented.drop(RANK_COLUMN)?)
}
