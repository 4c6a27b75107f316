//! Per-customer purchase totals using Polars

use crate::model::ColumnNames;
use polars::prelude::*;

/// Sum purchase amounts per customer
///
/// # Arguments
/// * `purchases` - Frame holding the customer id and purchase amount columns
/// * `columns` - Column names; the total is written under `total_purchase_amount`
///
/// # Returns
/// * Frame with one row per distinct customer id and columns (id, total), in no
///   particular order. The total keeps the dtype of the amount column. An empty
///   input gives an empty frame with both columns.
pub fn aggregate_purchases(
    purchases: &DataFrame,
    columns: &ColumnNames,
) -> crate::Result<DataFrame> {
    if purchases.height() == 0 {
        let customer_ids = purchases.column(&columns.customer_id)?.clone();
        let totals = purchases
            .column(&columns.purchase_amount)?
            .clone()
            .with_name(&columns.total_purchase_amount);
        return Ok(DataFrame::new(vec![customer_ids, totals])?);
    }

    let totals = purchases
        .clone()
        .lazy()
        .group_by([col(&columns.customer_id)])
        .agg([col(&columns.purchase_amount)
            .sum()
            .alias(&columns.total_purchase_amount)])
        .collect()?;

    Ok(totals)
}
