//! Command-line interface definitions and argument parsing

use crate::model::ColumnNames;
use clap::{ArgAction, Parser};

/// Customer segmentation CLI: total spend per customer, bucketed into Low/Medium/High
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON file of purchase records
    #[arg(short, long, default_value = "data/CustData.json")]
    pub input: String,

    /// Path of the CSV file to write
    #[arg(short, long, default_value = "outputs/CustSeg.csv")]
    pub output: String,

    /// Name of the field that identifies customers
    #[arg(long, default_value = "customer_id")]
    pub customer_id_column: String,

    /// Name of the field holding a single purchase amount
    #[arg(long, default_value = "purchase_amount")]
    pub purchase_amount_column: String,

    /// Name of the new column holding each customer's total purchase amount
    #[arg(long, default_value = "total_purchase_amount")]
    pub total_purchase_amount_column: String,

    /// Name of the new column holding each customer's segment
    #[arg(long, default_value = "customer_segment")]
    pub customer_segment_column: String,

    /// Cap on rows shown in the console report (0 shows all)
    #[arg(long, default_value_t = 0)]
    pub max_rows: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Validate the column flags and collect them
    ///
    /// Names must be non-empty, the two input fields must differ, and the
    /// three output columns must be distinct.
    pub fn column_names(&self) -> crate::Result<ColumnNames> {
        let columns = ColumnNames {
            customer_id: self.customer_id_column.clone(),
            purchase_amount: self.purchase_amount_column.clone(),
            total_purchase_amount: self.total_purchase_amount_column.clone(),
            customer_segment: self.customer_segment_column.clone(),
        };

        for (flag, name) in [
            ("--customer-id-column", &columns.customer_id),
            ("--purchase-amount-column", &columns.purchase_amount),
            ("--total-purchase-amount-column", &columns.total_purchase_amount),
            ("--customer-segment-column", &columns.customer_segment),
        ] {
            if name.trim().is_empty() {
                anyhow::bail!("{} must not be empty", flag);
            }
        }

        if columns.customer_id == columns.purchase_amount {
            anyhow::bail!(
                "Customer id and purchase amount fields must differ (both '{}')",
                columns.customer_id
            );
        }

        let outputs = [
            &columns.customer_id,
            &columns.total_purchase_amount,
            &columns.customer_segment,
        ];
        for (i, name) in outputs.iter().enumerate() {
            if outputs[i + 1..].contains(name) {
                anyhow::bail!("Output column '{}' is used more than once", name);
            }
        }

        Ok(columns)
    }

    /// Row cap for the console report, `None` when unlimited
    pub fn report_row_limit(&self) -> Option<usize> {
        (self.max_rows > 0).then_some(self.max_rows)
    }
}
