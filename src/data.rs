//! Loading purchase records from JSON
//!
//! Two layouts are accepted:
//! * records: `[{"customer_id": 1, "purchase_amount": 100}, ...]`
//! * columns: `{"customer_id": {"0": 1, ...}, "purchase_amount": {"0": 100, ...}}`
//!   (each column may also be a plain array)
//!
//! Records are validated one by one, then turned into a Polars `DataFrame`
//! with a single dtype per column.

use crate::model::{ColumnNames, CustomerId, PurchaseAmount, PurchaseRecord};
use anyhow::{anyhow, bail, Context};
use polars::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Load a JSON file of purchases into a two-column `DataFrame`
///
/// # Arguments
/// * `file_path` - Path to the JSON file
/// * `columns` - Names of the customer id and purchase amount fields
///
/// # Returns
/// * Frame with the customer id and purchase amount columns, one row per record
pub fn load_purchase_data(
    file_path: impl AsRef<Path>,
    columns: &ColumnNames,
) -> crate::Result<DataFrame> {
    let records = load_purchase_records(file_path, columns)?;
    purchases_frame(&records, columns)
}

/// Build the purchases frame, choosing one dtype per column
///
/// Ids are `Int64` when every id is an integer, otherwise `String`.
/// Amounts are `Int64` when every amount is an integer, otherwise `Float64`.
pub fn purchases_frame(
    records: &[PurchaseRecord],
    columns: &ColumnNames,
) -> crate::Result<DataFrame> {
    let integer_ids: Option<Vec<i64>> = records
        .iter()
        .map(|record| match record.customer_id {
            CustomerId::Integer(id) => Some(id),
            CustomerId::Text(_) => None,
        })
        .collect();
    let customer_ids = match integer_ids {
        Some(ids) => Series::new(&columns.customer_id, ids),
        None => Series::new(
            &columns.customer_id,
            records
                .iter()
                .map(|record| record.customer_id.to_string())
                .collect::<Vec<String>>(),
        ),
    };

    let integer_amounts: Option<Vec<i64>> = records
        .iter()
        .map(|record| match record.purchase_amount {
            PurchaseAmount::Integer(amount) => Some(amount),
            PurchaseAmount::Decimal(_) => None,
        })
        .collect();
    let purchase_amounts = match integer_amounts {
        Some(amounts) => Series::new(&columns.purchase_amount, amounts),
        None => Series::new(
            &columns.purchase_amount,
            records
                .iter()
                .map(|record| record.purchase_amount.as_f64())
                .collect::<Vec<f64>>(),
        ),
    };

    Ok(DataFrame::new(vec![customer_ids, purchase_amounts])?)
}

/// Read and validate purchase records from a JSON file
///
/// # Arguments
/// * `file_path` - Path to the JSON file
/// * `columns` - Names of the customer id and purchase amount fields
///
/// # Returns
/// * Every record in the file; an empty file layout gives an empty vector
pub fn load_purchase_records(
    file_path: impl AsRef<Path>,
    columns: &ColumnNames,
) -> crate::Result<Vec<PurchaseRecord>> {
    let file_path = file_path.as_ref();
    let contents = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read input file {}", file_path.display()))?;

    parse_purchase_records(&contents, columns)
        .with_context(|| format!("Invalid purchase data in {}", file_path.display()))
}

/// Parse purchase records from a JSON document
pub fn parse_purchase_records(
    json: &str,
    columns: &ColumnNames,
) -> crate::Result<Vec<PurchaseRecord>> {
    let document: Value = serde_json::from_str(json).context("Input is not valid JSON")?;

    match &document {
        Value::Array(rows) => rows
            .iter()
            .enumerate()
            .map(|(index, row)| record_from_row(index, row, columns))
            .collect(),
        Value::Object(table) => records_from_columns(table, columns),
        other => bail!(
            "Expected an array of records or an object of columns, found {}",
            json_type(other)
        ),
    }
}

fn record_from_row(
    index: usize,
    row: &Value,
    columns: &ColumnNames,
) -> crate::Result<PurchaseRecord> {
    let fields = row
        .as_object()
        .ok_or_else(|| anyhow!("Record {} is {}, expected an object", index, json_type(row)))?;

    let customer_id = fields
        .get(&columns.customer_id)
        .ok_or_else(|| anyhow!("Record {} is missing field '{}'", index, columns.customer_id))?;
    let purchase_amount = fields
        .get(&columns.purchase_amount)
        .ok_or_else(|| {
            anyhow!("Record {} is missing field '{}'", index, columns.purchase_amount)
        })?;

    Ok(PurchaseRecord {
        customer_id: parse_customer_id(customer_id)
            .with_context(|| format!("Record {}, field '{}'", index, columns.customer_id))?,
        purchase_amount: parse_purchase_amount(purchase_amount)
            .with_context(|| format!("Record {}, field '{}'", index, columns.purchase_amount))?,
    })
}

fn records_from_columns(
    table: &Map<String, Value>,
    columns: &ColumnNames,
) -> crate::Result<Vec<PurchaseRecord>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let customer_ids = column_cells(table, &columns.customer_id)?;
    let purchase_amounts = column_cells(table, &columns.purchase_amount)?;

    if customer_ids.len() != purchase_amounts.len() {
        bail!(
            "Column '{}' has {} values but column '{}' has {}",
            columns.customer_id,
            customer_ids.len(),
            columns.purchase_amount,
            purchase_amounts.len()
        );
    }

    customer_ids
        .iter()
        .map(|(row, customer_id)| -> crate::Result<PurchaseRecord> {
            let purchase_amount = purchase_amounts.get(row).ok_or_else(|| {
                anyhow!("Row '{}' has no value in column '{}'", row, columns.purchase_amount)
            })?;

            Ok(PurchaseRecord {
                customer_id: parse_customer_id(customer_id)
                    .with_context(|| format!("Row '{}', column '{}'", row, columns.customer_id))?,
                purchase_amount: parse_purchase_amount(purchase_amount).with_context(|| {
                    format!("Row '{}', column '{}'", row, columns.purchase_amount)
                })?,
            })
        })
        .collect()
}

/// Cells of one column keyed by row label
fn column_cells<'a>(
    table: &'a Map<String, Value>,
    name: &str,
) -> crate::Result<BTreeMap<String, &'a Value>> {
    match table.get(name) {
        Some(Value::Object(cells)) => Ok(cells
            .iter()
            .map(|(row, cell)| (row.clone(), cell))
            .collect()),
        Some(Value::Array(cells)) => Ok(cells
            .iter()
            .enumerate()
            .map(|(row, cell)| (row.to_string(), cell))
            .collect()),
        Some(other) => bail!(
            "Column '{}' is {}, expected an object or array",
            name,
            json_type(other)
        ),
        None => bail!("Missing column '{}'", name),
    }
}

fn parse_customer_id(value: &Value) -> crate::Result<CustomerId> {
    match value {
        Value::Number(number) => {
            if let Some(id) = number.as_i64() {
                return Ok(CustomerId::Integer(id));
            }
            // Ids exported through a float column, e.g. 17850.0
            match number.as_f64() {
                Some(id) if id.fract() == 0.0 && id.abs() < i64::MAX as f64 => {
                    Ok(CustomerId::Integer(id as i64))
                }
                _ => bail!("Customer id {} is not an integer", number),
            }
        }
        Value::String(id) => Ok(CustomerId::Text(id.clone())),
        other => bail!(
            "Customer id must be an integer or a string, found {}",
            json_type(other)
        ),
    }
}

fn parse_purchase_amount(value: &Value) -> crate::Result<PurchaseAmount> {
    let number = match value {
        Value::Number(number) => number,
        other => bail!("Purchase amount must be a number, found {}", json_type(other)),
    };

    if let Some(amount) = number.as_i64() {
        return Ok(PurchaseAmount::Integer(amount));
    }
    match number.as_f64() {
        Some(amount) if amount.is_finite() => Ok(PurchaseAmount::Decimal(amount)),
        _ => bail!("Purchase amount {} is out of range", number),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
