//! SegmentForge: a Rust CLI application for customer segmentation by total spend
//!
//! This library groups purchase records by customer, sums their purchase amounts
//! and places every customer in one of three ordered spending tiers
//! (`Low < Medium < High`).

pub mod aggregate;
pub mod cli;
pub mod data;
pub mod model;
pub mod report;
pub mod segment;

// Re-export public items for easier access
pub use aggregate::aggregate_purchases;
pub use cli::Args;
pub use data::{load_purchase_data, load_purchase_records, parse_purchase_records, purchases_frame};
pub use model::{ColumnNames, CustomerId, PurchaseAmount, PurchaseRecord, Segment};
pub use report::{
    configure_display, render_report, render_segment_summary, segment_summary, write_csv,
    write_csv_file, SegmentSummary,
};
pub use segment::segment_customers;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
