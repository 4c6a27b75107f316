//! Purchase records, segment labels and column names

use std::fmt;

/// Totals strictly below this are `Low`
const MEDIUM_LOWER_BOUND: f64 = 100.0;
/// Totals strictly above this are `High`
const MEDIUM_UPPER_BOUND: f64 = 500.0;

/// Opaque customer key as read from the input
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CustomerId {
    Integer(i64),
    Text(String),
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerId::Integer(id) => write!(f, "{}", id),
            CustomerId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for CustomerId {
    fn from(id: i64) -> Self {
        CustomerId::Integer(id)
    }
}

impl From<i32> for CustomerId {
    fn from(id: i32) -> Self {
        CustomerId::Integer(id.into())
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        CustomerId::Text(id.to_string())
    }
}

impl From<String> for CustomerId {
    fn from(id: String) -> Self {
        CustomerId::Text(id)
    }
}

/// A single purchase amount as read from the input.
///
/// The column type is decided over all records when the frame is built:
/// one decimal amount makes the whole column decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PurchaseAmount {
    Integer(i64),
    Decimal(f64),
}

impl PurchaseAmount {
    pub fn as_f64(self) -> f64 {
        match self {
            PurchaseAmount::Integer(value) => value as f64,
            PurchaseAmount::Decimal(value) => value,
        }
    }
}

impl From<i64> for PurchaseAmount {
    fn from(value: i64) -> Self {
        PurchaseAmount::Integer(value)
    }
}

impl From<i32> for PurchaseAmount {
    fn from(value: i32) -> Self {
        PurchaseAmount::Integer(value.into())
    }
}

impl From<f64> for PurchaseAmount {
    fn from(value: f64) -> Self {
        PurchaseAmount::Decimal(value)
    }
}

/// One input purchase
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRecord {
    pub customer_id: CustomerId,
    pub purchase_amount: PurchaseAmount,
}

impl PurchaseRecord {
    pub fn new(
        customer_id: impl Into<CustomerId>,
        purchase_amount: impl Into<PurchaseAmount>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            purchase_amount: purchase_amount.into(),
        }
    }
}

/// Spending tier, ordered by rank: `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Low,
    Medium,
    High,
}

impl Segment {
    /// All segments in rank order
    pub const ALL: [Segment; 3] = [Segment::Low, Segment::Medium, Segment::High];

    /// Sort key of the segment; alphabetical order of the labels is not rank order
    pub fn rank(self) -> u32 {
        self as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Low => "Low",
            Segment::Medium => "Medium",
            Segment::High => "High",
        }
    }

    /// Label a total purchase amount.
    ///
    /// | amount            | segment |
    /// |-------------------|---------|
    /// | `< 100`           | Low     |
    /// | `100 ..= 500`     | Medium  |
    /// | `> 500`           | High    |
    ///
    /// Amounts are expected to be finite; the record loader rejects anything else.
    pub fn for_amount(amount: f64) -> Segment {
        if amount < MEDIUM_LOWER_BOUND {
            Segment::Low
        } else if amount <= MEDIUM_UPPER_BOUND {
            Segment::Medium
        } else {
            Segment::High
        }
    }

    pub fn from_label(label: &str) -> Option<Segment> {
        Segment::ALL.into_iter().find(|segment| segment.as_str() == label)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the input fields and of the columns produced by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    /// Input field identifying the customer, also the first output column
    pub customer_id: String,
    /// Input field holding a single purchase amount
    pub purchase_amount: String,
    /// Output column holding the per-customer total
    pub total_purchase_amount: String,
    /// Output column holding the segment label
    pub customer_segment: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            customer_id: "customer_id".to_string(),
            purchase_amount: "purchase_amount".to_string(),
            total_purchase_amount: "total_purchase_amount".to_string(),
            customer_segment: "customer_segment".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_rank_is_not_alphabetical() {
        assert!(Segment::Low.rank() < Segment::Medium.rank());
        assert!(Segment::Medium.rank() < Segment::High.rank());

        // Alphabetically "High" would come first
        let mut labels = vec!["High", "Low", "Medium"];
        labels.sort_by_key(|label| Segment::from_label(label).map(Segment::rank));
        assert_eq!(labels, vec!["Low", "Medium", "High"]);
    }

    #[test]
    fn test_segment_boundaries() {
        assert_eq!(Segment::for_amount(99.999), Segment::Low);
        assert_eq!(Segment::for_amount(100.0), Segment::Medium);
        assert_eq!(Segment::for_amount(500.0), Segment::Medium);
        assert_eq!(Segment::for_amount(500.001), Segment::High);
        assert_eq!(Segment::for_amount(-25.0), Segment::Low);
        assert_eq!(Segment::for_amount(0.0), Segment::Low);
    }

    #[test]
    fn test_segment_labels_round_trip() {
        for segment in Segment::ALL {
            assert_eq!(Segment::from_label(segment.as_str()), Some(segment));
        }
        assert_eq!(Segment::from_label("low"), None);
    }
}
