//! Event-level records and the in-memory table they live in.

use chrono::{NaiveDate, NaiveDateTime};

/// One row of the pre-joined orders table.
///
/// Timestamps carry no zone; calendar dates are taken as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub order_purchase_timestamp: NaiveDateTime,
    pub customer_state: Option<String>,
    pub review_score: Option<f64>,
    pub product_category_name: Option<String>,
    pub payment_value: Option<f64>,
}

/// A numeric cell that takes part in a mean or sum. `NaN` counts as missing.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

impl Record {
    /// Calendar date of the purchase.
    pub fn purchase_date(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }
}

/// Records sorted by purchase timestamp, ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Builds a table, stable-sorting the records by purchase timestamp.
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.order_purchase_timestamp);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// First and last purchase dates, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.purchase_date(), last.purchase_date()))
    }

    /// Sum of every present `payment_value`.
    pub fn payment_total(&self) -> f64 {
        self.records
            .iter()
            .filter_map(|r| present(r.payment_value))
            .sum()
    }

    pub(crate) fn from_sorted(records: Vec<Record>) -> Self {
        Self { records }
    }
}
