//! Inclusive date windows and the window filter.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::PipelineError;
use crate::record::{Record, Table};

/// An inclusive `[start, end]` range of calendar dates.
///
/// Fields are public so a caller can hand over whatever the date picker
/// produced. [`filter`] validates the window again before using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PipelineError> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Builds a window from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, PipelineError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The window spanning the first to the last purchase date of `table`.
    pub fn covering(table: &Table) -> Option<Self> {
        table
            .date_range()
            .map(|(start, end)| Self { start, end })
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.start > self.end {
            return Err(PipelineError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// True when the record was purchased at any time on a day in the window.
    pub fn contains(&self, record: &Record) -> bool {
        let date = record.purchase_date();
        self.start <= date && date <= self.end
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, PipelineError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| PipelineError::InvalidDate {
        value: value.to_string(),
    })
}

/// Keeps the records of `table` that fall inside `window`, in their original order.
///
/// A window outside the table's range yields an empty table.
pub fn filter(table: &Table, window: &Window) -> Result<Table, PipelineError> {
    window.validate()?;

    let kept: Vec<Record> = table
        .iter()
        .filter(|r| window.contains(r))
        .cloned()
        .collect();

    debug!(
        start = %window.start,
        end = %window.end,
        kept = kept.len(),
        total = table.len(),
        "Window applied"
    );

    Ok(Table::from_sorted(kept))
}
