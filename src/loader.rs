//! CSV loader for the pre-joined orders table.
//!
//! Reads plain or gzip-compressed CSV. Columns beyond the ones in
//! [`Record`] are ignored. Timestamps are parsed eagerly and the first
//! malformed one aborts the load.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::record::{Record, Table};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A row as it appears in the file, before timestamp parsing.
#[derive(Debug, Deserialize)]
struct RawRecord {
    order_purchase_timestamp: Option<String>,
    customer_state: Option<String>,
    review_score: Option<f64>,
    product_category_name: Option<String>,
    payment_value: Option<f64>,
}

impl RawRecord {
    fn into_record(self, row: usize) -> Result<Record, LoadError> {
        let raw_ts = self
            .order_purchase_timestamp
            .ok_or(LoadError::MissingTimestamp { row })?;
        let order_purchase_timestamp =
            parse_timestamp(&raw_ts).ok_or_else(|| LoadError::MalformedTimestamp {
                row,
                value: raw_ts.clone(),
            })?;

        Ok(Record {
            order_purchase_timestamp,
            customer_state: self.customer_state,
            review_score: self.review_score,
            product_category_name: self.product_category_name,
            payment_value: self.payment_value,
        })
    }
}

/// Parses a purchase timestamp. A bare date is read as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Loads the table from `path`. Files ending in `.gz` are decompressed.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_table(path: impl AsRef<Path>) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(gzipped, "Opening table");

    let table = if gzipped {
        read_table(GzDecoder::new(BufReader::new(file)))?
    } else {
        read_table(BufReader::new(file))?
    };

    info!(rows = table.len(), "Table loaded");
    Ok(table)
}

/// Reads the table from any CSV source with a header row.
pub fn read_table<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: RawRecord = result?;
        records.push(raw.into_record(i + 1)?);
    }

    Ok(Table::new(records))
}
