//! Ordered key/value series produced by the aggregators.

use serde::Serialize;

use crate::error::PipelineError;

/// One group of a derived view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<K> {
    pub key: K,
    pub value: f64,
}

/// An ordered mapping from group key to reduced value.
///
/// The order is whatever the producing aggregator guarantees; the series
/// never reorders its entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series<K> {
    entries: Vec<Entry<K>>,
}

impl<K> Default for Series<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> Series<K> {
    pub fn get(&self, key: &K) -> Option<f64> {
        self.entries.iter().find(|e| &e.key == key).map(|e| e.value)
    }
}

impl<K> Series<K> {
    pub(crate) fn from_entries(entries: Vec<Entry<K>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry<K>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    pub fn sum(&self) -> f64 {
        self.values().sum()
    }

    /// The first `n` entries, in order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InsufficientData`] when the series has fewer than `n` entries.
    pub fn top_n(&self, n: usize) -> Result<&[Entry<K>], PipelineError> {
        self.check_len(n)?;
        Ok(&self.entries[..n])
    }

    /// The last `n` entries, keeping their order (not reversed).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InsufficientData`] when the series has fewer than `n` entries.
    pub fn bottom_n(&self, n: usize) -> Result<&[Entry<K>], PipelineError> {
        self.check_len(n)?;
        Ok(&self.entries[self.entries.len() - n..])
    }

    fn check_len(&self, n: usize) -> Result<(), PipelineError> {
        if self.entries.len() < n {
            return Err(PipelineError::InsufficientData {
                requested: n,
                available: self.entries.len(),
            });
        }
        Ok(())
    }
}
