//! Group-and-reduce aggregators behind every chart on the dashboard.
//!
//! Each aggregator is a pure function of a (usually filtered) [`Table`].
//! Missing and `NaN` values are skipped, and a group left with no
//! values is dropped rather than reported as zero. Ranked views are
//! stable-sorted so ties keep the order in which their keys first
//! appear in the table.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::hash::Hash;

use crate::record::{Record, Table, present};
use crate::series::{Entry, Series};

/// Running sum and count for one group.
#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = present(value) {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    fn sum(&self) -> Option<f64> {
        (self.count > 0).then_some(self.sum)
    }
}

/// Groups records by `key`, keeping groups in first-encounter order.
/// Records without a key are left out.
fn group_by<K, F, V>(table: &Table, key: F, value: V) -> Vec<(K, Accumulator)>
where
    K: Eq + Hash + Clone,
    F: Fn(&Record) -> Option<K>,
    V: Fn(&Record) -> Option<f64>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Accumulator)> = Vec::new();

    for record in table.iter() {
        let Some(k) = key(record) else {
            continue;
        };
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Accumulator::default()));
            groups.len() - 1
        });
        groups[slot].1.push(value(record));
    }

    groups
}

/// Reduces each group and sorts descending by value. The sort is stable.
fn ranked<K>(
    groups: Vec<(K, Accumulator)>,
    reduce: impl Fn(&Accumulator) -> Option<f64>,
) -> Series<K> {
    let mut entries: Vec<Entry<K>> = groups
        .into_iter()
        .filter_map(|(key, acc)| reduce(&acc).map(|value| Entry { key, value }))
        .collect();
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    Series::from_entries(entries)
}

/// Mean `review_score` per `customer_state`, highest first.
pub fn average_review_by_region(table: &Table) -> Series<String> {
    let groups = group_by(table, |r| r.customer_state.clone(), |r| r.review_score);
    ranked(groups, Accumulator::mean)
}

/// Summed `payment_value` per `product_category_name`, highest first.
pub fn revenue_by_category(table: &Table) -> Series<String> {
    let groups = group_by(
        table,
        |r| r.product_category_name.clone(),
        |r| r.payment_value,
    );
    ranked(groups, Accumulator::sum)
}

/// Summed `payment_value` per purchase date, in ascending date order.
pub fn daily_revenue(table: &Table) -> Series<NaiveDate> {
    let groups = group_by(table, |r| Some(r.purchase_date()), |r| r.payment_value);
    let mut entries: Vec<Entry<NaiveDate>> = groups
        .into_iter()
        .filter_map(|(key, acc)| acc.sum().map(|value| Entry { key, value }))
        .collect();
    entries.sort_by_key(|e| e.key);
    Series::from_entries(entries)
}

/// Total revenue across every daily bucket.
pub fn total(daily: &Series<NaiveDate>) -> f64 {
    daily.sum()
}
