//! Presentation hand-off for derived views.
//!
//! Renders the dashboard as text, logs it as JSON, or exports individual
//! views to CSV.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::{Display, Write as _};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::pipeline::DerivedViews;
use crate::series::{Entry, Series};

/// Number of groups in each best/worst chart.
pub const DEFAULT_TOP_N: usize = 5;

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

/// Best and worst groups of the ranked views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    pub best_regions: Vec<Entry<String>>,
    pub worst_regions: Vec<Entry<String>>,
    pub highest_revenue_categories: Vec<Entry<String>>,
    pub lowest_revenue_categories: Vec<Entry<String>>,
}

impl Highlights {
    /// Takes `n` groups from each end of the ranked views.
    ///
    /// A view with fewer than `n` groups contributes all of them.
    pub fn from_views(views: &DerivedViews, n: usize) -> Self {
        let regions = &views.average_review_by_region;
        let categories = &views.revenue_by_category;

        Self {
            best_regions: or_all(regions, regions.top_n(n), "best_regions"),
            worst_regions: or_all(regions, regions.bottom_n(n), "worst_regions"),
            highest_revenue_categories: or_all(categories, categories.top_n(n), "highest_revenue"),
            lowest_revenue_categories: or_all(categories, categories.bottom_n(n), "lowest_revenue"),
        }
    }
}

fn or_all<K: Clone>(
    series: &Series<K>,
    slice: Result<&[Entry<K>], PipelineError>,
    chart: &str,
) -> Vec<Entry<K>> {
    match slice {
        Ok(entries) => entries.to_vec(),
        Err(e) => {
            warn!(chart, error = %e, "Showing all available groups");
            series.entries().to_vec()
        }
    }
}

/// Renders the dashboard page as plain text.
pub fn render_summary(views: &DerivedViews, n: usize) -> String {
    let highlights = Highlights::from_views(views, n);
    let mut out = String::new();

    let _ = writeln!(out, "Olist E-Commerce Public Statistics");
    let _ = writeln!(
        out,
        "Time span: {} to {} ({} records)",
        views.window.start, views.window.end, views.record_count
    );

    write_section(
        &mut out,
        "Average Review Score by State",
        views.average_review_by_region.entries(),
        |v| format!("{v:.2}"),
    );
    write_section(
        &mut out,
        &format!("Best {n} Average Review Score by State"),
        &highlights.best_regions,
        |v| format!("{v:.2}"),
    );
    write_section(
        &mut out,
        &format!("Worst {n} Average Review Score by State"),
        &highlights.worst_regions,
        |v| format!("{v:.2}"),
    );
    write_section(
        &mut out,
        &format!("{n} Product Categories with Highest Revenue"),
        &highlights.highest_revenue_categories,
        format_brl,
    );
    write_section(
        &mut out,
        &format!("{n} Product Categories with Lowest Revenue"),
        &highlights.lowest_revenue_categories,
        format_brl,
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Total Revenue: {}", format_brl(views.total_revenue));
    out
}

fn write_section<K: Display>(
    out: &mut String,
    title: &str,
    entries: &[Entry<K>],
    fmt_value: impl Fn(f64) -> String,
) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    if entries.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    for entry in entries {
        let _ = writeln!(out, "  {:<40} {}", entry.key, fmt_value(entry.value));
    }
}

/// Logs the views using Rust's debug pretty-print format.
pub fn print_pretty(views: &DerivedViews) {
    debug!("{:#?}", views);
}

/// Logs the views and their highlights as pretty-printed JSON.
pub fn print_json(views: &DerivedViews, n: usize) -> Result<()> {
    let payload = serde_json::json!({
        "views": views,
        "highlights": Highlights::from_views(views, n),
        "total_revenue_formatted": format_brl(views.total_revenue),
    });
    info!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Writes one view to a CSV file with a `key_header,value_header` header row.
///
/// Overwrites any existing file.
pub fn write_series_csv<K: Display>(
    path: impl AsRef<Path>,
    series: &Series<K>,
    key_header: &str,
    value_header: &str,
) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = series.len(), "Writing CSV view");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    writer.write_record([key_header, value_header])?;
    for entry in series.entries() {
        writer.write_record([entry.key.to_string(), entry.value.to_string()])?;
    }
    writer.flush()?;

    Ok(())
}
