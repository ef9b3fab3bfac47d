//! The per-request recompute: filter the loaded table, then rebuild every view.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::aggregate::{average_review_by_region, daily_revenue, revenue_by_category, total};
use crate::error::PipelineError;
use crate::record::Table;
use crate::series::Series;
use crate::window::{Window, filter};

/// Every view the dashboard renders for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedViews {
    pub window: Window,
    pub record_count: usize,
    pub average_review_by_region: Series<String>,
    pub revenue_by_category: Series<String>,
    pub daily_revenue: Series<NaiveDate>,
    pub total_revenue: f64,
}

impl DerivedViews {
    /// Builds all views from an already filtered table.
    pub fn from_filtered(window: Window, filtered: &Table) -> Self {
        let daily = daily_revenue(filtered);
        let total_revenue = total(&daily);

        Self {
            window,
            record_count: filtered.len(),
            average_review_by_region: average_review_by_region(filtered),
            revenue_by_category: revenue_by_category(filtered),
            daily_revenue: daily,
            total_revenue,
        }
    }
}

/// Owns the loaded table and answers window requests against it.
#[derive(Debug, Clone)]
pub struct Pipeline {
    table: Table,
}

impl Pipeline {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The full-range window the date picker starts on.
    pub fn default_window(&self) -> Option<Window> {
        Window::covering(&self.table)
    }

    /// Filters to `window` and recomputes every derived view.
    #[tracing::instrument(skip(self), fields(start = %window.start, end = %window.end))]
    pub fn views(&self, window: &Window) -> Result<DerivedViews, PipelineError> {
        let filtered = filter(&self.table, window)?;
        let views = DerivedViews::from_filtered(*window, &filtered);

        info!(
            records = views.record_count,
            regions = views.average_review_by_region.len(),
            categories = views.revenue_by_category.len(),
            days = views.daily_revenue.len(),
            total_revenue = views.total_revenue,
            "Views recomputed"
        );

        Ok(views)
    }
}
