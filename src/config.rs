//! Environment-driven settings. CLI flags take precedence over these.

use anyhow::Context;

use crate::report::DEFAULT_TOP_N;

pub const DEFAULT_DATA_PATH: &str = "final_data.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/olist_dashboard.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: String,
    pub log_file_path: String,
    top_n: Option<String>,
}

impl Settings {
    /// Reads `DASHBOARD_DATA_PATH`, `DASHBOARD_TOP_N` and `LOG_FILE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_path: lookup("DASHBOARD_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
            log_file_path: lookup("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            top_n: lookup("DASHBOARD_TOP_N"),
        }
    }

    /// Groups per best/worst chart: the flag if given, else `DASHBOARD_TOP_N`, else the default.
    ///
    /// `DASHBOARD_TOP_N` is only parsed when no flag is given.
    pub fn top_n(&self, flag: Option<usize>) -> anyhow::Result<usize> {
        if let Some(n) = flag {
            return Ok(n);
        }
        match &self.top_n {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("DASHBOARD_TOP_N must be a whole number, got '{raw}'")),
            None => Ok(DEFAULT_TOP_N),
        }
    }
}
