pub mod aggregate;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod series;
pub mod window;

pub use error::{LoadError, PipelineError};
pub use pipeline::{DerivedViews, Pipeline};
pub use record::{Record, Table};
pub use series::{Entry, Series};
pub use window::{Window, filter};
