//! CLI entry point for the Olist e-commerce dashboard.
//!
//! Loads the pre-joined orders table once, applies the requested time span
//! and prints, logs or exports the derived views.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use olist_dashboard::config::Settings;
use olist_dashboard::loader::load_table;
use olist_dashboard::report::{print_json, print_pretty, render_summary, write_series_csv};
use olist_dashboard::{Pipeline, Window};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "olist_dashboard")]
#[command(about = "Olist e-commerce review and revenue statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Data source and time span shared by the reporting subcommands.
#[derive(Args)]
struct SpanArgs {
    /// CSV (or .csv.gz) table to load [env: DASHBOARD_DATA_PATH]
    #[arg(short, long, value_name = "PATH")]
    data: Option<String>,

    /// First day of the time span, YYYY-MM-DD (defaults to the earliest purchase)
    #[arg(long)]
    start: Option<String>,

    /// Last day of the time span, inclusive (defaults to the latest purchase)
    #[arg(long)]
    end: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for a time span
    Summary {
        #[command(flatten)]
        span: SpanArgs,

        /// Number of groups in each best/worst chart [env: DASHBOARD_TOP_N]
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Log the views as JSON instead of printing text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export each derived view to its own CSV file
    Export {
        #[command(flatten)]
        span: SpanArgs,

        /// Directory to write the CSV files into
        #[arg(short, long, default_value = "views")]
        output_dir: String,
    },
    /// Show the first and last purchase dates in the table
    Range {
        /// CSV (or .csv.gz) table to load [env: DASHBOARD_DATA_PATH]
        #[arg(short, long, value_name = "PATH")]
        data: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();
    let _file_guard = init_logging(&settings.log_file_path)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { span, top, json } => {
            let pipeline = load_pipeline(span.data.as_deref(), &settings)?;
            let window = resolve_window(&pipeline, &span)?;
            let views = pipeline.views(&window)?;
            let top = settings.top_n(top)?;

            print_pretty(&views);
            if json {
                print_json(&views, top)?;
            } else {
                println!("{}", render_summary(&views, top));
            }
        }
        Commands::Export { span, output_dir } => {
            let pipeline = load_pipeline(span.data.as_deref(), &settings)?;
            let window = resolve_window(&pipeline, &span)?;
            let views = pipeline.views(&window)?;

            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create {output_dir}"))?;
            let dir = Path::new(&output_dir);

            write_series_csv(
                dir.join("review_by_state.csv"),
                &views.average_review_by_region,
                "customer_state",
                "review_score",
            )?;
            write_series_csv(
                dir.join("revenue_by_category.csv"),
                &views.revenue_by_category,
                "product_category_name",
                "payment_value",
            )?;
            write_series_csv(
                dir.join("daily_revenue.csv"),
                &views.daily_revenue,
                "date",
                "payment_value",
            )?;

            info!(output_dir, total_revenue = views.total_revenue, "Views exported");
        }
        Commands::Range { data } => {
            let pipeline = load_pipeline(data.as_deref(), &settings)?;
            match pipeline.table().date_range() {
                Some((min, max)) => {
                    info!(rows = pipeline.table().len(), %min, %max, "Purchase date range");
                    println!("{min} {max}");
                }
                None => info!("Table is empty"),
            }
        }
    }

    Ok(())
}

/// Colored stderr output plus a JSON daily-rolling log file.
fn init_logging(log_file_path: &str) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = Path::new(log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("olist_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

fn load_pipeline(data: Option<&str>, settings: &Settings) -> Result<Pipeline> {
    let path = data.unwrap_or(&settings.data_path);
    let table = load_table(path).with_context(|| format!("Failed to load table from {path}"))?;
    Ok(Pipeline::new(table))
}

/// Fills in missing span bounds from the table's own date range.
fn resolve_window(pipeline: &Pipeline, span: &SpanArgs) -> Result<Window> {
    let default = pipeline.default_window();

    let start = match (&span.start, default) {
        (Some(s), _) => olist_dashboard::window::parse_date(s)?,
        (None, Some(w)) => w.start,
        (None, None) => bail!("Table is empty; pass --start and --end explicitly"),
    };
    let end = match (&span.end, default) {
        (Some(s), _) => olist_dashboard::window::parse_date(s)?,
        (None, Some(w)) => w.end,
        (None, None) => bail!("Table is empty; pass --start and --end explicitly"),
    };

    Ok(Window::new(start, end)?)
}
