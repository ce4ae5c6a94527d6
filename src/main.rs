//! CLI entry point for the sales dashboard.
//!
//! Provides subcommands for building the dashboard report for a region and
//! year, and for filtering the raw sales table and exporting it as CSV.

use anyhow::Result;
use chrono::NaiveDate;
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sales_dashboard::analyzers::dashboard::{DEFAULT_TOP_SELLERS, DashboardReport};
use sales_dashboard::config::Settings;
use sales_dashboard::fetch::{BasicClient, Region, SalesQuery};
use sales_dashboard::filter::{FilterCriteria, RangeCriterion, filter};
use sales_dashboard::output::{export_csv, print_json, print_pretty};
use sales_dashboard::records::Column;
use sales_dashboard::store::{HttpRecordSource, RecordStore};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sales_dashboard")]
#[command(about = "Filter and summarize product sales data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build revenue, sales and seller summaries
    Dashboard {
        #[command(flatten)]
        query: QueryArgs,

        /// Only include these sellers (repeatable)
        #[arg(long = "seller", value_name = "NAME")]
        sellers: Vec<String>,

        /// Number of sellers in the top-seller rankings
        #[arg(short, long, default_value_t = DEFAULT_TOP_SELLERS,
              value_parser = clap::value_parser!(u8).range(2..=10).map(usize::from))]
        top_sellers: usize,

        /// Log the report as JSON instead of pretty debug format
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Filter the raw sales table and export it as CSV
    Export {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Columns to export, comma separated (default: all)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<Column>,

        /// Output file name; ".csv" is appended
        #[arg(short, long, default_value = "dados")]
        name: String,

        /// Directory to write the file to
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,

        /// Gzip compress the exported file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List the regions accepted by --region
    Regions,
}

#[derive(Args)]
struct QueryArgs {
    /// Region to load (Brasil loads every region)
    #[arg(short, long, default_value = "Brasil")]
    region: Region,

    /// Year to load; omit for the whole period
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(2020..=2023))]
    year: Option<i32>,
}

impl QueryArgs {
    fn query(&self) -> SalesQuery {
        SalesQuery::new(self.region, self.year)
    }
}

#[derive(Args)]
struct CriteriaArgs {
    /// JSON file with saved filter criteria; flags below override it
    #[arg(long, value_name = "FILE")]
    filters: Option<PathBuf>,

    #[arg(long = "product", value_name = "NAME")]
    products: Vec<String>,
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,
    #[arg(long = "seller", value_name = "NAME")]
    sellers: Vec<String>,
    #[arg(long = "location", value_name = "STATE")]
    locations: Vec<String>,
    #[arg(long = "payment-type", value_name = "TYPE")]
    payment_types: Vec<String>,

    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
    #[arg(long)]
    min_freight: Option<Decimal>,
    #[arg(long)]
    max_freight: Option<Decimal>,
    /// First purchase date, YYYY-MM-DD
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last purchase date, YYYY-MM-DD
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long)]
    min_rating: Option<u8>,
    #[arg(long)]
    max_rating: Option<u8>,
    #[arg(long)]
    min_installments: Option<u32>,
    #[arg(long)]
    max_installments: Option<u32>,
}

/// Builds a range when at least one bound was given; the other is open.
fn range<T>(min: Option<T>, max: Option<T>, lowest: T, highest: T) -> Option<RangeCriterion<T>> {
    match (min, max) {
        (None, None) => None,
        (min, max) => Some(RangeCriterion {
            min: min.unwrap_or(lowest),
            max: max.unwrap_or(highest),
        }),
    }
}

impl CriteriaArgs {
    fn into_criteria(self) -> Result<FilterCriteria> {
        let mut c = match &self.filters {
            Some(path) => FilterCriteria::load(path)?,
            None => FilterCriteria::new(),
        };

        if !self.products.is_empty() {
            c = c.with_products(self.products);
        }
        if !self.categories.is_empty() {
            c = c.with_categories(self.categories);
        }
        if !self.sellers.is_empty() {
            c = c.with_sellers(self.sellers);
        }
        if !self.locations.is_empty() {
            c = c.with_locations(self.locations);
        }
        if !self.payment_types.is_empty() {
            c = c.with_payment_types(self.payment_types);
        }

        let price = range(self.min_price, self.max_price, Decimal::MIN, Decimal::MAX);
        let freight = range(self.min_freight, self.max_freight, Decimal::MIN, Decimal::MAX);
        let dates = range(self.from, self.to, NaiveDate::MIN, NaiveDate::MAX);
        let rating = range(self.min_rating, self.max_rating, u8::MIN, u8::MAX);
        let installments = range(self.min_installments, self.max_installments, 1, u32::MAX);

        c.price = price.or(c.price);
        c.freight = freight.or(c.freight);
        c.purchase_date = dates.or(c.purchase_date);
        c.rating = rating.or(c.rating);
        c.installments = installments.or(c.installments);

        Ok(c)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&settings.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&settings.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

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

    let cli = Cli::parse();

    match cli.command {
        Commands::Dashboard {
            query,
            sellers,
            top_sellers,
            json,
        } => {
            let mut store = open_store(&settings)?;
            let records = store.records(&query.query()).await?;

            let criteria = FilterCriteria::new().with_sellers(sellers);
            let selected = filter(&records, &criteria);
            let report = DashboardReport::build(&selected, top_sellers);

            info!(
                region = %query.region,
                year = ?query.year,
                revenue = %report.metrics.revenue_label,
                sales = %report.metrics.sales_label,
                "Dashboard built"
            );

            if json {
                print_json(&report)?;
            } else {
                print_pretty(&report);
            }
        }
        Commands::Export {
            query,
            criteria,
            columns,
            name,
            output_dir,
            gzip,
        } => {
            let criteria = criteria.into_criteria()?;
            let mut store = open_store(&settings)?;
            let records = store.records(&query.query()).await?;

            let selected = filter(&records, &criteria);
            if selected.is_empty() {
                warn!("No records match the filters; exporting header only");
            }

            let columns = if columns.is_empty() {
                Column::ALL.to_vec()
            } else {
                columns
            };

            info!(
                rows = selected.len(),
                columns = columns.len(),
                "Table with {} rows and {} columns",
                selected.len(),
                columns.len()
            );

            std::fs::create_dir_all(&output_dir)?;
            let path = export_csv(&output_dir, &name, &selected, &columns, gzip)?;
            info!(path = %path.display(), "File downloaded successfully");
        }
        Commands::Regions => {
            for region in Region::ALL {
                info!(region = %region, param = %region.param(), "Region");
            }
        }
    }

    Ok(())
}

fn open_store(settings: &Settings) -> Result<RecordStore<HttpRecordSource<BasicClient>>> {
    let client = BasicClient::with_timeout(Duration::from_secs(30))?;
    let source = HttpRecordSource::new(client, &settings.api_url)?;
    Ok(RecordStore::new(source))
}
