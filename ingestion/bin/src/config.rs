use chrono::NaiveDate;
use clap::Parser;
use fuel_ingestion_domain::parse_run_date;
use fuel_ingestion_infrastructure::DEFAULT_BASE_URL;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "fuel-ingest")]
#[command(about = "Fetch one day of fuel delivery invoices and store them", long_about = None)]
pub struct Cli {
    /// Delivery date to ingest (YYYY-MM-DD). Defaults to yesterday.
    #[arg(long, env = "FUEL_INGEST_DATE", value_parser = parse_run_date)]
    pub date: Option<NaiveDate>,

    #[arg(long, env = "FUEL_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, env = "FUEL_API_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://fuel_invoices.db")]
    pub database_url: String,

    #[arg(long, env = "FUEL_API_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Abort the run if fetching and storing take longer than this.
    #[arg(long, env = "FUEL_INGEST_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
