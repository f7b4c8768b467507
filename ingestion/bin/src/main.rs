mod config;
mod di;

use crate::config::Cli;
use crate::di::create_app_module;
use chrono::Local;
use clap::Parser;
use fuel_ingestion_application::{IngestionService, RunOutcome};
use fuel_ingestion_domain::resolve_run_date;
use shaku::HasComponent;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let date = resolve_run_date(cli.date, Local::now().date_naive());

    info!("Starting fuel invoice ingestion for {}", date);

    let module = create_app_module(&cli)?;
    let service: Arc<dyn IngestionService> = module.resolve();

    match service.run(date).await {
        Ok(RunOutcome::Persisted { count, .. }) => {
            info!("Ingestion complete: {} invoices stored", count);
            Ok(ExitCode::SUCCESS)
        }
        Ok(outcome) => {
            info!("Ingestion complete: {:?}", outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Ingestion failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
