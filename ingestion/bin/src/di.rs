use crate::config::Cli;
use fuel_ingestion_application::services::IngestionServiceImplParameters;
use fuel_ingestion_application::IngestionServiceImpl;
use fuel_ingestion_infrastructure::repositories::sqlite::SqliteInvoiceStoreParameters;
use fuel_ingestion_infrastructure::sources::http::HttpInvoiceSourceParameters;
use fuel_ingestion_infrastructure::{HttpInvoiceSource, SqliteInvoiceStore};
use shaku::module;
use tokio::sync::Mutex;

module! {
    pub AppModule {
        components = [
            IngestionServiceImpl,
            HttpInvoiceSource,
            SqliteInvoiceStore
        ],
        providers = []
    }
}

pub fn create_app_module(cli: &Cli) -> Result<AppModule, Box<dyn std::error::Error>> {
    let client = HttpInvoiceSource::build_client(cli.request_timeout())?;

    Ok(AppModule::builder()
        .with_component_parameters::<IngestionServiceImpl>(IngestionServiceImplParameters {
            deadline: cli.deadline(),
        })
        .with_component_parameters::<HttpInvoiceSource>(HttpInvoiceSourceParameters {
            base_url: cli.api_base_url.clone(),
            access_token: cli.access_token.clone(),
            client,
        })
        .with_component_parameters::<SqliteInvoiceStore>(SqliteInvoiceStoreParameters {
            database_url: cli.database_url.clone(),
            connection: Mutex::new(None),
        })
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use fuel_ingestion_application::IngestionService;
    use shaku::HasComponent;
    use std::sync::Arc;

    #[test]
    fn test_module_resolves_ingestion_service() {
        let cli = Cli::try_parse_from([
            "fuel-ingest",
            "--access-token",
            "abc",
            "--database-url",
            "sqlite://unused.db",
        ])
        .unwrap();

        let module = create_app_module(&cli).unwrap();
        let _service: Arc<dyn IngestionService> = module.resolve();
    }
}
