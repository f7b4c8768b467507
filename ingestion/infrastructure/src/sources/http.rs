use crate::sources::provider::ProviderInvoice;
use async_trait::async_trait;
use chrono::NaiveDate;
use fuel_ingestion_application::{InvoiceSource, SourceError};
use fuel_ingestion_domain::InvoiceRecord;
use reqwest::Client;
use shaku::Component;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.ccfanalytics.com/erb_invoices";

const USER_AGENT: &str = "Erb Fuel Data Fetcher v1.0.0";

/// Reads invoices from the billing provider's REST API.
#[derive(Component)]
#[shaku(interface = InvoiceSource)]
pub struct HttpInvoiceSource {
    base_url: String,
    access_token: String,
    client: Client,
}

impl HttpInvoiceSource {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Self::build_client(request_timeout)
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            client,
        })
    }

    pub fn build_client(request_timeout: Duration) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
    }

    async fn fetch_provider_invoices(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ProviderInvoice>, SourceError> {
        let filter = format!("eq.{}", date.format("%Y-%m-%d"));
        debug!("GET {}?date={}", self.base_url, filter);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("date", filter.as_str())])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                error!("Error making HTTP request: {}", e);
                SourceError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Unable to fetch invoices: {}", status);
            return Err(SourceError::Unavailable(format!(
                "provider responded with {}",
                status
            )));
        }

        let body = response.text().await.map_err(|e| {
            error!("Error reading response body: {}", e);
            SourceError::Unavailable(e.to_string())
        })?;

        serde_json::from_str(&body).map_err(|e| {
            error!("Error parsing response body: {}", e);
            SourceError::Format(e.to_string())
        })
    }
}

#[async_trait]
impl InvoiceSource for HttpInvoiceSource {
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<InvoiceRecord>, SourceError> {
        let raw = self.fetch_provider_invoices(date).await?;

        raw.into_iter()
            .map(InvoiceRecord::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!("Error converting provider invoice: {}", e);
                SourceError::Format(e.to_string())
            })
    }
}
