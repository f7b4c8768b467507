use async_trait::async_trait;
use chrono::NaiveDate;
use fuel_ingestion_domain::{InvoiceBatch, InvoiceRecord};
use shaku::Interface;

/// Reads the invoices the billing provider published for one delivery date.
///
/// An empty result is not an error: it means there is nothing to ingest.
#[async_trait]
pub trait InvoiceSource: Interface {
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<InvoiceRecord>, SourceError>;
}

/// Session-scoped access to invoice storage.
///
/// `open` must precede the other calls and `close` must follow every
/// successful `open`, whatever happened in between.
#[async_trait]
pub trait InvoiceStore: Interface {
    async fn open(&self) -> Result<(), StoreError>;
    async fn records_exist(&self, date: NaiveDate) -> Result<bool, StoreError>;
    /// Writes the whole batch in one transaction or nothing at all.
    async fn save_many(&self, batch: &InvoiceBatch) -> Result<(), StoreError>;
    async fn close(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Invoice source unavailable: {0}")]
    Unavailable(String),

    #[error("Invoice source returned malformed data: {0}")]
    Format(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Store session is not open")]
    NotOpen,
}
