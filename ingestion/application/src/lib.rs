pub mod ports;
pub mod services;

pub use ports::{InvoiceSource, InvoiceStore, SourceError, StoreError};
pub use services::{IngestionError, IngestionService, IngestionServiceImpl, RunOutcome};
