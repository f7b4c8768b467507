pub mod batch;
pub mod invoice;
pub mod run_date;

pub use batch::{BatchError, InvoiceBatch};
pub use invoice::{InvoiceDetails, InvoiceRecord, InvoiceValidationError, TaxBreakdown};
pub use run_date::{parse_run_date, resolve_run_date, RunDateError};
