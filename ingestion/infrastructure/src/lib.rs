pub mod repositories;
pub mod sources;

pub use repositories::SqliteInvoiceStore;
pub use sources::{HttpInvoiceSource, DEFAULT_BASE_URL};
