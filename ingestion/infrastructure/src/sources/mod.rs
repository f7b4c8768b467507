pub mod http;
pub mod provider;

pub use http::{HttpInvoiceSource, DEFAULT_BASE_URL};
pub use provider::{ConversionError, ProviderInvoice};
