pub mod sqlite;

pub use sqlite::SqliteInvoiceStore;
