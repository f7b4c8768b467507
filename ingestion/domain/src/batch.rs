use crate::InvoiceRecord;
use chrono::NaiveDate;

/// The ordered set of invoices fetched for one delivery date.
///
/// Every record must carry the batch date; the date is the idempotency key
/// the store checks before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceBatch {
    date: NaiveDate,
    records: Vec<InvoiceRecord>,
}

impl InvoiceBatch {
    pub fn new(date: NaiveDate, records: Vec<InvoiceRecord>) -> Result<Self, BatchError> {
        if let Some(stray) = records.iter().find(|r| r.delivery_date() != date) {
            return Err(BatchError::DateMismatch {
                invoice_number: stray.invoice_number().to_string(),
                expected: date,
                found: stray.delivery_date(),
            });
        }

        Ok(Self { date, records })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Invoice {invoice_number} is dated {found}, expected {expected}")]
    DateMismatch {
        invoice_number: String,
        expected: NaiveDate,
        found: NaiveDate,
    },
}
