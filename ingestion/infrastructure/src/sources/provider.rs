use chrono::{NaiveDate, NaiveTime};
use fuel_ingestion_domain::{InvoiceDetails, InvoiceRecord, InvoiceValidationError, TaxBreakdown};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Invoice line as returned by the provider's `erb_invoices` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderInvoice {
    pub ticket: String,
    pub invoice: String,
    pub ship_to: String,
    pub ship_to_desc: String,
    pub ship_to_addr: String,
    pub date: NaiveDate,
    /// 24-hour clock packed as `HHMM`, e.g. `1430`.
    pub time: u32,
    pub po_num: String,
    pub product_num: String,
    pub product_desc: String,
    pub unit_num: String,
    pub unit_barcode: String,
    pub quantity: Decimal,
    pub unit_price_less_taxes: Decimal,
    /// Federal excise tax.
    pub fet: Decimal,
    /// Provincial fuel tax.
    pub pft: Decimal,
    /// Carbon tax.
    pub ctx: Decimal,
    /// Harmonized sales tax.
    pub hst: Decimal,
    pub total_price: Decimal,
}

impl TryFrom<ProviderInvoice> for InvoiceRecord {
    type Error = ConversionError;

    fn try_from(raw: ProviderInvoice) -> Result<Self, Self::Error> {
        let delivery_time = parse_delivery_time(raw.time)?;

        let details = InvoiceDetails {
            ticket_number: raw.ticket,
            po_number: raw.po_num,
            ship_to_code: raw.ship_to,
            ship_to_name: raw.ship_to_desc,
            ship_to_address: raw.ship_to_addr,
            product_code: raw.product_num,
            product_description: raw.product_desc,
            unit_number: raw.unit_num,
            unit_barcode: raw.unit_barcode,
            quantity: raw.quantity,
            unit_price_less_taxes: raw.unit_price_less_taxes,
            taxes: TaxBreakdown {
                federal_excise: raw.fet,
                provincial_fuel: raw.pft,
                carbon: raw.ctx,
                sales: raw.hst,
            },
            total_price: raw.total_price,
        };

        let invoice_number = raw.invoice;
        InvoiceRecord::new(invoice_number.clone(), raw.date, delivery_time, details).map_err(
            |source| ConversionError::InvalidRecord {
                invoice_number,
                source,
            },
        )
    }
}

fn parse_delivery_time(packed: u32) -> Result<NaiveTime, ConversionError> {
    NaiveTime::from_hms_opt(packed / 100, packed % 100, 0)
        .ok_or(ConversionError::InvalidTime(packed))
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Invalid delivery time {0}, expected HHMM")]
    InvalidTime(u32),

    #[error("Invoice {invoice_number} rejected: {source}")]
    InvalidRecord {
        invoice_number: String,
        #[source]
        source: InvoiceValidationError,
    },
}
