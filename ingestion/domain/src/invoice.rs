use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single fuel delivery line as published by the billing provider.
///
/// Records are immutable once built; every field is read through an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    invoice_number: String,
    delivery_date: NaiveDate,
    delivery_time: NaiveTime,
    details: InvoiceDetails,
}

/// Commercial fields carried through from the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub ticket_number: String,
    pub po_number: String,
    pub ship_to_code: String,
    pub ship_to_name: String,
    pub ship_to_address: String,
    pub product_code: String,
    pub product_description: String,
    pub unit_number: String,
    pub unit_barcode: String,
    pub quantity: Decimal,
    pub unit_price_less_taxes: Decimal,
    pub taxes: TaxBreakdown,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub federal_excise: Decimal,
    pub provincial_fuel: Decimal,
    pub carbon: Decimal,
    pub sales: Decimal,
}

impl TaxBreakdown {
    pub fn total(&self) -> Decimal {
        self.federal_excise + self.provincial_fuel + self.carbon + self.sales
    }
}

impl InvoiceRecord {
    pub fn new(
        invoice_number: String,
        delivery_date: NaiveDate,
        delivery_time: NaiveTime,
        details: InvoiceDetails,
    ) -> Result<Self, InvoiceValidationError> {
        if invoice_number.trim().is_empty() {
            return Err(InvoiceValidationError::EmptyInvoiceNumber);
        }

        Ok(Self {
            invoice_number,
            delivery_date,
            delivery_time,
            details,
        })
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn delivery_date(&self) -> NaiveDate {
        self.delivery_date
    }

    pub fn delivery_time(&self) -> NaiveTime {
        self.delivery_time
    }

    pub fn delivered_at(&self) -> NaiveDateTime {
        self.delivery_date.and_time(self.delivery_time)
    }

    pub fn details(&self) -> &InvoiceDetails {
        &self.details
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvoiceValidationError {
    #[error("Invoice number cannot be empty")]
    EmptyInvoiceNumber,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 30).unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(14, 30, 0).unwrap()
    }

    #[test]
    fn test_valid_invoice_creation() {
        let details = InvoiceDetails {
            ticket_number: "T-100".to_string(),
            quantity: dec!(250.5),
            ..Default::default()
        };

        let record = InvoiceRecord::new("INV-1".to_string(), date(), time(), details).unwrap();

        assert_eq!(record.invoice_number(), "INV-1");
        assert_eq!(record.details().ticket_number, "T-100");
        assert_eq!(
            record.delivered_at(),
            NaiveDate::from_ymd_opt(2023, 6, 30)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_blank_invoice_number_rejected() {
        let result =
            InvoiceRecord::new("  ".to_string(), date(), time(), InvoiceDetails::default());

        assert!(matches!(
            result,
            Err(InvoiceValidationError::EmptyInvoiceNumber)
        ));
    }

    #[test]
    fn test_credit_line_with_negative_amounts_accepted() {
        let details = InvoiceDetails {
            quantity: dec!(-120),
            total_price: dec!(-210.44),
            ..Default::default()
        };

        let record = InvoiceRecord::new("INV-2".to_string(), date(), time(), details).unwrap();

        assert_eq!(record.details().quantity, dec!(-120));
        assert_eq!(record.details().total_price, dec!(-210.44));
    }

    #[test]
    fn test_tax_total() {
        let taxes = TaxBreakdown {
            federal_excise: dec!(0.04),
            provincial_fuel: dec!(0.09),
            carbon: dec!(0.1431),
            sales: dec!(1.25),
        };

        assert_eq!(taxes.total(), dec!(1.5231));
    }
}
