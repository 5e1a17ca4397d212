use chrono::{Duration, NaiveDate};

use super::{InvoiceNumber, TaxRate};
use crate::core::{DocumentError, DocumentResult, Money};

/// Días de plazo entre la emisión y el vencimiento
pub const PAYMENT_TERM_DAYS: i64 = 30;

pub const MAX_LINE_ITEMS: usize = 5;

/// Línea de factura; el total siempre es `cantidad × precio unitario`
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    description: String,
    quantity: u32,
    unit_price: Money,
    total: Money,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: Money) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
            total: unit_price * quantity,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub grand_total: Money,
}

impl InvoiceTotals {
    pub fn from_subtotal(subtotal: Money, tax_rate: TaxRate) -> Self {
        let tax_amount = tax_rate.apply(subtotal);
        InvoiceTotals {
            subtotal,
            tax_rate,
            tax_amount,
            grand_total: subtotal + tax_amount,
        }
    }

    /// Totales a partir de los importes ya calculados de cada línea
    pub fn calculate(items: &[LineItem], tax_rate: TaxRate) -> Self {
        let subtotal = items.iter().map(|item| item.total()).sum();
        InvoiceTotals::from_subtotal(subtotal, tax_rate)
    }
}

/// Factura sintética completa. Inmutable una vez creada: el vencimiento y
/// los totales se derivan en `InvoiceRecord::new`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    invoice_number: InvoiceNumber,
    issuer_name: String,
    customer_name: String,
    customer_address: String,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    line_items: Vec<LineItem>,
    totals: InvoiceTotals,
}

impl InvoiceRecord {
    pub fn new(
        invoice_number: InvoiceNumber,
        issuer_name: String,
        customer_name: String,
        customer_address: String,
        issue_date: NaiveDate,
        line_items: Vec<LineItem>,
        tax_rate: TaxRate,
    ) -> DocumentResult<Self> {
        if issuer_name.trim().is_empty() {
            return Err(DocumentError::invalid_argument(
                "el nombre de la empresa emisora es obligatorio",
            ));
        }
        if line_items.is_empty() || line_items.len() > MAX_LINE_ITEMS {
            return Err(DocumentError::invalid_argument(format!(
                "una factura lleva entre 1 y {} líneas, se recibieron {}",
                MAX_LINE_ITEMS,
                line_items.len()
            )));
        }

        let totals = InvoiceTotals::calculate(&line_items, tax_rate);
        Ok(InvoiceRecord {
            invoice_number,
            issuer_name,
            customer_name,
            customer_address,
            issue_date,
            due_date: issue_date + Duration::days(PAYMENT_TERM_DAYS),
            line_items,
            totals,
        })
    }

    pub fn invoice_number(&self) -> InvoiceNumber {
        self.invoice_number
    }

    pub fn issuer_name(&self) -> &str {
        &self.issuer_name
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_address(&self) -> &str {
        &self.customer_address
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_quantity_times_price() {
        let item = LineItem::new("Servicio", 7, Money::from_cents(12_999));
        assert_eq!(item.total(), Money::from_cents(90_993));
    }

    #[test]
    fn fixed_subtotal_at_general_rate() {
        let totals = InvoiceTotals::from_subtotal(Money::from_units(100), TaxRate::GENERAL);
        assert_eq!(totals.tax_amount, Money::from_units(21));
        assert_eq!(totals.grand_total, Money::from_units(121));
        assert_eq!(totals.grand_total.format(), "$121.00");
    }

    fn record(issuer: &str, items: Vec<LineItem>) -> DocumentResult<InvoiceRecord> {
        InvoiceRecord::new(
            InvoiceNumber::new(1).unwrap(),
            issuer.into(),
            "Cliente".into(),
            "Calle 1".into(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            items,
            TaxRate::REDUCED,
        )
    }

    #[test]
    fn record_derives_totals_from_items() {
        let record = record(
            "Acme",
            vec![
                LineItem::new("A", 2, Money::from_cents(1_050)),
                LineItem::new("B", 1, Money::from_cents(4_975)),
            ],
        )
        .unwrap();
        let totals = record.totals();
        assert_eq!(totals.subtotal, Money::from_cents(7_075));
        assert_eq!(totals.tax_amount, Money::from_cents(743));
        assert_eq!(totals.grand_total, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn due_date_is_derived_from_issue_date() {
        let record = record("Acme", vec![LineItem::new("A", 1, Money::from_units(10))]).unwrap();
        assert_eq!(
            record.due_date(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert!(record.due_date() > record.issue_date());
    }

    #[test]
    fn record_without_items_is_rejected() {
        let err = record("Acme", Vec::new()).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn record_with_too_many_items_is_rejected() {
        let items = vec![LineItem::new("A", 1, Money::from_units(10)); MAX_LINE_ITEMS + 1];
        assert!(record("Acme", items).unwrap_err().is_invalid_argument());

        let items = vec![LineItem::new("A", 1, Money::from_units(10)); MAX_LINE_ITEMS];
        assert!(record("Acme", items).is_ok());
    }

    #[test]
    fn record_without_issuer_is_rejected() {
        for issuer in ["", "   "] {
            let err = record(issuer, vec![LineItem::new("A", 1, Money::from_units(10))]).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }
}
