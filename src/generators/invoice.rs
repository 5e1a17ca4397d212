use chrono::{Duration, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use super::fake;
use crate::core::{DocumentError, DocumentResult, Money};
use crate::models::{InvoiceNumber, InvoiceRecord, LineItem, TaxRate, MAX_LINE_ITEMS};

/// Ventana hacia atrás desde "hoy" en la que se elige la fecha de emisión
pub const ISSUE_WINDOW_DAYS: i64 = 365;

pub const MAX_QUANTITY: u32 = 10;

/// Rango del precio unitario, en centavos
pub const MIN_UNIT_PRICE_CENTS: i64 = 1_000;
pub const MAX_UNIT_PRICE_CENTS: i64 = 50_000;

/// Generador de facturas sintéticas.
///
/// No guarda estado aleatorio propio: la fuente de entropía se recibe en cada
/// llamada, de modo que un `StdRng` con semilla produce lotes reproducibles.
#[derive(Debug, Clone)]
pub struct InvoiceGenerator {
    today: NaiveDate,
    tax_rates: Vec<TaxRate>,
}

impl Default for InvoiceGenerator {
    fn default() -> Self {
        InvoiceGenerator::new()
    }
}

impl InvoiceGenerator {
    pub fn new() -> Self {
        InvoiceGenerator {
            today: Local::now().date_naive(),
            tax_rates: TaxRate::PERMITTED.to_vec(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_tax_rates(mut self, tax_rates: Vec<TaxRate>) -> DocumentResult<Self> {
        if tax_rates.is_empty() {
            return Err(DocumentError::invalid_argument(
                "se requiere al menos una alícuota de IVA",
            ));
        }
        self.tax_rates = tax_rates;
        Ok(self)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Genera una factura completa para `company_name` con el número dado.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        company_name: &str,
        invoice_number: &str,
    ) -> DocumentResult<InvoiceRecord> {
        if company_name.trim().is_empty() {
            return Err(DocumentError::invalid_argument(
                "el nombre de la empresa emisora es obligatorio",
            ));
        }
        let invoice_number: InvoiceNumber = invoice_number.parse()?;

        let customer_name = fake::company_name(rng);
        let customer_address = fake::address(rng);
        let issue_date = self.issue_date(rng);

        let item_count = rng.gen_range(1..=MAX_LINE_ITEMS);
        let items: Vec<LineItem> = (0..item_count).map(|_| self.line_item(rng)).collect();

        let tax_rate = *self
            .tax_rates
            .choose(rng)
            .ok_or_else(|| DocumentError::invalid_argument("no hay alícuotas de IVA configuradas"))?;

        InvoiceRecord::new(
            invoice_number,
            company_name.to_string(),
            customer_name,
            customer_address,
            issue_date,
            items,
            tax_rate,
        )
    }

    fn issue_date<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        let days_back = rng.gen_range(0..=ISSUE_WINDOW_DAYS);
        self.today - Duration::days(days_back)
    }

    fn line_item<R: Rng + ?Sized>(&self, rng: &mut R) -> LineItem {
        let quantity = rng.gen_range(1..=MAX_QUANTITY);
        let unit_price = Money::from_cents(rng.gen_range(MIN_UNIT_PRICE_CENTS..=MAX_UNIT_PRICE_CENTS));
        LineItem::new(fake::catch_phrase(rng), quantity, unit_price)
    }
}
