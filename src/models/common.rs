use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::core::{DocumentError, Money};

/// Cantidad de dígitos de un número de factura
pub const INVOICE_NUMBER_WIDTH: usize = 16;

/// Capacidad del espacio de numeración: 10^16 números distintos
pub const NUMBERING_CAPACITY: u64 = 10_000_000_000_000_000;

/// Número de factura de 16 dígitos, rellenado con ceros a la izquierda
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvoiceNumber(pub(crate) u64);

impl InvoiceNumber {
    pub fn new(value: u64) -> Result<Self, DocumentError> {
        if value >= NUMBERING_CAPACITY {
            return Err(DocumentError::invalid_argument(format!(
                "el número de factura {} excede los {} dígitos",
                value, INVOICE_NUMBER_WIDTH
            )));
        }
        Ok(InvoiceNumber(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = INVOICE_NUMBER_WIDTH)
    }
}

impl FromStr for InvoiceNumber {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DocumentError::invalid_argument(
                "el número de factura es obligatorio",
            ));
        }
        if s.len() != INVOICE_NUMBER_WIDTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DocumentError::invalid_argument(format!(
                "el número de factura debe tener {} dígitos: {:?}",
                INVOICE_NUMBER_WIDTH, s
            )));
        }
        s.parse::<u64>()
            .map_err(|e| DocumentError::invalid_argument(e.to_string()))
            .and_then(InvoiceNumber::new)
    }
}

/// Alícuota de IVA expresada en puntos básicos (2100 = 21%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaxRate {
    basis_points: u32,
}

impl TaxRate {
    pub const REDUCED: TaxRate = TaxRate::from_basis_points(1050);
    pub const GENERAL: TaxRate = TaxRate::from_basis_points(2100);

    /// Alícuotas permitidas (tasas de IVA comunes en Argentina)
    pub const PERMITTED: [TaxRate; 2] = [TaxRate::REDUCED, TaxRate::GENERAL];

    pub const fn from_basis_points(basis_points: u32) -> Self {
        TaxRate { basis_points }
    }

    pub fn basis_points(&self) -> u32 {
        self.basis_points
    }

    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.basis_points), 4)
    }

    /// Impuesto sobre `subtotal`, redondeado al centavo (mitad hacia arriba)
    pub fn apply(&self, subtotal: Money) -> Money {
        Money::from_decimal(subtotal.amount() * self.as_fraction())
    }

    /// Etiqueta de la fila de impuesto, p. ej. `IVA (21.0%)`
    pub fn label(&self) -> String {
        format!("IVA ({:.1}%)", Decimal::new(i64::from(self.basis_points), 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_is_zero_padded() {
        assert_eq!(InvoiceNumber::new(42).unwrap().to_string(), "0000000000000042");
        assert_eq!(
            InvoiceNumber::new(NUMBERING_CAPACITY - 1).unwrap().to_string(),
            "9999999999999999"
        );
        assert!(InvoiceNumber::new(NUMBERING_CAPACITY).is_err());
    }

    #[test]
    fn invoice_number_parsing_requires_sixteen_digits() {
        let number: InvoiceNumber = "0000000000000042".parse().unwrap();
        assert_eq!(number.value(), 42);

        for bad in ["", "42", "00000000000000042", "00000000000000x2", "+000000000000042"] {
            let err = bad.parse::<InvoiceNumber>().unwrap_err();
            assert!(err.is_invalid_argument(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn tax_is_rounded_half_up_to_the_cent() {
        assert_eq!(TaxRate::GENERAL.apply(Money::from_units(100)), Money::from_units(21));
        // 0.05 * 10.5% = 0.00525 -> 0.01
        assert_eq!(TaxRate::REDUCED.apply(Money::from_cents(5)), Money::from_cents(1));
        // 0.04 * 10.5% = 0.0042 -> 0.00
        assert_eq!(TaxRate::REDUCED.apply(Money::from_cents(4)), Money::ZERO);
    }

    #[test]
    fn tax_label_has_one_decimal() {
        assert_eq!(TaxRate::GENERAL.label(), "IVA (21.0%)");
        assert_eq!(TaxRate::REDUCED.label(), "IVA (10.5%)");
    }
}
