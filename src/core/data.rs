use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

/// Símbolo de moneda usado al mostrar importes
pub const CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, Clone)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub column_widths: Option<Vec<f32>>,
    pub alignment: Option<Vec<ColumnAlign>>,
    pub style: TableStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnAlign {
    Left,
    Center,
    Right,
}

impl TableData {
    pub fn new(headers: Vec<String>) -> Self {
        TableData {
            headers,
            rows: Vec::new(),
            column_widths: None,
            alignment: None,
            style: TableStyle::default(),
        }
    }

    /// Tabla sin fila de encabezado (pares clave/valor, totales)
    pub fn headless() -> Self {
        TableData::new(Vec::new())
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn with_column_widths(mut self, widths: Vec<f32>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    pub fn with_alignment(mut self, alignment: Vec<ColumnAlign>) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn align_of(&self, column: usize) -> ColumnAlign {
        self.alignment
            .as_ref()
            .and_then(|a| a.get(column).copied())
            .unwrap_or(ColumnAlign::Left)
    }
}

/// Fuentes estándar de PDF; no requieren incrustar archivos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

    /// Nombre del recurso en el diccionario `/Font` de la página
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GREY: Rgb = Rgb(0.502, 0.502, 0.502);
    pub const WHITE_SMOKE: Rgb = Rgb(0.961, 0.961, 0.961);
    pub const BEIGE: Rgb = Rgb(0.961, 0.961, 0.863);
}

#[derive(Debug, Clone)]
pub struct TableStyle {
    pub font: Font,
    pub font_size: f32,
    pub text_color: Rgb,
    pub header_font: Font,
    pub header_font_size: f32,
    pub header_text_color: Rgb,
    pub header_fill: Option<Rgb>,
    pub header_bottom_padding: f32,
    pub body_fill: Option<Rgb>,
    /// Grosor de la grilla; `None` para una tabla sin bordes
    pub grid: Option<f32>,
    pub horizontal_padding: f32,
    pub vertical_padding: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        TableStyle {
            font: Font::Helvetica,
            font_size: 10.0,
            text_color: Rgb::BLACK,
            header_font: Font::HelveticaBold,
            header_font_size: 10.0,
            header_text_color: Rgb::BLACK,
            header_fill: None,
            header_bottom_padding: 3.0,
            body_fill: None,
            grid: None,
            horizontal_padding: 6.0,
            vertical_padding: 3.0,
        }
    }
}

impl TableStyle {
    pub fn leading(&self, font_size: f32) -> f32 {
        font_size * 1.2
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// Importe monetario con exactamente dos decimales
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    amount: Decimal,
}

impl Money {
    pub const ZERO: Money = Money {
        amount: Decimal::ZERO,
    };

    /// Redondea al centavo, mitad hacia arriba (lejos de cero)
    pub fn from_decimal(amount: Decimal) -> Self {
        Money {
            amount: amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    pub fn from_cents(cents: i64) -> Self {
        Money {
            amount: Decimal::new(cents, 2),
        }
    }

    pub fn from_units(units: i64) -> Self {
        Money {
            amount: Decimal::from(units),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Formato de presentación: símbolo y exactamente dos decimales
    pub fn format(&self) -> String {
        let sign = if self.amount.is_sign_negative() && !self.amount.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{}{}{:.2}", sign, CURRENCY_SYMBOL, self.amount.abs())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money {
            amount: self.amount + rhs.amount,
        }
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        Money {
            amount: self.amount * Decimal::from(quantity),
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formats_with_prefix_and_two_decimals() {
        assert_eq!(Money::from_cents(12_345).format(), "$123.45");
        assert_eq!(Money::from_cents(1_000).to_string(), "$10.00");
        assert_eq!(Money::from_cents(7).format(), "$0.07");
        assert_eq!(Money::from_cents(-250).format(), "-$2.50");
    }

    #[test]
    fn money_arithmetic_is_exact() {
        let price = Money::from_cents(3_333);
        assert_eq!(price * 3, Money::from_cents(9_999));
        let total: Money = [price, Money::from_cents(1)].iter().sum();
        assert_eq!(total, Money::from_cents(3_334));
        assert_eq!(Money::from_units(100), Money::from_cents(10_000));
    }

    #[test]
    fn from_decimal_rounds_half_away_from_zero() {
        // 10.045 -> 10.05, 10.044 -> 10.04
        assert_eq!(Money::from_decimal(Decimal::new(10_045, 3)), Money::from_cents(1_005));
        assert_eq!(Money::from_decimal(Decimal::new(10_044, 3)), Money::from_cents(1_004));
        assert_eq!(Money::from_decimal(Decimal::new(-10_045, 3)), Money::from_cents(-1_005));
        assert_eq!(Money::from_decimal(Decimal::new(42, 4)), Money::ZERO);
        assert_eq!(Money::from_units(5).format(), "$5.00");
    }

    #[test]
    fn column_count_covers_headers_and_rows() {
        let mut table = TableData::headless();
        table.add_row(vec!["a".into(), "b".into()]);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.align_of(1), ColumnAlign::Left);

        let table = TableData::new(vec!["x".into(); 4]).with_alignment(vec![ColumnAlign::Right]);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.align_of(0), ColumnAlign::Right);
    }
}
