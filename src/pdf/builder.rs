use lopdf::content::{Content, Operation};
use lopdf::Object;

use super::metrics::{encode_win_ansi, text_width, wrap_text};
use crate::core::{ColumnAlign, Font, PdfConfig, Rgb, TableData};

/// Compone bloques (títulos, espacios, tablas) en páginas de operadores PDF.
///
/// El cursor avanza de arriba hacia abajo; cuando un bloque no cabe sobre el
/// margen inferior se abre una página nueva, nunca dejando una vacía.
pub struct PdfBuilder {
    config: PdfConfig,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    cursor: f32,
}

#[derive(Clone, Copy)]
enum RowKind {
    Header,
    Body,
}

impl PdfBuilder {
    pub fn new(config: PdfConfig) -> Self {
        let cursor = config.page_dimensions().1 - config.margin.top;
        PdfBuilder {
            config,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor,
        }
    }

    fn top(&self) -> f32 {
        self.config.page_dimensions().1 - self.config.margin.top
    }

    fn bottom(&self) -> f32 {
        self.config.margin.bottom
    }

    /// Páginas con contenido hasta el momento, incluida la actual
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(!self.ops.is_empty())
    }

    pub fn add_page_break(&mut self) -> &mut Self {
        if !self.ops.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
            tracing::debug!(pages = self.pages.len(), "page break");
        }
        self.cursor = self.top();
        self
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < self.bottom() && !self.ops.is_empty() {
            self.add_page_break();
        }
    }

    pub fn add_title(&mut self, title: &str, font_size: f32) -> &mut Self {
        let font = Font::HelveticaBold;
        let leading = font_size * 1.2;
        let width = self.config.content_width();
        let left = self.config.margin.left;

        for line in wrap_text(font, font_size, title, width) {
            self.ensure_space(leading);
            let x = left + (width - text_width(font, font_size, &line)) / 2.0;
            let baseline = self.cursor - font_size;
            self.push_text(font, font_size, Rgb::BLACK, x, baseline, &line);
            self.cursor -= leading;
        }
        self.add_spacer(6.0)
    }

    pub fn add_spacer(&mut self, height: f32) -> &mut Self {
        self.cursor -= height;
        if self.cursor < self.bottom() {
            self.add_page_break();
        }
        self
    }

    pub fn add_table(&mut self, table: &TableData) -> &mut Self {
        let columns = table.column_count();
        if columns == 0 {
            return self;
        }

        let content_width = self.config.content_width();
        let widths = table
            .column_widths
            .clone()
            .filter(|w| w.len() >= columns)
            .unwrap_or_else(|| vec![content_width / columns as f32; columns]);
        let table_width: f32 = widths.iter().take(columns).sum();
        let x0 = self.config.margin.left + ((content_width - table_width) / 2.0).max(0.0);

        if !table.headers.is_empty() {
            self.add_row(table, &table.headers, &widths[..columns], x0, RowKind::Header);
        }
        for row in &table.rows {
            self.add_row(table, row, &widths[..columns], x0, RowKind::Body);
        }
        self
    }

    fn add_row(&mut self, table: &TableData, cells: &[String], widths: &[f32], x0: f32, kind: RowKind) {
        let style = &table.style;
        let (font, size, color, fill, bottom_padding) = match kind {
            RowKind::Header => (
                style.header_font,
                style.header_font_size,
                style.header_text_color,
                style.header_fill,
                style.header_bottom_padding,
            ),
            RowKind::Body => (
                style.font,
                style.font_size,
                style.text_color,
                style.body_fill,
                style.vertical_padding,
            ),
        };
        let leading = style.leading(size);
        let padding = style.horizontal_padding;

        let lines: Vec<Vec<String>> = widths
            .iter()
            .enumerate()
            .map(|(col, width)| {
                let text = cells.get(col).map(String::as_str).unwrap_or("");
                wrap_text(font, size, text, (width - 2.0 * padding).max(1.0))
            })
            .collect();
        let line_count = lines.iter().map(Vec::len).max().unwrap_or(1);
        let height = line_count as f32 * leading + style.vertical_padding + bottom_padding;

        self.ensure_space(height);
        let top = self.cursor;
        let row_width: f32 = widths.iter().sum();

        if let Some(fill) = fill {
            self.push_color("rg", fill);
            self.ops.push(Operation::new(
                "re",
                vec![x0.into(), (top - height).into(), row_width.into(), height.into()],
            ));
            self.ops.push(Operation::new("f", vec![]));
        }

        let mut x = x0;
        for (col, width) in widths.iter().enumerate() {
            if let Some(stroke) = style.grid {
                self.ops.push(Operation::new("w", vec![stroke.into()]));
                self.push_color("RG", Rgb::BLACK);
                self.ops.push(Operation::new(
                    "re",
                    vec![x.into(), (top - height).into(), (*width).into(), height.into()],
                ));
                self.ops.push(Operation::new("S", vec![]));
            }

            for (i, line) in lines[col].iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let line_width = text_width(font, size, line);
                let line_x = match table.align_of(col) {
                    ColumnAlign::Left => x + padding,
                    ColumnAlign::Center => x + (width - line_width) / 2.0,
                    ColumnAlign::Right => x + width - padding - line_width,
                };
                let baseline = top - style.vertical_padding - size - i as f32 * leading;
                self.push_text(font, size, color, line_x, baseline, line);
            }
            x += width;
        }

        self.cursor -= height;
    }

    fn push_color(&mut self, operator: &str, color: Rgb) {
        self.ops.push(Operation::new(
            operator,
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
    }

    fn push_text(&mut self, font: Font, size: f32, color: Rgb, x: f32, y: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource_name().into(), size.into()],
        ));
        self.push_color("rg", color);
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(text))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Cierra la página actual y devuelve el contenido de todas las páginas
    pub fn build(mut self) -> Vec<Content> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }
        self.pages
            .into_iter()
            .map(|operations| Content { operations })
            .collect()
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        PdfBuilder::new(PdfConfig::default())
    }
}
