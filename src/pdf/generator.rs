use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use super::builder::PdfBuilder;
use super::metrics::decode_win_ansi;
use crate::core::{
    ColumnAlign, DocumentError, DocumentMetadata, DocumentResult, Font, PdfConfig, Rgb,
    TableData, TableStyle,
};
use crate::models::{InvoiceNumber, InvoiceRecord};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Destino del documento renderizado
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Directorio existente donde se escribe `invoice_<número>.pdf`
    LocalDirectory(PathBuf),
    /// Buffer en memoria; no toca el sistema de archivos
    MemoryBuffer,
}

#[derive(Debug)]
pub enum RenderedDocument {
    File(PathBuf),
    Buffer(Cursor<Vec<u8>>),
}

impl RenderedDocument {
    pub fn path(&self) -> Option<&Path> {
        match self {
            RenderedDocument::File(path) => Some(path),
            RenderedDocument::Buffer(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            RenderedDocument::File(_) => None,
            RenderedDocument::Buffer(cursor) => Some(cursor.into_inner()),
        }
    }
}

/// Nombre de archivo de una factura: `invoice_<16 dígitos>.pdf`
pub fn file_name(number: InvoiceNumber) -> String {
    format!("invoice_{}.pdf", number)
}

/// Renderiza facturas a PDF con el diseño fijo de tres bloques
pub struct InvoiceRenderer {
    config: PdfConfig,
}

impl Default for InvoiceRenderer {
    fn default() -> Self {
        InvoiceRenderer::new(PdfConfig::default())
    }
}

impl InvoiceRenderer {
    pub fn new(config: PdfConfig) -> Self {
        InvoiceRenderer { config }
    }

    pub fn render(
        &self,
        record: &InvoiceRecord,
        destination: &Destination,
    ) -> DocumentResult<RenderedDocument> {
        match destination {
            Destination::LocalDirectory(dir) => {
                if !dir.is_dir() {
                    return Err(DocumentError::invalid_argument(format!(
                        "el directorio de salida no existe: {}",
                        dir.display()
                    )));
                }
                let bytes = self.to_bytes(record)?;
                let path = dir.join(file_name(record.invoice_number()));
                write_atomically(&path, &bytes)?;
                Ok(RenderedDocument::File(path))
            }
            Destination::MemoryBuffer => {
                let bytes = self.to_bytes(record)?;
                Ok(RenderedDocument::Buffer(Cursor::new(bytes)))
            }
        }
    }

    /// Serializa la factura completa a bytes PDF
    pub fn to_bytes(&self, record: &InvoiceRecord) -> DocumentResult<Vec<u8>> {
        let pages = self.layout(record).build();
        let metadata = DocumentMetadata {
            title: format!("Factura {}", record.invoice_number()),
            author: Some(record.issuer_name().to_string()),
            subject: Some(format!("Factura para {}", record.customer_name())),
        };
        self.assemble(pages, &metadata)
    }

    fn layout(&self, record: &InvoiceRecord) -> PdfBuilder {
        let mut builder = PdfBuilder::new(self.config.clone());

        // Encabezado
        builder.add_title(record.issuer_name(), 18.0).add_spacer(12.0);

        // Datos de la factura y del cliente
        let mut info = TableData::headless().with_column_widths(vec![120.0, 300.0]);
        info.add_row(vec![
            "Fecha de factura:".into(),
            record.issue_date().format(DATE_FORMAT).to_string(),
        ]);
        info.add_row(vec![
            "Fecha de vencimiento:".into(),
            record.due_date().format(DATE_FORMAT).to_string(),
        ]);
        info.add_row(vec!["N° de factura:".into(), record.invoice_number().to_string()]);
        info.add_row(vec!["Cliente:".into(), record.customer_name().to_string()]);
        info.add_row(vec![
            "Dirección del cliente:".into(),
            record.customer_address().to_string(),
        ]);
        builder.add_table(&info).add_spacer(24.0);

        // Tabla de items
        let mut items = TableData::new(vec![
            "Descripción".into(),
            "Cantidad".into(),
            "Precio Unitario".into(),
            "Total".into(),
        ])
        .with_column_widths(vec![250.0, 70.0, 100.0, 100.0])
        .with_style(TableStyle {
            header_fill: Some(Rgb::GREY),
            header_text_color: Rgb::WHITE_SMOKE,
            header_bottom_padding: 12.0,
            body_fill: Some(Rgb::BEIGE),
            grid: Some(1.0),
            ..TableStyle::default()
        });
        for item in record.line_items() {
            items.add_row(vec![
                item.description().to_string(),
                item.quantity().to_string(),
                item.unit_price().format(),
                item.total().format(),
            ]);
        }
        builder.add_table(&items).add_spacer(24.0);

        // Totales
        let totals = record.totals();
        let mut summary = TableData::headless()
            .with_column_widths(vec![400.0, 100.0])
            .with_alignment(vec![ColumnAlign::Right, ColumnAlign::Right])
            .with_style(TableStyle {
                font: Font::HelveticaBold,
                font_size: 12.0,
                ..TableStyle::default()
            });
        summary.add_row(vec!["Subtotal:".into(), totals.subtotal.format()]);
        summary.add_row(vec![
            format!("{}:", totals.tax_rate.label()),
            totals.tax_amount.format(),
        ]);
        summary.add_row(vec!["Total:".into(), totals.grand_total.format()]);
        builder.add_table(&summary);

        tracing::debug!(
            invoice = %record.invoice_number(),
            pages = builder.page_count(),
            "invoice laid out"
        );
        builder
    }

    fn assemble(&self, pages: Vec<Content>, metadata: &DocumentMetadata) -> DocumentResult<Vec<u8>> {
        let (width, height) = self.config.page_dimensions();
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            fonts.set(
                font.resource_name(),
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => font.base_font(),
                    "Encoding" => "WinAnsiEncoding",
                },
            );
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids = Vec::with_capacity(pages.len());
        for content in pages {
            let stream = Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                deflate(&content.encode()?)?,
            );
            let content_id = doc.add_object(stream);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), width.into(), height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Title" => text_string(&metadata.title),
            "Producer" => text_string(&self.config.producer),
        };
        if let Some(author) = &metadata.author {
            info.set("Author", text_string(author));
        }
        if let Some(subject) = &metadata.subject {
            info.set("Subject", text_string(subject));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// Cadena de texto del diccionario Info: ASCII tal cual, el resto en
/// UTF-16BE con BOM
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn deflate(data: &[u8]) -> DocumentResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Escribe en un temporal del mismo directorio y lo renombra al destino;
/// si algo falla no queda un archivo parcial.
fn write_atomically(path: &Path, bytes: &[u8]) -> DocumentResult<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DocumentError::invalid_argument("ruta de salida inválida"))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = fs::write(&temp_path, bytes).and_then(|_| fs::rename(&temp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Fragmentos de texto mostrados (`Tj`) en todas las páginas, en orden
pub fn extract_text(pdf: &[u8]) -> DocumentResult<Vec<String>> {
    let doc = Document::load_mem(pdf)?;
    let mut fragments = Vec::new();

    for (_, page_id) in doc.get_pages() {
        let content = Content::decode(&doc.get_page_content(page_id)?)?;
        fragments.extend(
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| op.operands.first())
                .filter_map(|operand| operand.as_str().ok())
                .map(decode_win_ansi),
        );
    }
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Money;
    use crate::models::{LineItem, TaxRate};
    use chrono::NaiveDate;

    fn sample_record() -> InvoiceRecord {
        let issue = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        InvoiceRecord::new(
            InvoiceNumber::new(42).unwrap(),
            "Acme".into(),
            "Gómez y Sosa S.R.L.".into(),
            "Av. Corrientes 1234, Rosario (2000), Santa Fe".into(),
            issue,
            vec![
                LineItem::new("Solución Integral En Tiempo Real", 2, Money::from_cents(2_500)),
                LineItem::new("Red Modular A Medida", 1, Money::from_cents(5_000)),
            ],
            TaxRate::GENERAL,
        )
        .unwrap()
    }

    #[test]
    fn file_name_uses_the_padded_number() {
        assert_eq!(file_name(InvoiceNumber::new(7).unwrap()), "invoice_0000000000000007.pdf");
    }

    #[test]
    fn memory_render_contains_every_block() {
        let renderer = InvoiceRenderer::default();
        let rendered = renderer
            .render(&sample_record(), &Destination::MemoryBuffer)
            .unwrap();
        assert!(rendered.path().is_none());

        let bytes = rendered.into_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let text = extract_text(&bytes).unwrap();
        let expected = [
            "Acme",
            "Fecha de factura:",
            "05/02/2024",
            "Fecha de vencimiento:",
            "06/03/2024",
            "N° de factura:",
            "0000000000000042",
            "Cliente:",
            "Gómez y Sosa S.R.L.",
            "Dirección del cliente:",
            "Descripción",
            "Cantidad",
            "Precio Unitario",
            "Total",
            "$25.00",
            "$50.00",
            "Subtotal:",
            "$100.00",
            "IVA (21.0%):",
            "$21.00",
            "Total:",
            "$121.00",
        ];
        for fragment in expected {
            assert!(text.iter().any(|t| t == fragment), "missing {:?} in {:?}", fragment, text);
        }
    }

    #[test]
    fn buffer_is_positioned_at_start() {
        let rendered = InvoiceRenderer::default()
            .render(&sample_record(), &Destination::MemoryBuffer)
            .unwrap();
        match rendered {
            RenderedDocument::Buffer(cursor) => assert_eq!(cursor.position(), 0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn a4_pages_use_a4_media_box() {
        let renderer = InvoiceRenderer::new(
            PdfConfig::builder()
                .page_size(crate::core::PageSize::A4)
                .build(),
        );
        let bytes = renderer.to_bytes(&sample_record()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert!((media_box[2].as_float().unwrap() - 595.28).abs() < 0.01);
    }

    #[test]
    fn info_strings_outside_ascii_are_utf16() {
        match text_string("Acme") {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Acme"),
            other => panic!("unexpected {:?}", other),
        }
        match text_string("O’B") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, b'O', 0x20, 0x19, 0x00, b'B'])
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
