//! Renderizado de facturas a PDF con `lopdf`, usando las fuentes estándar
//! Helvetica para no depender de archivos de fuentes.

pub mod builder;
pub mod generator;
pub mod metrics;

pub use builder::PdfBuilder;
pub use generator::{extract_text, file_name, Destination, InvoiceRenderer, RenderedDocument};
