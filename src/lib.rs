pub mod core;
pub mod emission;
pub mod generators;
pub mod models;
pub mod pdf;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{DocumentError, DocumentResult, PdfConfig, StorageConfig};
pub use emission::{BatchReport, Emission, EmissionRouter, EmissionTarget, InvoiceSequence};
pub use generators::InvoiceGenerator;
pub use models::{InvoiceNumber, InvoiceRecord, LineItem, TaxRate};
pub use pdf::{Destination, InvoiceRenderer, RenderedDocument};
pub use storage::{S3Client, Uploader};
