pub mod fake;
pub mod invoice;

pub use invoice::InvoiceGenerator;
