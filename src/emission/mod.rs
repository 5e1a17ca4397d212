pub mod router;
pub mod sequence;

pub use router::{remote_bucket, remote_key, BatchReport, Emission, EmissionRouter, EmissionTarget};
pub use sequence::InvoiceSequence;
