use bytes::Bytes;
use rand::Rng;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::InvoiceSequence;
use crate::core::{DocumentError, DocumentResult, StorageConfig};
use crate::generators::InvoiceGenerator;
use crate::models::InvoiceRecord;
use crate::pdf::{file_name, Destination, InvoiceRenderer, RenderedDocument};
use crate::storage::Uploader;

/// Bucket al que se debe subir, o `None` si la subida remota está inactiva
pub fn remote_bucket(storage: &StorageConfig, remote_disabled: bool) -> Option<&str> {
    if remote_disabled {
        return None;
    }
    storage.bucket()
}

/// Clave remota: prefijo opcional seguido del nombre de archivo
pub fn remote_key(prefix: &str, file_name: &str) -> String {
    format!("{}{}", prefix, file_name)
}

pub enum EmissionTarget {
    Local {
        output_dir: PathBuf,
    },
    Remote {
        bucket: String,
        prefix: String,
        uploader: Arc<dyn Uploader>,
    },
}

impl fmt::Debug for EmissionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmissionTarget::Local { output_dir } => f
                .debug_struct("Local")
                .field("output_dir", output_dir)
                .finish(),
            EmissionTarget::Remote { bucket, prefix, .. } => f
                .debug_struct("Remote")
                .field("bucket", bucket)
                .field("prefix", prefix)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    Written(PathBuf),
    Uploaded { bucket: String, key: String, url: String },
    UploadFailed { key: String, reason: String },
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emission::Written(path) => write!(f, "{}", path.display()),
            Emission::Uploaded { bucket, key, .. } => write!(f, "s3://{}/{}", bucket, key),
            Emission::UploadFailed { key, reason } => write!(f, "{} (fallida: {})", key, reason),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub emissions: Vec<Emission>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|e| matches!(e, Emission::Written(_)))
    }

    pub fn uploaded(&self) -> usize {
        self.count(|e| matches!(e, Emission::Uploaded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|e| matches!(e, Emission::UploadFailed { .. }))
    }

    fn count(&self, predicate: impl Fn(&Emission) -> bool) -> usize {
        self.emissions.iter().filter(|e| predicate(e)).count()
    }
}

/// Encadena generación, renderizado y emisión de un lote de facturas, una a
/// la vez.
pub struct EmissionRouter {
    generator: InvoiceGenerator,
    renderer: InvoiceRenderer,
    target: EmissionTarget,
}

impl EmissionRouter {
    pub fn new(generator: InvoiceGenerator, renderer: InvoiceRenderer, target: EmissionTarget) -> Self {
        EmissionRouter {
            generator,
            renderer,
            target,
        }
    }

    /// Procesa toda la secuencia. Los errores de validación abortan antes de
    /// generar nada; las subidas fallidas se registran y el lote continúa.
    pub async fn run<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        company_name: &str,
        sequence: &InvoiceSequence,
    ) -> DocumentResult<BatchReport> {
        if company_name.trim().is_empty() {
            return Err(DocumentError::invalid_argument(
                "el nombre de la empresa emisora es obligatorio",
            ));
        }
        if let EmissionTarget::Local { output_dir } = &self.target {
            if !output_dir.is_dir() {
                return Err(DocumentError::invalid_argument(format!(
                    "el directorio de salida no existe: {}",
                    output_dir.display()
                )));
            }
        }

        tracing::info!(
            count = sequence.len(),
            start = sequence.start(),
            target = ?self.target,
            "starting invoice batch"
        );

        let mut report = BatchReport::default();
        for number in sequence.iter() {
            let record = self
                .generator
                .generate(rng, company_name, &number.to_string())?;
            let emission = self.emit(&record).await?;
            report.emissions.push(emission);
        }

        tracing::info!(
            written = report.written(),
            uploaded = report.uploaded(),
            failed = report.failed(),
            "invoice batch finished"
        );
        Ok(report)
    }

    async fn emit(&self, record: &InvoiceRecord) -> DocumentResult<Emission> {
        match &self.target {
            EmissionTarget::Local { output_dir } => {
                let destination = Destination::LocalDirectory(output_dir.clone());
                match self.renderer.render(record, &destination)? {
                    RenderedDocument::File(path) => {
                        tracing::info!(invoice = %record.invoice_number(), path = %path.display(), "invoice written");
                        Ok(Emission::Written(path))
                    }
                    RenderedDocument::Buffer(_) => Err(DocumentError::Generation(
                        "se esperaba un archivo y se obtuvo un buffer".to_string(),
                    )),
                }
            }
            EmissionTarget::Remote {
                bucket,
                prefix,
                uploader,
            } => {
                let bytes = self
                    .renderer
                    .render(record, &Destination::MemoryBuffer)?
                    .into_bytes()
                    .ok_or_else(|| {
                        DocumentError::Generation("se esperaba un buffer en memoria".to_string())
                    })?;
                let key = remote_key(prefix, &file_name(record.invoice_number()));

                match uploader.upload(Bytes::from(bytes), bucket, &key).await {
                    Ok(url) => {
                        tracing::info!(invoice = %record.invoice_number(), bucket = %bucket, key = %key, "invoice uploaded");
                        Ok(Emission::Uploaded {
                            bucket: bucket.clone(),
                            key,
                            url,
                        })
                    }
                    Err(e) => {
                        tracing::error!(invoice = %record.invoice_number(), bucket = %bucket, key = %key, error = %e, "invoice upload failed");
                        Ok(Emission::UploadFailed {
                            key,
                            reason: e.to_string(),
                        })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_activates_remote_mode_unless_disabled() {
        let configured = StorageConfig {
            bucket: Some("facturas".into()),
            ..Default::default()
        };
        assert_eq!(remote_bucket(&configured, false), Some("facturas"));
        assert_eq!(remote_bucket(&configured, true), None);

        let empty = StorageConfig::default();
        assert_eq!(remote_bucket(&empty, false), None);

        let blank = StorageConfig {
            bucket: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(remote_bucket(&blank, false), None);
    }

    #[test]
    fn remote_key_prepends_prefix() {
        assert_eq!(
            remote_key("2024/lote-1/", "invoice_0000000000000001.pdf"),
            "2024/lote-1/invoice_0000000000000001.pdf"
        );
        assert_eq!(remote_key("", "invoice_0000000000000001.pdf"), "invoice_0000000000000001.pdf");
    }

    #[test]
    fn report_counts_each_kind() {
        let report = BatchReport {
            emissions: vec![
                Emission::Written(PathBuf::from("a.pdf")),
                Emission::Uploaded {
                    bucket: "b".into(),
                    key: "k".into(),
                    url: "u".into(),
                },
                Emission::UploadFailed {
                    key: "k2".into(),
                    reason: "boom".into(),
                },
                Emission::UploadFailed {
                    key: "k3".into(),
                    reason: "boom".into(),
                },
            ],
        };
        assert_eq!((report.written(), report.uploaded(), report.failed()), (1, 1, 2));
        assert_eq!(report.emissions[1].to_string(), "s3://b/k");
    }
}
