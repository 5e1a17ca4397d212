pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::core::DocumentResult;

pub use s3::S3Client;

/// Capacidad de subir un documento ya serializado a un almacén de objetos.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Sube `data` a `bucket`/`key` y devuelve la URL del objeto
    async fn upload(&self, data: Bytes, bucket: &str, key: &str) -> DocumentResult<String>;
}
