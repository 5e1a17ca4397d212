use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use super::Uploader;
use crate::core::{DocumentError, DocumentResult, StorageConfig};

const DEFAULT_REGION: &str = "us-east-1";
const PDF_CONTENT_TYPE: &str = "application/pdf";

pub struct S3Client {
    client: Client,
    endpoint_url: Option<String>,
}

impl S3Client {
    /// Cliente a partir de la configuración de almacenamiento.
    ///
    /// Con `endpoint_url` se usa direccionamiento por ruta (MinIO, R2, ...).
    /// Si faltan las claves estáticas se recurre a la cadena de proveedores
    /// por defecto de AWS.
    pub async fn from_config(config: &StorageConfig) -> DocumentResult<Self> {
        let region = config.region().unwrap_or(DEFAULT_REGION).to_string();

        let mut builder = match config.static_credentials() {
            Some((access_key_id, secret_access_key)) => {
                let credentials = Credentials::new(
                    access_key_id,
                    secret_access_key,
                    None,
                    None,
                    "invoicegen-config",
                );
                aws_sdk_s3::config::Builder::new()
                    .behavior_version(BehaviorVersion::latest())
                    .region(Region::new(region))
                    .credentials_provider(credentials)
            }
            None => {
                let region_provider = RegionProviderChain::first_try(Region::new(region))
                    .or_else(DEFAULT_REGION);
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(region_provider)
                    .load()
                    .await;
                aws_sdk_s3::config::Builder::from(&shared)
            }
        };

        if let Some(endpoint) = config.endpoint_url() {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(S3Client {
            client: Client::from_conf(builder.build()),
            endpoint_url: config.endpoint_url().map(str::to_string),
        })
    }

    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> DocumentResult<String> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| DocumentError::Upload(format!("{}/{}: {}", bucket, key, DisplayErrorContext(&e))))?;

        Ok(self.object_url(bucket, key))
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
            None => format!("https://{}.s3.amazonaws.com/{}", bucket, key),
        }
    }
}

#[async_trait]
impl Uploader for S3Client {
    async fn upload(&self, data: Bytes, bucket: &str, key: &str) -> DocumentResult<String> {
        self.put_object(bucket, key, data, PDF_CONTENT_TYPE).await
    }
}
