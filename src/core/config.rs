use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use super::{DocumentError, DocumentResult};

/// Prefijo de las variables de entorno que sobrescriben el archivo de configuración
pub const ENV_PREFIX: &str = "INVOICEGEN";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageSize {
    A4,
    Letter,
    Legal,
    Custom(f32, f32), // width, height in points
}

impl PageSize {
    /// Dimensiones en puntos (1pt = 1/72 inch)
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom(w, h) => (*w, *h),
        }
    }
}

impl FromStr for PageSize {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" | "us-letter" => Ok(PageSize::Letter),
            "legal" | "us-legal" => Ok(PageSize::Legal),
            other => Err(DocumentError::invalid_argument(format!(
                "tamaño de página desconocido: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Margin::uniform(72.0)
    }
}

impl Margin {
    pub fn uniform(size: f32) -> Self {
        Margin {
            top: size,
            bottom: size,
            left: size,
            right: size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin: Margin,
    pub producer: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        PdfConfig {
            page_size: PageSize::Letter,
            orientation: Orientation::Portrait,
            margin: Margin::default(),
            producer: format!("invoicegen {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PdfConfig {
    pub fn builder() -> PdfConfigBuilder {
        PdfConfigBuilder::default()
    }

    /// Ancho y alto efectivos de la página según la orientación
    pub fn page_dimensions(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn content_width(&self) -> f32 {
        let (w, _) = self.page_dimensions();
        w - self.margin.left - self.margin.right
    }
}

#[derive(Default)]
pub struct PdfConfigBuilder {
    page_size: Option<PageSize>,
    orientation: Option<Orientation>,
}

impl PdfConfigBuilder {
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn build(self) -> PdfConfig {
        let default = PdfConfig::default();
        PdfConfig {
            page_size: self.page_size.unwrap_or(default.page_size),
            orientation: self.orientation.unwrap_or(default.orientation),
            ..default
        }
    }
}

/// Credenciales y destino del almacenamiento remoto (S3 compatible).
///
/// La presencia de `bucket` es el único interruptor que activa la subida
/// remota; el resto de campos solo se consultan cuando está definido.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl StorageConfig {
    /// Carga la configuración desde `path` (si existe) y la sobrescribe con
    /// las variables `INVOICEGEN_*`.
    pub fn load(path: &Path) -> DocumentResult<Self> {
        let mut builder = ::config::Config::builder();

        if path.exists() {
            tracing::debug!(path = %path.display(), "loading storage configuration file");
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder = builder.add_source(::config::Environment::with_prefix(ENV_PREFIX));

        let config: StorageConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Bucket configurado, ignorando valores vacíos
    pub fn bucket(&self) -> Option<&str> {
        non_blank(self.bucket.as_deref())
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        non_blank(self.endpoint_url.as_deref())
    }

    pub fn region(&self) -> Option<&str> {
        non_blank(self.region.as_deref())
    }

    /// Par de claves estáticas, solo si ambas están presentes
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (
            non_blank(self.access_key_id.as_deref()),
            non_blank(self.secret_access_key.as_deref()),
        ) {
            (Some(key), Some(secret)) => Some((key, secret)),
            _ => None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn landscape_swaps_page_dimensions() {
        let config = PdfConfig::builder()
            .page_size(PageSize::Letter)
            .orientation(Orientation::Landscape)
            .build();
        assert_eq!(config.page_dimensions(), (792.0, 612.0));
        assert_eq!(config.content_width(), 792.0 - 144.0);
    }

    #[test]
    fn page_size_parses_known_names() {
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!("us-letter".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert!("tabloid".parse::<PageSize>().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn storage_config_reads_flat_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoicegen.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "bucket = \"facturas\"\nendpoint_url = \"http://localhost:9000\"\n\
             access_key_id = \"minio\"\nsecret_access_key = \"minio123\"\nregion = \"auto\""
        )
        .unwrap();

        let config = StorageConfig::load(&path).unwrap();
        assert_eq!(config.bucket(), Some("facturas"));
        assert_eq!(config.endpoint_url(), Some("http://localhost:9000"));
        assert_eq!(config.static_credentials(), Some(("minio", "minio123")));
        assert_eq!(config.region(), Some("auto"));
    }

    #[test]
    fn missing_file_means_no_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.bucket(), None);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = StorageConfig {
            bucket: Some("   ".to_string()),
            access_key_id: Some("key".to_string()),
            secret_access_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.bucket(), None);
        assert_eq!(config.static_credentials(), None);
    }
}
