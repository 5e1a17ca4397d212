use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de generación: {0}")]
    Generation(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error de subida: {0}")]
    Upload(String),
}

impl DocumentError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        DocumentError::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, DocumentError::InvalidArgument(_))
    }
}

impl From<lopdf::Error> for DocumentError {
    fn from(error: lopdf::Error) -> Self {
        DocumentError::Generation(error.to_string())
    }
}

impl From<::config::ConfigError> for DocumentError {
    fn from(error: ::config::ConfigError) -> Self {
        DocumentError::Config(error.to_string())
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
