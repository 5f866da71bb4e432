use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A suggestion was offered for a field that cannot be rewritten from text.
    #[error("No automatic fix for field '{0}'")]
    UnsupportedFix(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
