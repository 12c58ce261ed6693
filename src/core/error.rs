//! Crate-wide error type and result alias

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardenError {
    #[error("dependency unavailable: {0}")]
    MissingDependency(&'static str),

    #[error("no resolvable target: {0}")]
    InvalidTarget(&'static str),

    #[error("no curve configured for {0}")]
    ConfigurationGap(String),

    #[error("numeric anomaly in {context}: {value}")]
    NumericAnomaly { context: &'static str, value: f32 },

    #[error("config load error: {0}")]
    ConfigLoad(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, WardenError>;
