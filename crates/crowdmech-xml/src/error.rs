//! Error type for configuration and state I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("<{0}>: missing mandatory attribute {1}")]
    MissingAttribute(String, String),

    #[error("<{0}>: malformed value {2:?} for attribute {1}")]
    MalformedValue(String, String, String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Model(#[from] crowdmech_model::ModelError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
