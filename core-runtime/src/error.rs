use thiserror::Error;

/// Errors raised while wiring the core: configuration and logging setup.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid value, unparsable log filter, or logging already initialized.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A host dependency the core cannot run without was not provided.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
