use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Engine call `{operation}` returned status {code}")]
    Status { operation: &'static str, code: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Native status code carried by this error, if it came from a binding call.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            BridgeError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
