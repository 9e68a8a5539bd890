use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Conversion,
    MalformedOverhangs,
    ResultAmbiguous,
    LigationFailed,
    InvalidInput,
    NotFound,
    Io,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloningError {
    pub code: ErrorCode,
    pub message: String,
}

impl CloningError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn conversion(document_name: &str) -> Self {
        Self::new(
            ErrorCode::Conversion,
            format!("'{document_name}' is not a nucleotide sequence"),
        )
    }
}

impl fmt::Display for CloningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CloningError {}

impl From<std::io::Error> for CloningError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorCode::Io, err.to_string())
    }
}

impl From<serde_json::Error> for CloningError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorCode::InvalidInput, err.to_string())
    }
}
