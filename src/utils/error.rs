use thiserror::Error;

#[derive(Error, Debug)]
pub enum WayfareError {
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Country with code {code} not found")]
    CountryNotFound { code: String },

    #[error("Travel plan with id {id} not found")]
    PlanNotFound { id: String },

    #[error("Country source request failed: {0}")]
    Source(#[from] reqwest::Error),

    #[error("Country source returned an unexpected payload: {0}")]
    SourcePayload(String),

    #[error("Store operation failed: {message}")]
    Store { message: String },
}

impl WayfareError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WayfareError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        WayfareError::Store {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for WayfareError {
    fn from(err: rusqlite::Error) -> Self {
        WayfareError::Store {
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for WayfareError {
    fn from(err: tokio::task::JoinError) -> Self {
        WayfareError::Store {
            message: format!("store worker panicked or was cancelled: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, WayfareError>;
