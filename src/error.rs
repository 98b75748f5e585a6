use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum MenuError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Flash card already exists")]
    DuplicateCard,

    #[error("Missing email or token; log in first")]
    MissingCredential,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Token rejected by remote service: {message}")]
    TokenRejected { message: String },

    #[error("Remote service answered with HTTP status {0}")]
    RemoteStatus(reqwest::StatusCode),

    #[error("Remote error ({code}): {message}")]
    Remote { code: i32, message: String },
}

impl From<figment::Error> for MenuError {
    fn from(e: figment::Error) -> Self {
        MenuError::Config(Box::new(e))
    }
}

impl MenuError {
    /// Map a database error onto `DuplicateCard` when it is a unique violation.
    pub(crate) fn from_write(e: SqlxError) -> Self {
        match e.as_database_error() {
            Some(db) if db.is_unique_violation() => MenuError::DuplicateCard,
            _ => MenuError::DatabaseError(e),
        }
    }

    /// Short human-readable line shown to the user after a failed action.
    pub fn status_message(&self) -> String {
        match self {
            MenuError::DuplicateCard => "Flash card already exists".to_string(),
            MenuError::MissingCredential => "Missing data to request audio".to_string(),
            MenuError::InvalidInput(reason) => reason.clone(),
            MenuError::TokenRejected { message } => {
                format!("Token invalid or expired, log in again: {message}")
            }
            MenuError::Remote { code, message } => format!("Error ({code}): {message}"),
            MenuError::RemoteStatus(status) => {
                format!("Remote service unavailable (HTTP {})", status.as_u16())
            }
            MenuError::Http(_) | MenuError::UrlParse(_) => {
                "There was an error reaching the remote service.".to_string()
            }
            MenuError::Base64(_) => "Received audio could not be decoded.".to_string(),
            MenuError::DatabaseError(_) => "A database error occurred.".to_string(),
            MenuError::Io(e) => format!("Storage error: {e}"),
            MenuError::Json(_) => "Stored data is corrupt.".to_string(),
            MenuError::Config(e) => format!("Configuration error: {e}"),
        }
    }
}
