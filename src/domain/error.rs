use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for the FerroBank API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BankError {
    // Request validation errors
    Validation(ValidationError),

    // Ledger rule violations
    Ledger(LedgerError),

    // Authentication errors
    Auth(AuthError),

    // Storage errors
    Storage(StorageError),

    // Configuration errors
    Config(ConfigError),

    // Generic errors
    Generic(String),
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::Validation(e) => write!(f, "Validation error: {e}"),
            BankError::Ledger(e) => write!(f, "Ledger error: {e}"),
            BankError::Auth(e) => write!(f, "Authentication error: {e}"),
            BankError::Storage(e) => write!(f, "Storage error: {e}"),
            BankError::Config(e) => write!(f, "Configuration error: {e}"),
            BankError::Generic(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for BankError {}

impl ResponseError for BankError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_response) = match self {
            BankError::Validation(e) => e.to_http_response(),
            BankError::Ledger(e) => e.to_http_response(),
            BankError::Auth(e) => e.to_http_response(),
            BankError::Storage(e) => e.to_http_response(),
            BankError::Config(e) => e.to_http_response(),
            BankError::Generic(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "Internal server error",
                    "message": msg,
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }),
            ),
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl From<anyhow::Error> for BankError {
    fn from(err: anyhow::Error) -> Self {
        BankError::Generic(err.to_string())
    }
}

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        BankError::Storage(StorageError::Io(err.to_string()))
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        BankError::Storage(StorageError::Corrupt(err.to_string()))
    }
}

// Validation Error Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ValidationError {
    MissingField(String),
    InvalidField(String),
    InvalidAmount(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ValidationError::InvalidField(msg) => write!(f, "Invalid field: {msg}"),
            ValidationError::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
        }
    }
}

impl ValidationError {
    pub fn to_http_response(&self) -> (actix_web::http::StatusCode, serde_json::Value) {
        let error_type = match self {
            ValidationError::MissingField(_) => "MISSING_FIELD",
            ValidationError::InvalidField(_) => "INVALID_FIELD",
            ValidationError::InvalidAmount(_) => "INVALID_AMOUNT",
        };

        (
            actix_web::http::StatusCode::BAD_REQUEST,
            serde_json::json!({
                "error": error_type,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        )
    }
}

// Ledger Error Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerError {
    UsernameTaken(String),
    AccountNotFound(String),
    RecipientNotFound(u32),
    SelfTransfer,
    InsufficientFunds,
    AccountNumberSpaceExhausted,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::UsernameTaken(username) => {
                write!(f, "Username already exists: {username}")
            }
            LedgerError::AccountNotFound(id) => write!(f, "Account not found: {id}"),
            LedgerError::RecipientNotFound(number) => {
                write!(f, "Recipient account number not found: {number}")
            }
            LedgerError::SelfTransfer => {
                write!(f, "You cannot transfer to your own account")
            }
            LedgerError::InsufficientFunds => {
                write!(f, "Insufficient balance for the transfer")
            }
            LedgerError::AccountNumberSpaceExhausted => {
                write!(f, "No free account numbers left in the 4-digit space")
            }
        }
    }
}

impl LedgerError {
    pub fn to_http_response(&self) -> (actix_web::http::StatusCode, serde_json::Value) {
        let (status_code, error_type) = match self {
            LedgerError::UsernameTaken(_) => {
                (actix_web::http::StatusCode::CONFLICT, "USERNAME_TAKEN")
            }
            LedgerError::AccountNotFound(_) => {
                (actix_web::http::StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND")
            }
            LedgerError::RecipientNotFound(_) => {
                (actix_web::http::StatusCode::NOT_FOUND, "RECIPIENT_NOT_FOUND")
            }
            LedgerError::SelfTransfer => {
                (actix_web::http::StatusCode::BAD_REQUEST, "SELF_TRANSFER")
            }
            LedgerError::InsufficientFunds => {
                (actix_web::http::StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS")
            }
            LedgerError::AccountNumberSpaceExhausted => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "ACCOUNT_NUMBER_SPACE_EXHAUSTED",
            ),
        };

        (
            status_code,
            serde_json::json!({
                "error": error_type,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        )
    }
}

// Authentication Error Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    InvalidCredentials,
    Hashing(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authentication token not provided"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid or expired token: {msg}"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::Hashing(msg) => write!(f, "Password hashing failed: {msg}"),
        }
    }
}

impl AuthError {
    pub fn to_http_response(&self) -> (actix_web::http::StatusCode, serde_json::Value) {
        let (status_code, error_type) = match self {
            AuthError::MissingToken => {
                (actix_web::http::StatusCode::UNAUTHORIZED, "MISSING_TOKEN")
            }
            AuthError::InvalidToken(_) => {
                (actix_web::http::StatusCode::FORBIDDEN, "INVALID_TOKEN")
            }
            AuthError::InvalidCredentials => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
            ),
            AuthError::Hashing(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "HASHING_FAILED",
            ),
        };

        (
            status_code,
            serde_json::json!({
                "error": error_type,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        )
    }
}

// Storage Error Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StorageError {
    Io(String),
    Corrupt(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "Store unavailable: {msg}"),
            StorageError::Corrupt(msg) => write!(f, "Store content is corrupt: {msg}"),
        }
    }
}

impl StorageError {
    pub fn to_http_response(&self) -> (actix_web::http::StatusCode, serde_json::Value) {
        let (status_code, error_type) = match self {
            StorageError::Io(_) => (
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
            ),
            StorageError::Corrupt(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_CORRUPT",
            ),
        };

        (
            status_code,
            serde_json::json!({
                "error": error_type,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        )
    }
}

// Configuration Error Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVariable(name) => {
                write!(f, "Missing environment variable: {name}")
            }
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {msg}"),
        }
    }
}

impl ConfigError {
    pub fn to_http_response(&self) -> (actix_web::http::StatusCode, serde_json::Value) {
        (
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": "CONFIGURATION_ERROR",
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let (status, body) =
            ValidationError::InvalidAmount("must be positive".to_string()).to_http_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_AMOUNT");
    }

    #[test]
    fn test_ledger_error_status_codes() {
        let (status, _) = LedgerError::UsernameTaken("alice".to_string()).to_http_response();
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = LedgerError::InsufficientFunds.to_http_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = LedgerError::RecipientNotFound(4321).to_http_response();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = LedgerError::AccountNumberSpaceExhausted.to_http_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_errors_are_server_side() {
        let (status, _) = StorageError::Io("disk full".to_string()).to_http_response();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = StorageError::Corrupt("bad json".to_string()).to_http_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bank_error_response_includes_message() {
        let err = BankError::Ledger(LedgerError::SelfTransfer);
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
