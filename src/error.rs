//! Structured Error Handling
//!
//! A unified error type with numeric codes, JSON-friendly rendering and HTTP
//! status mapping for the ingestion endpoints.
//!
//! Error families:
//! - `1xxx` validation - bad request payloads and parameters
//! - `2xxx` config - configuration file and environment issues
//! - `3xxx` store - assessment-log I/O
//! - `4xxx` network - outbound HTTP (simulator)
//! - `9xxx` internal
//!
//! Note that the inference engine itself has no error surface: `infer`
//! always returns a valid assessment (degenerate cases resolve to the
//! neutral fallback score), so no engine family exists here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    /// Generic validation error
    ValidationError = 1000,
    /// Empty or missing payload
    EmptyInput = 1001,
    /// Field present but unusable (NaN, infinite, wrong type)
    InvalidValue = 1002,
    /// Required field or query parameter missing
    MissingRequired = 1003,

    // Config errors (2xxx)
    /// Generic config error
    ConfigError = 2000,
    /// Config file not found
    ConfigNotFound = 2001,
    /// Invalid config syntax
    InvalidConfigSyntax = 2002,

    // Store errors (3xxx)
    /// Assessment log I/O failure
    StoreError = 3000,

    // Network errors (4xxx)
    /// Outbound HTTP failure
    NetworkError = 4000,

    // Internal errors (9xxx)
    /// Internal error
    InternalError = 9000,
}

impl ErrorCode {
    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Validation error",
            ErrorCode::EmptyInput => "Empty input",
            ErrorCode::InvalidValue => "Invalid value",
            ErrorCode::MissingRequired => "Missing required field",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ConfigNotFound => "Configuration file not found",
            ErrorCode::InvalidConfigSyntax => "Invalid configuration syntax",
            ErrorCode::StoreError => "Store error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::InternalError => "Internal error",
        }
    }

    /// HTTP status for this code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::EmptyInput
            | ErrorCode::InvalidValue
            | ErrorCode::MissingRequired => 400,
            ErrorCode::ConfigNotFound => 404,
            ErrorCode::ConfigError
            | ErrorCode::InvalidConfigSyntax
            | ErrorCode::StoreError
            | ErrorCode::NetworkError
            | ErrorCode::InternalError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// The main error type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressError {
    pub code: ErrorCode,
    pub message: String,
    /// Key-value context for diagnostics.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
    /// Hint for resolving the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl StressError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: HashMap::new(),
            hint: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn empty_input(field: &str) -> Self {
        Self::new(ErrorCode::EmptyInput, format!("{field} cannot be empty"))
    }

    pub fn invalid_value(field: &str, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidValue,
            format!("invalid value for {field}: {}", detail.into()),
        )
    }

    pub fn missing(field: &str) -> Self {
        Self::new(ErrorCode::MissingRequired, format!("missing {field}"))
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreError, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }

    /// JSON body for HTTP error responses.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL_ERROR","message":"{}"}}"#, self.message)
        })
    }
}

impl fmt::Display for StressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        for (key, value) in &self.context {
            write!(f, " ({key}={value})")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " - hint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StressError {}

impl From<std::io::Error> for StressError {
    fn from(e: std::io::Error) -> Self {
        StressError::store(e.to_string())
    }
}

impl From<csv::Error> for StressError {
    fn from(e: csv::Error) -> Self {
        StressError::store(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StressError>;
