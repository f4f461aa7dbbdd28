//! Typed failures of catalog requests.

use serde::Serialize;
use thiserror::Error;

/// Why a catalog request did not produce a result list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error{}", fmt_cause(.cause))]
    Network { cause: Option<String> },
    #[error("unexpected http status {code}{}", fmt_cause(.cause))]
    HttpStatus { code: u16, cause: Option<String> },
    #[error("malformed response body{}", fmt_cause(.cause))]
    Decode { cause: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum FetchErrorKind {
    Network,
    HttpStatus(u16),
    Decode,
}

impl FetchError {
    pub fn network(cause: impl ToString) -> Self {
        Self::Network {
            cause: Some(cause.to_string()),
        }
    }

    pub fn http_status(code: u16) -> Self {
        Self::HttpStatus { code, cause: None }
    }

    pub fn decode(cause: impl ToString) -> Self {
        Self::Decode {
            cause: Some(cause.to_string()),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network { .. } => FetchErrorKind::Network,
            FetchError::HttpStatus { code, .. } => FetchErrorKind::HttpStatus(*code),
            FetchError::Decode { .. } => FetchErrorKind::Decode,
        }
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            FetchError::Network { cause }
            | FetchError::HttpStatus { cause, .. }
            | FetchError::Decode { cause } => cause.as_deref(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::HttpStatus {
                code: status.as_u16(),
                cause: Some(err.to_string()),
            };
        }
        if err.is_decode() {
            return Self::decode(err);
        }
        // Timeouts, refused connections, resets and body read failures.
        Self::network(err)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err)
    }
}

fn fmt_cause(cause: &Option<String>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}
