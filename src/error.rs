//! Error types for proxy-spray.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while turning user input into a scan.
///
/// Token-level variants are recoverable: the offending token is skipped and
/// the rest of the input is still processed. `Configuration` is fatal.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid target spec '{token}': {reason}")]
    InvalidTargetSpec { token: String, reason: String },

    #[error("invalid proxy spec '{token}': {reason}")]
    InvalidProxySpec { token: String, reason: String },

    #[error("invalid http header '{header}': {reason}")]
    InvalidHeader { header: String, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ScanError {
    pub fn invalid_target(token: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTargetSpec {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_proxy(token: &str, reason: impl Into<String>) -> Self {
        Self::InvalidProxySpec {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_header(header: &str, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            header: header.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error must stop the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Why a single probe did not obtain a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Request(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}
