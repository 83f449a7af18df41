//! Client layer: dispatches validated requests over HTTP and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use crate::domain::{ErrorCode, ValidationError, ValidationErrors};

mod gateway;
mod http;
mod sms_net_bd;

pub use gateway::{AdapterConfig, AdapterKind, SmsAdapter, SmsGateway};
pub use http::HttpMethod;
pub use sms_net_bd::{DEFAULT_BASE_URL, SmsNetBd, SmsNetBdBuilder, SmsNetBdConfig};

/// Boxed `Send` future returned by [`SmsAdapter`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, thiserror::Error)]
/// Errors returned by adapters and by [`SmsGateway`] selection.
///
/// Each failure kind is a separate variant so callers can branch without
/// parsing messages:
/// - input rejected before any network call ([`GatewayError::Validation`]),
/// - HTTP-level failures ([`GatewayError::Transport`]),
/// - vendor envelope with `error != 0` ([`GatewayError::Vendor`]),
/// - anything else ([`GatewayError::Unexpected`]).
pub enum GatewayError {
    /// One or more payload fields failed validation. No request was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// The HTTP call failed: network/TLS/timeout error (`status == None`) or a
    /// non-2xx status. `message` prefers the `msg` field of the remote body.
    #[error("API error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The vendor answered with a non-zero envelope `error` code.
    #[error("vendor error {code}: {message}")]
    Vendor { code: ErrorCode, message: String },

    /// Failure that fits no other kind (e.g. an empty or undecodable body).
    #[error("unexpected error: {0}")]
    Unexpected(String),

    /// The adapter identifier is not one of [`AdapterKind::ALL`].
    #[error("adapter {0:?} is invalid or not supported")]
    UnsupportedAdapter(String),

    /// The adapter identifier is known but has no implementation yet.
    #[error("adapter {0} is not available yet")]
    AdapterUnavailable(AdapterKind),
}

impl GatewayError {
    pub(crate) fn unexpected(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Unexpected(UNKNOWN_ERROR.to_owned())
        } else {
            Self::Unexpected(message)
        }
    }

    /// Vendor error code, if this is a [`GatewayError::Vendor`].
    pub fn vendor_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Vendor { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_display_contains_code_and_message() {
        let err = GatewayError::Vendor {
            code: ErrorCode::new(417),
            message: "Insufficient balance".to_owned(),
        };
        let text = err.to_string();
        assert!(text.contains("417"));
        assert!(text.contains("Insufficient balance"));
        assert_eq!(err.vendor_code(), Some(ErrorCode::new(417)));
    }

    #[test]
    fn unexpected_falls_back_to_unknown_error() {
        assert_eq!(
            GatewayError::unexpected("").to_string(),
            "unexpected error: Unknown error"
        );
        assert_eq!(
            GatewayError::unexpected("boom").to_string(),
            "unexpected error: boom"
        );
    }

    #[test]
    fn single_validation_error_converts() {
        let err = GatewayError::from(ValidationError::Empty { field: "api_key" });
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "validation error: api_key must not be empty"
        );
    }

    #[test]
    fn registry_errors_are_descriptive() {
        let err = GatewayError::UnsupportedAdapter("twilio".to_owned());
        assert_eq!(
            err.to_string(),
            "adapter \"twilio\" is invalid or not supported"
        );
        let err = GatewayError::AdapterUnavailable(AdapterKind::BulkSmsDhaka);
        assert_eq!(err.to_string(), "adapter bulk-sms-dhaka is not available yet");
    }
}
