//! Provider errors.
//!
//! Every failure from consent, token refresh or event submission carries a
//! [`ProviderErrorCode`]. The batch uses [`ProviderError::is_transient`] to
//! tell a rerun-worthy failure (quota, network, 5xx) from one that will fail
//! the same way next time (bad attendee, revoked consent).

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of the calendar backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Consent denied, token revoked or expired beyond refresh.
    AuthenticationFailed,
    /// The account may not write to the target calendar.
    AuthorizationFailed,
    /// Connection, DNS or timeout.
    NetworkError,
    /// Calendar API quota or rate limit.
    RateLimited,
    /// 5xx from the calendar API.
    ServerError,
    /// A body we could not decode.
    InvalidResponse,
    /// The API rejected the event itself.
    BadRequest,
    /// OAuth client file or token storage problem.
    ConfigurationError,
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true if the same request may succeed on a later run.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn backend_prefix(provider: &Option<String>) -> String {
    provider
        .as_ref()
        .map(|name| format!("[{}] ", name))
        .unwrap_or_default()
}

/// A failed consent, refresh or submission.
#[derive(Debug, Error)]
#[error("{}{}: {}", backend_prefix(.provider), .code, .message)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Backend name, e.g. "google".
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

macro_rules! shorthand {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ProviderErrorCode::$code, message)
            }
        )*
    };
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    shorthand! {
        authentication => AuthenticationFailed,
        authorization => AuthorizationFailed,
        network => NetworkError,
        rate_limited => RateLimited,
        server => ServerError,
        invalid_response => InvalidResponse,
        bad_request => BadRequest,
        configuration => ConfigurationError,
        internal => InternalError,
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// See [`ProviderErrorCode::is_transient`].
    pub fn is_transient(&self) -> bool {
        self.code.is_transient()
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_and_outages_are_transient() {
        assert!(ProviderError::rate_limited("quota").is_transient());
        assert!(ProviderError::server("503").is_transient());
        assert!(ProviderError::network("timed out").is_transient());
        assert!(!ProviderError::bad_request("Invalid attendee email.").is_transient());
        assert!(!ProviderError::authentication("revoked").is_transient());
    }

    #[test]
    fn display_with_and_without_backend() {
        let err = ProviderError::rate_limited("quota exceeded").with_provider("google");
        assert_eq!(err.to_string(), "[google] rate_limited: quota exceeded");

        let err = ProviderError::authentication("refresh token revoked");
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.to_string(), "authentication_failed: refresh token revoked");
    }

    #[test]
    fn source_is_kept() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ProviderError::configuration("failed to write token file").with_source(io_err);
        assert!(err.source().is_some());
    }
}
