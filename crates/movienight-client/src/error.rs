//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that stop a run.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error (attendees, client file, timezone, titles).
    Config(String),
    /// Provider error (authentication, API).
    Provider(String),
    /// IO error.
    Io(std::io::Error),
    /// The run ledger could not be read or written.
    Ledger(String),
    /// The confirmation prompt failed.
    Prompt(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(msg) => write!(f, "provider error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Ledger(msg) => write!(f, "ledger error: {}", msg),
            Self::Prompt(msg) => write!(f, "prompt failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<movienight_providers::ProviderError> for ClientError {
    fn from(err: movienight_providers::ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

impl From<movienight_core::ScheduleError> for ClientError {
    fn from(err: movienight_core::ScheduleError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<dialoguer::Error> for ClientError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movienight_providers::ProviderError;

    #[test]
    fn display_prefixes() {
        let err = ClientError::Config("no attendees".to_string());
        assert_eq!(err.to_string(), "configuration error: no attendees");

        let err: ClientError = ProviderError::authentication("token refresh failed")
            .with_provider("google")
            .into();
        assert_eq!(
            err.to_string(),
            "provider error: [google] authentication_failed: token refresh failed"
        );
    }

    #[test]
    fn schedule_errors_are_configuration_errors() {
        let err: ClientError = movienight_core::ScheduleError::InvalidTimezone("Mars/Olympus".into()).into();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("Mars/Olympus"));
    }
}
