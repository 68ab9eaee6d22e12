//! Provider capabilities.
//!
//! - [`CalendarProvider`] submits built events to a calendar backend.
//! - [`CredentialProvider`] obtains and refreshes OAuth credentials. The real
//!   implementation opens a browser; tests use [`StaticCredentialProvider`].

use std::future::Future;
use std::pin::Pin;

use movienight_core::EventRecord;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};
use crate::google::TokenInfo;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the traits object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handle to an event created by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    /// Provider-assigned identifier.
    pub id: String,
    /// Link to the event in the provider's web UI.
    pub html_link: Option<String>,
}

impl CreatedEvent {
    pub fn new(id: impl Into<String>, html_link: Option<String>) -> Self {
        Self {
            id: id.into(),
            html_link,
        }
    }
}

/// A calendar backend that events can be submitted to.
pub trait CalendarProvider: Send + Sync {
    /// Returns the name of this provider (e.g., "google").
    fn name(&self) -> &str;

    /// Creates `event` on the calendar `calendar_id`, notifying attendees.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, quota exhaustion, or when
    /// the provider rejects the event.
    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a EventRecord,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>>;
}

/// A freshly refreshed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Lifetime in seconds, when the server reports one.
    pub expires_in: Option<i64>,
}

/// Source of OAuth credentials.
pub trait CredentialProvider: Send + Sync {
    /// Obtains a new credential, typically through user consent.
    fn authorize<'a>(&'a self, scopes: &'a [String]) -> BoxFuture<'a, ProviderResult<TokenInfo>>;

    /// Exchanges a refresh token for a new access token.
    fn refresh<'a>(&'a self, refresh_token: &'a str)
    -> BoxFuture<'a, ProviderResult<RefreshedToken>>;
}

/// A [`CredentialProvider`] returning canned tokens, for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    token: Option<TokenInfo>,
    refreshed: Option<RefreshedToken>,
}

impl StaticCredentialProvider {
    /// Provider whose `authorize` returns `token`.
    pub fn new(token: TokenInfo) -> Self {
        Self {
            token: Some(token),
            refreshed: None,
        }
    }

    /// Sets the result of `refresh`.
    pub fn with_refresh(mut self, access_token: impl Into<String>, expires_in: Option<i64>) -> Self {
        self.refreshed = Some(RefreshedToken {
            access_token: access_token.into(),
            expires_in,
        });
        self
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn authorize<'a>(&'a self, scopes: &'a [String]) -> BoxFuture<'a, ProviderResult<TokenInfo>> {
        Box::pin(async move {
            let mut token = self
                .token
                .clone()
                .ok_or_else(|| ProviderError::authentication("no canned credential"))?;
            if token.scopes.is_empty() {
                token.scopes = scopes.to_vec();
            }
            Ok(token)
        })
    }

    fn refresh<'a>(
        &'a self,
        _refresh_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RefreshedToken>> {
        Box::pin(async move {
            self.refreshed
                .clone()
                .ok_or_else(|| ProviderError::authentication("token refresh failed"))
        })
    }
}
