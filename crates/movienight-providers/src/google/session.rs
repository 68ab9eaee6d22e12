//! Turning stored or fresh credentials into an authenticated session.

use std::time::Duration;

use tracing::{info, warn};

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::tokens::TokenStorage;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::CredentialProvider;

/// An authenticated Google Calendar session.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: String,
    timeout: Duration,
    user_agent: String,
}

impl Session {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Builds a calendar client using this session's access token.
    pub fn calendar_client(&self) -> ProviderResult<GoogleCalendarClient> {
        GoogleCalendarClient::new(&self.access_token, self.timeout, &self.user_agent)
    }
}

/// Obtains a usable session, reusing the persisted credential when possible.
///
/// In order:
/// 1. a stored token that is still valid is reused as is
/// 2. an expired token with a refresh token is refreshed and re-saved
/// 3. otherwise the credential provider is asked for a new token, which is
///    saved for the next run
///
/// A stored token lacking a required scope goes straight to step 3.
pub struct Authenticator<P> {
    storage: TokenStorage,
    credentials: P,
    scopes: Vec<String>,
    timeout: Duration,
    user_agent: String,
}

impl<P: CredentialProvider> Authenticator<P> {
    pub fn new(config: &GoogleConfig, credentials: P) -> Self {
        Self {
            storage: TokenStorage::new(&config.token_path),
            credentials,
            scopes: config.scopes.clone(),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn storage(&self) -> &TokenStorage {
        &self.storage
    }

    /// Forgets the stored credential so the next session re-consents.
    pub fn clear(&mut self) -> ProviderResult<()> {
        self.storage.clear()
    }

    /// Returns an authenticated session.
    ///
    /// # Errors
    ///
    /// A failed refresh is returned as is; it does not fall back to
    /// interactive consent. Failures persisting a new token are errors too.
    pub async fn obtain_session(&mut self) -> ProviderResult<Session> {
        if let Err(e) = self.storage.load() {
            warn!(
                "ignoring unreadable token file {:?}: {}",
                self.storage.path(),
                e
            );
        }

        if self.storage.needs_reauth(&self.scopes) {
            if self.storage.get().is_some() {
                info!("stored token lacks required scopes, re-authorizing");
            }
            return self.authorize().await;
        }

        let Some(tokens) = self.storage.get() else {
            return self.authorize().await;
        };

        if !tokens.is_expired() {
            info!("using stored credential");
            return Ok(self.session(tokens.access_token.clone()));
        }

        if !tokens.is_refreshable() {
            info!("stored token expired and cannot be refreshed");
            return self.authorize().await;
        }

        let refresh_token = tokens.refresh_token.clone().unwrap_or_default();
        info!("refreshing expired access token");
        let refreshed = self
            .credentials
            .refresh(&refresh_token)
            .await
            .map_err(|e| {
                ProviderError::authentication(format!("token refresh failed: {}", e.message()))
                    .with_provider("google")
                    .with_source(e)
            })?;

        self.storage
            .update_access_token(refreshed.access_token.clone(), refreshed.expires_in)?;
        Ok(self.session(refreshed.access_token))
    }

    async fn authorize(&mut self) -> ProviderResult<Session> {
        info!("starting interactive authorization");
        let tokens = self.credentials.authorize(&self.scopes).await?;
        let access_token = tokens.access_token.clone();
        self.storage.set(tokens)?;
        info!("saved credential to {:?}", self.storage.path());
        Ok(self.session(access_token))
    }

    fn session(&self, access_token: String) -> Session {
        Session {
            access_token,
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}
