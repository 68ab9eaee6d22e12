//! OAuth token persistence.
//!
//! The token file is JSON, written atomically (temp file + rename) and, on
//! Unix, readable only by the owner.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

/// Seconds shaved off the reported lifetime so a token is refreshed before
/// the server starts rejecting it.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Creates or truncates `path` with owner-only permissions on Unix.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // `mode` only applies when the file is created.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)?;
    file.sync_all()
}

/// An OAuth token set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    /// The OAuth scopes that were granted.
    pub scopes: Vec<String>,
    pub last_refresh: DateTime<Utc>,
}

impl TokenInfo {
    /// Creates a token set from an OAuth token response.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at: expires_in_secs.map(expiry_from_now),
            scopes,
            last_refresh: Utc::now(),
        }
    }

    /// Returns true if the access token is expired or about to expire.
    ///
    /// Tokens without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Utc::now() >= expires_at)
    }

    /// Returns true if a refresh token is available.
    pub fn is_refreshable(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Returns true if every `required` scope was granted.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        required.iter().all(|scope| self.scopes.contains(scope))
    }

    /// Replaces the access token after a refresh.
    pub fn update_access_token(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
    ) {
        self.access_token = access_token.into();
        self.expires_at = expires_in_secs.map(expiry_from_now);
        self.last_refresh = Utc::now();
    }
}

fn expiry_from_now(secs: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(secs) - Duration::seconds(EXPIRY_MARGIN_SECS)
}

/// File-backed token storage.
#[derive(Debug)]
pub struct TokenStorage {
    path: PathBuf,
    tokens: Option<TokenInfo>,
}

impl TokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tokens: None,
        }
    }

    /// Loads tokens from disk.
    ///
    /// Returns `Ok(false)` when no token file exists.
    pub fn load(&mut self) -> ProviderResult<bool> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to read token file: {}", e))
        })?;

        let tokens: TokenInfo = serde_json::from_str(&content).map_err(|e| {
            ProviderError::configuration(format!("failed to parse token file: {}", e))
        })?;

        info!("loaded tokens from {:?}", self.path);
        self.tokens = Some(tokens);
        Ok(true)
    }

    /// Writes the current tokens to disk.
    pub fn save(&self) -> ProviderResult<()> {
        let tokens = self
            .tokens
            .as_ref()
            .ok_or_else(|| ProviderError::internal("no tokens to save"))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| ProviderError::internal(format!("failed to serialize tokens: {}", e)))?;

        write_private(&temp_path, content.as_bytes()).map_err(|e| {
            ProviderError::configuration(format!("failed to write token file: {}", e))
                .with_source(e)
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to rename token file: {}", e))
        })?;

        debug!("saved tokens to {:?}", self.path);
        Ok(())
    }

    pub fn get(&self) -> Option<&TokenInfo> {
        self.tokens.as_ref()
    }

    /// Replaces the tokens and saves them.
    pub fn set(&mut self, tokens: TokenInfo) -> ProviderResult<()> {
        self.tokens = Some(tokens);
        self.save()
    }

    /// Replaces the access token and saves.
    pub fn update_access_token(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
    ) -> ProviderResult<()> {
        let tokens = self
            .tokens
            .as_mut()
            .ok_or_else(|| ProviderError::internal("no tokens to update"))?;
        tokens.update_access_token(access_token, expires_in_secs);
        self.save()
    }

    /// Forgets the tokens, in memory and on disk.
    pub fn clear(&mut self) -> ProviderResult<()> {
        self.tokens = None;
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ProviderError::configuration(format!("failed to remove token file: {}", e))
            })?;
            info!("cleared tokens from {:?}", self.path);
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if re-consent is needed: no tokens, or scopes missing.
    pub fn needs_reauth(&self, required_scopes: &[String]) -> bool {
        self.tokens
            .as_ref()
            .is_none_or(|tokens| !tokens.has_scopes(required_scopes))
    }
}
