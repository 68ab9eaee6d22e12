//! The `auth` command: obtain and store a credential without scheduling.

use std::path::PathBuf;

use movienight_providers::google::{Authenticator, OAuthClient};
use tracing::info;

use crate::config::{ClientConfig, GoogleSettings};
use crate::error::ClientResult;

/// Runs the Google authentication flow.
///
/// A valid stored credential is reused (and refreshed if needed) unless
/// `force` is set, in which case it is discarded and consent runs again.
pub async fn google(
    credentials_file: Option<PathBuf>,
    token_path: Option<PathBuf>,
    force: bool,
    config: &ClientConfig,
) -> ClientResult<()> {
    let settings = settings(&config.google, credentials_file, token_path);
    let google_config = settings.to_provider_config()?;
    let oauth = OAuthClient::new(&google_config)?;
    let mut authenticator = Authenticator::new(&google_config, oauth);

    if force {
        authenticator.clear()?;
    } else if authenticator.storage().path().exists() {
        println!(
            "Found stored credential at {}",
            authenticator.storage().path().display()
        );
        println!("Use --force to re-authenticate.");
    }

    println!("Authenticating with Google Calendar...");
    println!("If a browser window opens, grant calendar access to continue.");
    authenticator.obtain_session().await?;

    info!("Google authentication successful");
    println!();
    println!("Authentication successful!");
    println!(
        "Credential saved to {}",
        authenticator.storage().path().display()
    );
    Ok(())
}

/// Applies `auth` flags on top of the `[google]` section.
fn settings(
    base: &GoogleSettings,
    credentials_file: Option<PathBuf>,
    token_path: Option<PathBuf>,
) -> GoogleSettings {
    let mut settings = base.clone();
    if let Some(path) = credentials_file {
        settings.credentials_file = path;
    }
    if token_path.is_some() {
        settings.token_path = token_path;
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn flags_override_settings() {
        let base = GoogleSettings {
            token_path: Some(PathBuf::from("config-token.json")),
            ..Default::default()
        };
        let merged = settings(&base, Some(PathBuf::from("client.json")), None);
        assert_eq!(merged.credentials_file, PathBuf::from("client.json"));
        assert_eq!(merged.token_path, Some(PathBuf::from("config-token.json")));

        let merged = settings(&base, None, Some(PathBuf::from("cli-token.json")));
        assert_eq!(merged.credentials_file, PathBuf::from("credentials.json"));
        assert_eq!(merged.token_path, Some(PathBuf::from("cli-token.json")));
    }

    #[tokio::test]
    async fn missing_client_file_fails_before_consent() {
        let dir = tempfile::tempdir().unwrap();
        let err = google(
            Some(dir.path().join("absent.json")),
            Some(dir.path().join("token.json")),
            false,
            &ClientConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(!dir.path().join("token.json").exists());
    }
}
