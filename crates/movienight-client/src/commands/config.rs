//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dumps the effective configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);
    Ok(())
}

/// Validates the configuration without touching the network.
///
/// Checks that attendees resolve, the timezone is known and the OAuth client
/// file is readable.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    let attendees = config.resolve_attendees()?;
    println!("Attendees: {}", attendees.join(", "));

    let template = config.template()?;
    println!("Timezone: {}", template.timezone());

    let google = config.google.to_provider_config()?;
    println!(
        "OAuth client: {} ({})",
        google.credentials.client_id,
        config.google.credentials_file.display()
    );
    println!("Token: {}", google.token_path.display());
    println!("Calendar: {}", config.google.calendar_id);

    println!("Configuration is valid.");
    Ok(())
}

/// Shows the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_complete_config() {
        let dir = tempfile::tempdir().unwrap();
        let client_file = dir.path().join("credentials.json");
        std::fs::write(
            &client_file,
            r#"{"installed": {"client_id": "movie.apps.googleusercontent.com", "client_secret": "s"}}"#,
        )
        .unwrap();

        let mut config = ClientConfig {
            attendees: vec!["a@example.com".to_string()],
            ..Default::default()
        };
        config.google.credentials_file = client_file;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn validate_reports_bad_timezone() {
        let mut config = ClientConfig {
            attendees: vec!["a@example.com".to_string()],
            ..Default::default()
        };
        config.event.timezone = "Nowhere/Special".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("Nowhere/Special"));
    }

    #[test]
    fn dump_serializes() {
        assert!(dump(&ClientConfig::default(), Path::new("config.toml")).is_ok());
    }
}
