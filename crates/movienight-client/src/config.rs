//! Client configuration.
//!
//! All settings live in a single optional `config.toml` file at
//! `~/.config/movienight/config.toml` by default. Every section may be
//! omitted; command-line flags override whatever the file says.
//!
//! Attendee entries support secret references:
//! - `pass::path/in/store`: resolved via `pass show`
//! - `env::VAR_NAME`: resolved from the environment, skipped when unset
//! - plain text: used as-is

use std::path::{Path, PathBuf};

use movienight_core::{EventTemplate, ScheduleResult, SundayConvention, DEFAULT_TIMEZONE};
use movienight_providers::google::{GoogleConfig, OAuthCredentials};
use serde::{Deserialize, Serialize};

use crate::cli::ScheduleArgs;
use crate::error::{ClientError, ClientResult};

const DEFAULT_CALENDAR_ID: &str = "primary";

/// Configuration for the movienight client.
///
/// `attendees` stays the first field: TOML needs plain values before tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Invitee addresses or secret references to them.
    pub attendees: Vec<String>,

    /// Google Calendar settings.
    pub google: GoogleSettings,

    /// Event settings.
    pub event: EventSettings,

    /// Batch run settings.
    pub run: RunSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            attendees: vec!["env::EMAIL_1".to_string(), "env::EMAIL_2".to_string()],
            google: GoogleSettings::default(),
            event: EventSettings::default(),
            run: RunSettings::default(),
        }
    }
}

/// Google Calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// OAuth client JSON downloaded from Google Cloud Console.
    pub credentials_file: PathBuf,

    /// Path to token storage.
    pub token_path: Option<PathBuf>,

    /// Calendar that receives the events.
    pub calendar_id: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from("credentials.json"),
            token_path: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        }
    }
}

/// Event settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// IANA timezone the 19:00 start is expressed in.
    pub timezone: String,

    /// Use the 1st of the month when it is a Sunday.
    pub strict_sunday: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            strict_sunday: false,
        }
    }
}

/// Batch run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Pause between submissions in milliseconds; 0 disables it.
    pub delay_ms: u64,

    /// Ledger file recording each outcome.
    pub ledger_path: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            ledger_path: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("movienight")
            .join("config.toml")
    }

    /// Applies `schedule` flags on top of the file settings.
    pub fn with_overrides(mut self, args: &ScheduleArgs) -> Self {
        if let Some(ref path) = args.credentials_file {
            self.google.credentials_file = path.clone();
        }
        if let Some(ref path) = args.token_path {
            self.google.token_path = Some(path.clone());
        }
        if let Some(ref id) = args.calendar_id {
            self.google.calendar_id = id.clone();
        }
        if args.strict_sunday {
            self.event.strict_sunday = true;
        }
        if let Some(delay) = args.delay_ms {
            self.run.delay_ms = delay;
        }
        if let Some(ref path) = args.ledger {
            self.run.ledger_path = Some(path.clone());
        }
        self
    }

    /// Resolves the attendee list.
    ///
    /// Entries referencing unset environment variables are skipped.
    ///
    /// # Errors
    ///
    /// Fails when nothing resolves, or when a `pass::` lookup fails.
    pub fn resolve_attendees(&self) -> ClientResult<Vec<String>> {
        let mut attendees = Vec::with_capacity(self.attendees.len());
        for entry in &self.attendees {
            let resolved = crate::secret::resolve_optional(entry).map_err(|e| {
                ClientError::Config(format!("failed to resolve attendee '{}': {}", entry, e))
            })?;
            attendees.extend(resolved);
        }

        if attendees.is_empty() {
            return Err(ClientError::Config(
                "no attendee emails found: set EMAIL_1 and/or EMAIL_2 (environment or .env), \
                 or list them under `attendees` in config.toml"
                    .to_string(),
            ));
        }
        Ok(attendees)
    }

    /// The first-Sunday convention selected by `event.strict_sunday`.
    pub fn convention(&self) -> SundayConvention {
        SundayConvention::from_strict(self.event.strict_sunday)
    }

    /// The event template for the configured timezone.
    pub fn template(&self) -> ScheduleResult<EventTemplate> {
        EventTemplate::new(&self.event.timezone)
    }
}

impl GoogleSettings {
    /// Converts to provider configuration.
    ///
    /// Reads the OAuth client file; a missing or malformed file is a
    /// configuration error.
    pub fn to_provider_config(&self) -> ClientResult<GoogleConfig> {
        let credentials = OAuthCredentials::from_file(&self.credentials_file)
            .map_err(|e| ClientError::Config(e.message().to_string()))?;
        credentials.validate().map_err(|e| {
            ClientError::Config(format!(
                "invalid OAuth client in {}: {}",
                self.credentials_file.display(),
                e
            ))
        })?;

        let mut config = GoogleConfig::new(credentials);
        if let Some(ref path) = self.token_path {
            config = config.with_token_path(path);
        }
        config.validate().map_err(ClientError::Config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_client_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("credentials.json");
        std::fs::write(
            &path,
            r#"{"installed": {"client_id": "movie.apps.googleusercontent.com", "client_secret": "s"}}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.attendees, vec!["env::EMAIL_1", "env::EMAIL_2"]);
        assert_eq!(config.google.credentials_file, PathBuf::from("credentials.json"));
        assert_eq!(config.google.calendar_id, "primary");
        assert_eq!(config.event.timezone, "America/New_York");
        assert!(!config.event.strict_sunday);
        assert_eq!(config.run.delay_ms, 1000);
        assert!(config.run.ledger_path.is_none());
        assert!(config.template().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
attendees = ["a@example.com"]

[event]
strict_sunday = true
"#,
        )
        .unwrap();
        assert_eq!(config.attendees, vec!["a@example.com"]);
        assert_eq!(config.convention(), SundayConvention::Strict);
        assert_eq!(config.event.timezone, "America/New_York");
        assert_eq!(config.run.delay_ms, 1000);
    }

    #[test]
    fn full_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
attendees = ["env::MOVIE_FRIEND"]

[google]
credentials_file = "/etc/movienight/client.json"
token_path = "/var/lib/movienight/token.json"
calendar_id = "movies@group.calendar.google.com"

[event]
timezone = "Europe/Paris"

[run]
delay_ms = 250
ledger_path = "ledger.json"
"#,
        )
        .unwrap();
        assert_eq!(
            config.google.token_path,
            Some(PathBuf::from("/var/lib/movienight/token.json"))
        );
        assert_eq!(config.template().unwrap().timezone(), "Europe/Paris");
        assert_eq!(config.run.delay_ms, 250);
        assert_eq!(config.run.ledger_path, Some(PathBuf::from("ledger.json")));
    }

    #[test]
    fn dump_round_trips_through_toml() {
        let mut config = ClientConfig::default();
        config.run.ledger_path = Some(PathBuf::from("ledger.json"));
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.attendees, config.attendees);
        assert_eq!(parsed.run.ledger_path, config.run.ledger_path);
    }

    #[test]
    fn load_from_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "attendees = 3").unwrap();
        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(err.contains("config.toml"));

        let err = ClientConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.contains("failed to read"));
    }

    #[test]
    fn cli_flags_override_file() {
        let args = ScheduleArgs {
            calendar_id: Some("other".to_string()),
            strict_sunday: true,
            delay_ms: Some(0),
            ledger: Some(PathBuf::from("run.json")),
            token_path: Some(PathBuf::from("token.json")),
            ..Default::default()
        };
        let config = ClientConfig::default().with_overrides(&args);
        assert_eq!(config.google.calendar_id, "other");
        assert_eq!(config.google.token_path, Some(PathBuf::from("token.json")));
        assert_eq!(config.convention(), SundayConvention::Strict);
        assert_eq!(config.run.delay_ms, 0);
        assert_eq!(config.run.ledger_path, Some(PathBuf::from("run.json")));
        assert_eq!(config.google.credentials_file, PathBuf::from("credentials.json"));
    }

    #[test]
    fn attendees_skip_unset_variables() {
        unsafe {
            std::env::set_var("_MN_TEST_ATTENDEE_SET", "friend@example.com");
        }
        let config = ClientConfig {
            attendees: vec![
                "env::_MN_TEST_ATTENDEE_UNSET".to_string(),
                "env::_MN_TEST_ATTENDEE_SET".to_string(),
                "plain@example.com".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(
            config.resolve_attendees().unwrap(),
            vec!["friend@example.com", "plain@example.com"]
        );
        unsafe {
            std::env::remove_var("_MN_TEST_ATTENDEE_SET");
        }
    }

    #[test]
    fn no_attendees_is_a_configuration_error() {
        let config = ClientConfig {
            attendees: vec!["env::_MN_TEST_NOBODY_1".to_string(), "env::_MN_TEST_NOBODY_2".to_string()],
            ..Default::default()
        };
        let err = config.resolve_attendees().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("EMAIL_1"));
    }

    #[test]
    fn invalid_timezone() {
        let mut config = ClientConfig::default();
        config.event.timezone = "Mars/Olympus".to_string();
        assert!(config.template().is_err());
    }

    #[test]
    fn provider_config_from_client_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GoogleSettings {
            credentials_file: write_client_file(&dir),
            token_path: Some(dir.path().join("token.json")),
            calendar_id: "movies".to_string(),
        };
        let config = settings.to_provider_config().unwrap();
        assert_eq!(config.credentials.client_id, "movie.apps.googleusercontent.com");
        assert_eq!(config.token_path, dir.path().join("token.json"));
    }

    #[test]
    fn missing_client_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GoogleSettings {
            credentials_file: dir.path().join("nope.json"),
            ..Default::default()
        };
        let err = settings.to_provider_config().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("nope.json"));
    }
}
