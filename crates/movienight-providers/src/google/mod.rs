//! Google Calendar provider.
//!
//! # Authentication
//!
//! OAuth 2.0 with PKCE and a loopback redirect:
//!
//! 1. The user creates OAuth credentials in Google Cloud Console and saves
//!    the JSON as `credentials.json`
//! 2. On first run a browser opens for consent
//! 3. The returned tokens are stored locally and refreshed when they expire
//!
//! # Example
//!
//! ```ignore
//! use movienight_providers::google::{Authenticator, GoogleConfig, OAuthClient, OAuthCredentials};
//!
//! let credentials = OAuthCredentials::from_file("credentials.json")?;
//! let config = GoogleConfig::new(credentials);
//! let oauth = OAuthClient::new(&config)?;
//! let session = Authenticator::new(&config, oauth).obtain_session().await?;
//! let client = session.calendar_client()?;
//! ```

mod client;
mod config;
mod oauth;
mod session;
mod tokens;

pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, OAuthCredentials};
pub use oauth::{OAuthClient, PkceFlow};
pub use session::{Authenticator, Session};
pub use tokens::{TokenInfo, TokenStorage};
