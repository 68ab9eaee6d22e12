//! Calendar provider abstractions and the Google Calendar implementation.
//!
//! - [`CalendarProvider`] - submits built events to a calendar
//! - [`CredentialProvider`] - obtains and refreshes OAuth credentials
//! - [`google::Authenticator`] - turns a stored credential into a [`google::Session`]
//! - [`ProviderError`] - error type shared by all of the above
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  authorize/refresh  ┌────────────────────┐
//! │ Authenticator│ ──────────────────▶ │ CredentialProvider │
//! └──────┬───────┘                     └────────────────────┘
//!        │ Session
//!        ▼
//! ┌─────────────────────┐  insert_event  ┌──────────────┐
//! │ GoogleCalendarClient│ ─────────────▶ │  Google API  │
//! └─────────────────────┘                └──────────────┘
//! ```

pub mod error;
pub mod google;
pub mod provider;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::{
    BoxFuture, CalendarProvider, CreatedEvent, CredentialProvider, RefreshedToken,
    StaticCredentialProvider,
};
