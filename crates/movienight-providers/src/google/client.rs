//! Google Calendar API client.
//!
//! Only event creation is needed: `POST /calendars/{id}/events`.

use std::time::Duration;

use movienight_core::EventRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, CreatedEvent};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

const PROVIDER_NAME: &str = "google";

/// Google Calendar API client bound to one access token.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(
        access_token: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
        })
    }

    /// Creates `event` on `calendar_id`, emailing every attendee.
    pub async fn create_event(
        &self,
        calendar_id: &str,
        event: &EventRecord,
    ) -> ProviderResult<CreatedEvent> {
        let url = format!(
            "{}/calendars/{}/events",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id)
        );
        let body = ApiEventInsert::from(event);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("sendUpdates", "all")])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout")
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
                .with_provider(PROVIDER_NAME)
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e))
                .with_provider(PROVIDER_NAME)
        })?;

        if !status.is_success() {
            return Err(error_for_status(status, retry_after, &body).with_provider(PROVIDER_NAME));
        }

        let created = parse_created_event(&body)?;
        debug!(
            "created event {} on calendar {}: {}",
            created.id, calendar_id, event.summary
        );
        Ok(created)
    }
}

impl CalendarProvider for GoogleCalendarClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a EventRecord,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(self.create_event(calendar_id, event))
    }
}

/// Maps a non-success response to a provider error.
fn error_for_status(
    status: reqwest::StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> ProviderError {
    let reason = api_error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        reqwest::StatusCode::UNAUTHORIZED => {
            ProviderError::authentication("access token expired or invalid")
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )),
        // Google reports quota exhaustion as 403 with a rate-limit reason.
        reqwest::StatusCode::FORBIDDEN if is_quota_error(body) => {
            ProviderError::rate_limited(format!("quota exceeded: {}", reason))
        }
        reqwest::StatusCode::FORBIDDEN => {
            ProviderError::authorization(format!("access denied to calendar: {}", reason))
        }
        reqwest::StatusCode::NOT_FOUND => {
            ProviderError::bad_request(format!("calendar not found: {}", reason))
        }
        s if s.is_client_error() => {
            ProviderError::bad_request(format!("event rejected ({}): {}", s, reason))
        }
        s => ProviderError::server(format!("API error ({}): {}", s, reason)),
    }
}

fn is_quota_error(body: &str) -> bool {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|r| {
            r.error.errors.iter().any(|e| {
                matches!(
                    e.reason.as_deref(),
                    Some("rateLimitExceeded" | "userRateLimitExceeded" | "quotaExceeded")
                )
            })
        })
        .unwrap_or(false)
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|r| r.error.message)
}

fn parse_created_event(body: &str) -> ProviderResult<CreatedEvent> {
    let created: ApiEventCreated = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e))
            .with_provider(PROVIDER_NAME)
    })?;
    Ok(CreatedEvent::new(created.id, created.html_link))
}

/// Request body for events.insert.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventInsert<'a> {
    summary: &'a str,
    description: &'a str,
    start: ApiEventTime<'a>,
    end: ApiEventTime<'a>,
    attendees: Vec<ApiAttendee<'a>>,
    reminders: ApiReminders,
    guests_can_invite_others: bool,
    guests_can_see_other_guests: bool,
}

impl<'a> From<&'a EventRecord> for ApiEventInsert<'a> {
    fn from(event: &'a EventRecord) -> Self {
        Self {
            summary: &event.summary,
            description: &event.description,
            start: ApiEventTime {
                date_time: event.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                time_zone: &event.timezone,
            },
            end: ApiEventTime {
                date_time: event.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                time_zone: &event.timezone,
            },
            attendees: event
                .attendees
                .iter()
                .map(|email| ApiAttendee { email })
                .collect(),
            reminders: ApiReminders {
                use_default: event.reminders.use_default,
                overrides: event
                    .reminders
                    .overrides
                    .iter()
                    .map(|r| ApiReminderOverride {
                        method: r.method.as_str(),
                        minutes: r.minutes,
                    })
                    .collect(),
            },
            guests_can_invite_others: event.guests_can_invite_others,
            guests_can_see_other_guests: event.guests_can_see_other_guests,
        }
    }
}

/// Wall-clock time plus IANA zone; Google resolves the offset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiAttendee<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiReminders {
    use_default: bool,
    overrides: Vec<ApiReminderOverride>,
}

#[derive(Debug, Serialize)]
struct ApiReminderOverride {
    method: &'static str,
    minutes: u32,
}

/// The parts of the created event we keep.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventCreated {
    id: String,
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::NaiveDate;
    use movienight_core::build_event;
    use serde_json::json;

    fn sample_event() -> EventRecord {
        build_event(
            "Mad Max: Fury Road",
            NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(),
            11,
            &["a@example.com".to_string(), "b@example.com".to_string()],
        )
    }

    #[test]
    fn insert_body_matches_calendar_api_shape() {
        let event = sample_event();
        let body = serde_json::to_value(ApiEventInsert::from(&event)).unwrap();

        assert_eq!(
            body,
            json!({
                "summary": "Movie Night #11: Mad Max: Fury Road",
                "description": event.description,
                "start": {"dateTime": "2024-11-03T19:00:00", "timeZone": "America/New_York"},
                "end": {"dateTime": "2024-11-03T22:00:00", "timeZone": "America/New_York"},
                "attendees": [{"email": "a@example.com"}, {"email": "b@example.com"}],
                "reminders": {
                    "useDefault": false,
                    "overrides": [
                        {"method": "email", "minutes": 1440},
                        {"method": "popup", "minutes": 60}
                    ]
                },
                "guestsCanInviteOthers": true,
                "guestsCanSeeOtherGuests": true
            })
        );
    }

    #[test]
    fn parse_created_event_response() {
        let body = r#"{
            "kind": "calendar#event",
            "id": "abc123",
            "status": "confirmed",
            "htmlLink": "https://www.google.com/calendar/event?eid=abc123",
            "summary": "Movie Night #1: Parasite"
        }"#;
        let created = parse_created_event(body).unwrap();
        assert_eq!(created.id, "abc123");
        assert_eq!(
            created.html_link.as_deref(),
            Some("https://www.google.com/calendar/event?eid=abc123")
        );
    }

    #[test]
    fn parse_created_event_garbage() {
        let err = parse_created_event("<html>").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert_eq!(err.provider(), Some("google"));
    }

    #[test]
    fn status_mapping() {
        use reqwest::StatusCode;

        let err = error_for_status(StatusCode::UNAUTHORIZED, None, "");
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);

        let err = error_for_status(StatusCode::TOO_MANY_REQUESTS, Some(30), "");
        assert_eq!(err.code(), ProviderErrorCode::RateLimited);
        assert!(err.message().contains("30 seconds"));

        let err = error_for_status(StatusCode::BAD_REQUEST, None, r#"{"error": {"message": "Invalid attendee email."}}"#);
        assert_eq!(err.code(), ProviderErrorCode::BadRequest);
        assert!(err.message().contains("Invalid attendee email."));

        let err = error_for_status(StatusCode::SERVICE_UNAVAILABLE, None, "backend down");
        assert_eq!(err.code(), ProviderErrorCode::ServerError);
        assert!(err.is_transient());
    }

    #[test]
    fn forbidden_quota_is_rate_limited() {
        use reqwest::StatusCode;

        let quota = r#"{"error": {"code": 403, "message": "Rate Limit Exceeded",
            "errors": [{"domain": "usageLimits", "reason": "rateLimitExceeded"}]}}"#;
        let err = error_for_status(StatusCode::FORBIDDEN, None, quota);
        assert_eq!(err.code(), ProviderErrorCode::RateLimited);

        let denied = r#"{"error": {"code": 403, "message": "Forbidden",
            "errors": [{"domain": "global", "reason": "forbidden"}]}}"#;
        let err = error_for_status(StatusCode::FORBIDDEN, None, denied);
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
    }
}
