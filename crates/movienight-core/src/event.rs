//! Event records for movie nights.
//!
//! This module provides:
//! - [`EventRecord`]: an immutable, provider-agnostic event ready for submission
//! - [`EventTemplate`]: the fixed parts of every event (timezone, time window)
//! - [`ReminderPolicy`]: the reminders attached to each event
//! - [`build_event`]: builds a record with the default template

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::titles::MAX_TITLES;

/// Timezone label attached to events unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderMethod {
    Email,
    Popup,
}

impl ReminderMethod {
    /// Returns the wire name used by calendar APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Popup => "popup",
        }
    }
}

/// A single reminder, fired `minutes` before the event starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: ReminderMethod,
    pub minutes: u32,
}

/// Reminders attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    /// Whether the calendar's default reminders also apply.
    pub use_default: bool,
    /// Explicit reminders.
    pub overrides: Vec<Reminder>,
}

impl Default for ReminderPolicy {
    /// An email one day ahead and a popup one hour ahead; calendar defaults off.
    fn default() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                Reminder {
                    method: ReminderMethod::Email,
                    minutes: 24 * 60,
                },
                Reminder {
                    method: ReminderMethod::Popup,
                    minutes: 60,
                },
            ],
        }
    }
}

/// A fully built movie night event.
///
/// Start and end are wall-clock times in [`EventRecord::timezone`]; the
/// calendar provider resolves them to instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    /// 1-based position of the title in the processing order.
    pub rank: u32,
    pub date: NaiveDate,
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA timezone name, e.g. `America/New_York`.
    pub timezone: String,
    pub attendees: Vec<String>,
    pub reminders: ReminderPolicy,
    pub guests_can_invite_others: bool,
    pub guests_can_see_other_guests: bool,
}

impl EventRecord {
    /// Length of the event.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// The fixed parts shared by every event of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTemplate {
    timezone: Tz,
    start_time: NaiveTime,
    duration: Duration,
    reminders: ReminderPolicy,
}

impl EventTemplate {
    /// Default start time: 19:00.
    pub const START_HOUR: u32 = 19;

    /// Default length: 3 hours (19:00 to 22:00).
    pub const DURATION_HOURS: i64 = 3;

    /// Creates the default template in the given IANA timezone.
    pub fn new(timezone: &str) -> ScheduleResult<Self> {
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| ScheduleError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self {
            timezone,
            ..Self::default()
        })
    }

    /// Returns the timezone name.
    pub fn timezone(&self) -> &'static str {
        self.timezone.name()
    }

    /// Builds the event for `title` on `date`.
    pub fn build(
        &self,
        title: &str,
        date: NaiveDate,
        rank: u32,
        attendees: &[String],
    ) -> EventRecord {
        let start = date.and_time(self.start_time);
        EventRecord {
            title: title.to_string(),
            rank,
            date,
            summary: summary(title, rank),
            description: description(title, rank),
            start,
            end: start + self.duration,
            timezone: self.timezone.name().to_string(),
            attendees: attendees.to_vec(),
            reminders: self.reminders.clone(),
            guests_can_invite_others: true,
            guests_can_see_other_guests: true,
        }
    }
}

impl Default for EventTemplate {
    fn default() -> Self {
        Self {
            timezone: Tz::America__New_York,
            start_time: NaiveTime::from_hms_opt(Self::START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            duration: Duration::hours(Self::DURATION_HOURS),
            reminders: ReminderPolicy::default(),
        }
    }
}

/// Builds the event for `title` on `date` with the default template.
pub fn build_event(title: &str, date: NaiveDate, rank: u32, attendees: &[String]) -> EventRecord {
    EventTemplate::default().build(title, date, rank, attendees)
}

fn summary(title: &str, rank: u32) -> String {
    format!("Movie Night #{}: {}", rank, title)
}

fn description(title: &str, rank: u32) -> String {
    format!(
        "Monthly movie night featuring \"{}\" from the New York Times Top 100 Films \
         of the 21st Century list.\n\nRank: #{}/{}",
        title, rank, MAX_TITLES
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn attendees() -> Vec<String> {
        vec!["a@example.com".to_string(), "b@example.com".to_string()]
    }

    #[test]
    fn summary_and_description() {
        let event = build_event("Parasite", date(2024, 1, 7), 1, &attendees());
        assert_eq!(event.summary, "Movie Night #1: Parasite");
        assert_eq!(
            event.description,
            "Monthly movie night featuring \"Parasite\" from the New York Times Top 100 Films \
             of the 21st Century list.\n\nRank: #1/100"
        );
    }

    #[test]
    fn time_window_is_seven_to_ten() {
        let event = build_event("Her", date(2024, 2, 4), 24, &attendees());
        assert_eq!(event.start, date(2024, 2, 4).and_hms_opt(19, 0, 0).unwrap());
        assert_eq!(event.end, date(2024, 2, 4).and_hms_opt(22, 0, 0).unwrap());
        assert_eq!(event.duration(), Duration::hours(3));
        assert_eq!(event.start.hour(), 19);
        assert_eq!(event.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn build_is_deterministic() {
        let a = build_event("Zodiac", date(2025, 3, 2), 19, &attendees());
        let b = build_event("Zodiac", date(2025, 3, 2), 19, &attendees());
        assert_eq!(a, b);
    }

    #[test]
    fn attendees_are_copied_verbatim() {
        let list = vec!["Z@Example.com".to_string(), "z@example.com".to_string()];
        let event = build_event("Boyhood", date(2025, 1, 5), 23, &list);
        assert_eq!(event.attendees, list);
    }

    #[test]
    fn reminders_and_guest_permissions() {
        let event = build_event("Moonlight", date(2024, 5, 5), 5, &attendees());
        assert!(!event.reminders.use_default);
        assert_eq!(
            event.reminders.overrides,
            vec![
                Reminder {
                    method: ReminderMethod::Email,
                    minutes: 1440
                },
                Reminder {
                    method: ReminderMethod::Popup,
                    minutes: 60
                },
            ]
        );
        assert!(event.guests_can_invite_others);
        assert!(event.guests_can_see_other_guests);
    }

    #[test]
    fn titles_are_not_sanitized() {
        let title = "Y Tu Mamá También \"uncut\"";
        let event = build_event(title, date(2024, 8, 4), 18, &attendees());
        assert_eq!(event.summary, format!("Movie Night #18: {}", title));
    }

    #[test]
    fn template_with_custom_timezone() {
        let template = EventTemplate::new("Europe/Paris").unwrap();
        assert_eq!(template.timezone(), "Europe/Paris");
        let event = template.build("Amélie", date(2024, 3, 3), 3, &attendees());
        assert_eq!(event.timezone, "Europe/Paris");
        assert_eq!(event.start.hour(), 19);
    }

    #[test]
    fn template_rejects_unknown_timezone() {
        let err = EventTemplate::new("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTimezone(_)));
    }
}
