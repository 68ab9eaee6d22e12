//! Core types: title list, first-Sunday scheduling, event records, tracing

pub mod error;
pub mod event;
pub mod schedule;
pub mod titles;
pub mod tracing;

pub use error::{ScheduleError, ScheduleResult};
pub use event::{
    build_event, EventRecord, EventTemplate, Reminder, ReminderMethod, ReminderPolicy,
    DEFAULT_TIMEZONE,
};
pub use schedule::{first_sunday, first_sunday_with, month_offset, SundayConvention, YearMonth};
pub use titles::{TitleList, DEFAULT_TITLES, MAX_TITLES};
pub use tracing::{init_tracing, TracingConfig, TracingError};
