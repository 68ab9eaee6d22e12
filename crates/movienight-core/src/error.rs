//! Errors raised while preparing a schedule.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from date arithmetic, event templating and title loading.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The year/month pair does not name a calendar month.
    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    /// A `YYYY-MM` string could not be parsed.
    #[error("invalid month '{0}', expected YYYY-MM")]
    MonthFormat(String),

    /// The timezone label is not a known IANA zone.
    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),

    /// The titles file could not be read.
    #[error("failed to read titles from {}: {source}", path.display())]
    TitlesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_month_display_pads_month() {
        let err = ScheduleError::InvalidMonth {
            year: 2024,
            month: 13,
        };
        assert_eq!(err.to_string(), "invalid month 2024-13");
    }

    #[test]
    fn titles_file_keeps_source() {
        use std::error::Error;
        let err = ScheduleError::TitlesFile {
            path: PathBuf::from("films.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("films.txt"));
        assert!(err.source().is_some());
    }
}
