//! Month arithmetic and first-Sunday lookup.
//!
//! Two conventions are supported for months whose 1st already falls on a
//! Sunday:
//!
//! - [`SundayConvention::Legacy`] always steps forward at least one day, so
//!   such a month resolves to the 8th (its second Sunday). This is the
//!   default.
//! - [`SundayConvention::Strict`] returns the 1st itself.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// How to resolve a month whose 1st is a Sunday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SundayConvention {
    /// Step forward a full week when the 1st is a Sunday.
    #[default]
    Legacy,
    /// The 1st counts as the first Sunday.
    Strict,
}

impl SundayConvention {
    /// Picks the convention from a `strict` flag.
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Legacy }
    }

    /// Days between the 1st of the month and the chosen Sunday.
    ///
    /// `weekday_of_first` uses Monday = 0 … Sunday = 6.
    fn offset(self, weekday_of_first: u32) -> u64 {
        let naive = 6 - i64::from(weekday_of_first);
        let days = match self {
            Self::Legacy if naive <= 0 => naive + 7,
            Self::Legacy => naive,
            Self::Strict => naive.rem_euclid(7),
        };
        days as u64
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, validating that `month` is within 1..=12.
    pub fn new(year: i32, month: u32) -> ScheduleResult<Self> {
        if (1..=12).contains(&month) && NaiveDate::from_ymd_opt(year, month, 1).is_some() {
            Ok(Self { year, month })
        } else {
            Err(ScheduleError::InvalidMonth { year, month })
        }
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the month `offset` months later, rolling over years.
    pub fn plus_months(self, offset: u32) -> ScheduleResult<Self> {
        let zero_based = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(offset);
        let year = i32::try_from(zero_based.div_euclid(12)).map_err(|_| {
            ScheduleError::InvalidMonth {
                year: self.year,
                month: self.month,
            }
        })?;
        let month = zero_based.rem_euclid(12) as u32 + 1;
        Self::new(year, month)
    }

    /// The 1st day of this month.
    pub fn first_day(&self) -> ScheduleResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(ScheduleError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }

    /// The first Sunday of this month under `convention`.
    pub fn first_sunday(&self, convention: SundayConvention) -> ScheduleResult<NaiveDate> {
        let first = self.first_day()?;
        let offset = convention.offset(first.weekday().num_days_from_monday());
        first
            .checked_add_days(Days::new(offset))
            .ok_or(ScheduleError::InvalidMonth {
                year: self.year,
                month: self.month,
            })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ScheduleError::MonthFormat(s.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| ScheduleError::MonthFormat(s.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| ScheduleError::MonthFormat(s.to_string()))?;
        Self::new(year, month)
    }
}

/// Returns the first Sunday of `year`/`month` using the legacy convention.
///
/// When the 1st is itself a Sunday this yields the 8th.
pub fn first_sunday(year: i32, month: u32) -> ScheduleResult<NaiveDate> {
    first_sunday_with(year, month, SundayConvention::Legacy)
}

/// Returns the first Sunday of `year`/`month` under `convention`.
pub fn first_sunday_with(
    year: i32,
    month: u32,
    convention: SundayConvention,
) -> ScheduleResult<NaiveDate> {
    YearMonth::new(year, month)?.first_sunday(convention)
}

/// Returns the `(year, month)` that is `offset` months after `year`/`month`.
pub fn month_offset(year: i32, month: u32, offset: u32) -> ScheduleResult<(i32, u32)> {
    let target = YearMonth::new(year, month)?.plus_months(offset)?;
    Ok((target.year(), target.month()))
}
