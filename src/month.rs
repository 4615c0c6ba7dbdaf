//! Month keys used to group expenses by calendar month.
//!
//! A [MonthKey] is always derived from a date (or parsed from a `YYYY-MM`
//! string) and is never stored on its own.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month};

use crate::Error;

/// Identifies a calendar month, e.g. `2024-01`.
///
/// Keys are ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    /// Calendar month number, 1 to 12.
    month: u8,
}

impl MonthKey {
    /// Create a month key from a year and month.
    pub const fn new(year: i32, month: Month) -> Self {
        Self {
            year,
            month: month as u8,
        }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Parse a month key from user input, e.g. a command line argument.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonthKey] if `text` is not a `YYYY-MM` string.
    pub fn parse(text: &str) -> Result<Self, Error> {
        text.parse()
    }

    /// The year of the month.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month immediately before this one, wrapping into the previous year.
    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            month => Self {
                year: self.year,
                month: month - 1,
            },
        }
    }

    /// The month immediately after this one, wrapping into the next year.
    pub fn next(&self) -> Self {
        match self.month {
            12 => Self {
                year: self.year + 1,
                month: 1,
            },
            month => Self {
                year: self.year,
                month: month + 1,
            },
        }
    }

    /// The first day of the month.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonthKey] if the year is outside the range
    /// supported by [time::Date].
    pub fn first_day(&self) -> Result<Date, Error> {
        let month = Month::try_from(self.month)
            .map_err(|_| Error::InvalidMonthKey(self.to_string()))?;

        Date::from_calendar_date(self.year, month, 1)
            .map_err(|_| Error::InvalidMonthKey(self.to_string()))
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        Self::from_date(date) == *self
    }

    /// A label for displaying the month to users, e.g. "2024年1月".
    pub fn label(&self) -> String {
        format!("{}年{}月", self.year, self.month)
    }

    /// The `count` contiguous months ending with (and including) `end`, in
    /// chronological order.
    pub fn window(end: MonthKey, count: usize) -> Vec<MonthKey> {
        let mut months = Vec::with_capacity(count);
        let mut current = end;

        for _ in 0..count {
            months.push(current);
            current = current.previous();
        }

        months.reverse();
        months
    }

    /// All months from `start` to `end` inclusive, in chronological order.
    ///
    /// Returns an empty vector if `start` comes after `end`.
    pub fn range(start: MonthKey, end: MonthKey) -> Vec<MonthKey> {
        let mut months = Vec::new();
        let mut current = start;

        while current <= end {
            months.push(current);
            current = current.next();
        }

        months
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    /// Parse a `YYYY-MM` string. Longer ISO dates such as `2024-01-15` are
    /// accepted and only their year and month are used.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonthKey(text.to_owned());

        let prefix = text.get(..7).ok_or_else(invalid)?;
        let (year, month) = prefix.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
