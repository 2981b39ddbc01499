use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::core::error::ParseError;

/// Calendar year-month, the billing cycle key.
///
/// Internally the first day of the month.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, SerializeDisplay, DeserializeFromStr)]
#[must_use]
pub struct Period(NaiveDate);

impl Period {
    /// `None` for months chrono cannot represent together with the following month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).and_then(Self::from_first_day)
    }

    fn from_first_day(first_day: NaiveDate) -> Option<Self> {
        first_day.checked_add_months(Months::new(1)).map(|_| Self(first_day))
    }

    /// The period that contains the timestamp.
    pub fn containing(at: NaiveDateTime) -> Option<Self> {
        Self::new(at.year(), at.month())
    }

    /// Midnight of the first day.
    #[must_use]
    pub const fn first_instant(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// The last whole second of the last day.
    #[must_use]
    pub fn last_instant(self) -> NaiveDateTime {
        // The following month is checked on construction.
        (self.0 + Months::new(1)).and_time(NaiveTime::MIN) - TimeDelta::seconds(1)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .ok()
            .and_then(Self::from_first_day)
            .ok_or_else(|| ParseError::Period(s.to_owned()))
    }
}
