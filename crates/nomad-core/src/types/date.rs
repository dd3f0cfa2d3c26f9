use std::fmt::{self, Debug, Display};
use time::{
    Date as TimeDate, Month, format_description::BorrowedFormatItem, macros::format_description,
};

/// Canonical wire form, e.g. `03 Feb 2001`.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day] [month repr:short] [year]");

const ISO_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

///
/// Date
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Date(TimeDate);

impl Date {
    #[must_use]
    pub fn new_checked(y: i32, m: u8, d: u8) -> Option<Self> {
        let month = Month::try_from(m).ok()?;
        let date = TimeDate::from_calendar_date(y, month, d).ok()?;

        Some(Self(date))
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1–12)
    #[must_use]
    pub fn month(self) -> u8 {
        self.0.month().into()
    }

    #[must_use]
    pub const fn day(self) -> u8 {
        self.0.day()
    }

    #[must_use]
    pub const fn get(self) -> TimeDate {
        self.0
    }

    /// Parse the canonical `03 Feb 2001` form, falling back to ISO `2001-02-03`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        TimeDate::parse(s, DATE_FORMAT)
            .or_else(|_| TimeDate::parse(s, ISO_FORMAT))
            .ok()
            .map(Self)
    }
}

impl Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({self})")
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.format(DATE_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<TimeDate> for Date {
    fn from(date: TimeDate) -> Self {
        Self(date)
    }
}

///
/// TESTS
///
