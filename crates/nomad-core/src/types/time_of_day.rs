use crate::types::DateTime;
use std::fmt::{self, Debug, Display};
use time::{
    Date as TimeDate, Month, PrimitiveDateTime, Time, UtcOffset,
    format_description::BorrowedFormatItem, macros::format_description,
};

const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

///
/// TimeOfDay
///
/// Wall-clock time in whole seconds. On the wire it travels as a full
/// date-time anchored on 01 Jan 2000.
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct TimeOfDay(Time);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(Time::MIDNIGHT);

    #[must_use]
    pub fn from_hms(hour: u8, minute: u8, second: u8) -> Option<Self> {
        Time::from_hms(hour, minute, second).ok().map(Self)
    }

    #[must_use]
    pub const fn hour(self) -> u8 {
        self.0.hour()
    }

    #[must_use]
    pub const fn minute(self) -> u8 {
        self.0.minute()
    }

    #[must_use]
    pub const fn second(self) -> u8 {
        self.0.second()
    }

    #[must_use]
    pub const fn get(self) -> Time {
        self.0
    }

    /// Parse a bare `HH:MM:SS` clock reading.
    #[must_use]
    pub fn parse_clock(s: &str) -> Option<Self> {
        Time::parse(s.trim(), CLOCK_FORMAT).ok().map(Self)
    }

    /// Wall-clock reading of `dt` in `offset`.
    #[must_use]
    pub fn from_datetime(dt: DateTime, offset: UtcOffset) -> Self {
        Self::from(dt.to_offset(offset).get().time())
    }

    /// Place this reading on the anchor date in `offset`.
    #[must_use]
    pub fn anchored(self, offset: UtcOffset) -> DateTime {
        let anchor = TimeDate::from_calendar_date(2000, Month::January, 1)
            .unwrap_or(TimeDate::MIN);

        PrimitiveDateTime::new(anchor, self.0)
            .assume_offset(offset)
            .into()
    }
}

impl Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({self})")
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

impl From<Time> for TimeOfDay {
    fn from(time: Time) -> Self {
        Self(time.replace_nanosecond(0).unwrap_or(time))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_reading_uses_fixed_date() {
        let t = TimeOfDay::from_hms(1, 23, 34).unwrap();
        assert_eq!(
            t.anchored(UtcOffset::UTC).to_string(),
            "01 Jan 2000 01:23:34 +0000"
        );
    }

    #[test]
    fn datetime_reading_follows_offset() {
        let t = TimeOfDay::from_hms(23, 0, 0).unwrap();
        let plus_two = UtcOffset::from_hms(2, 0, 0).unwrap();
        let dt = t.anchored(UtcOffset::UTC);

        assert_eq!(
            TimeOfDay::from_datetime(dt, plus_two),
            TimeOfDay::from_hms(1, 0, 0).unwrap()
        );
    }

    #[test]
    fn clock_parse_round_trips() {
        let t = TimeOfDay::from_hms(9, 5, 7).unwrap();
        assert_eq!(t.to_string(), "09:05:07");
        assert_eq!(TimeOfDay::parse_clock("09:05:07"), Some(t));
        assert!(TimeOfDay::parse_clock("25:00:00").is_none());
    }
}
