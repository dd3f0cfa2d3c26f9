use crate::types::Date;
use std::fmt::{self, Debug, Display};
use time::{
    OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::{
        BorrowedFormatItem,
        well_known::{Rfc2822, Rfc3339},
    },
    macros::format_description,
};

/// Canonical wire form, e.g. `03 Feb 2001 12:34:56 +0000`.
///
/// This is RFC 2822 with the optional day-of-week dropped.
const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[day] [month repr:short] [year] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
);

///
/// DateTime
///
/// An instant with a UTC offset, truncated to whole seconds.
/// Equality compares instants, so the same moment in two offsets is equal.
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct DateTime(OffsetDateTime);

impl DateTime {
    pub const UNIX_EPOCH: Self = Self(OffsetDateTime::UNIX_EPOCH);

    #[must_use]
    pub fn new(dt: OffsetDateTime) -> Self {
        Self(dt.replace_nanosecond(0).unwrap_or(dt))
    }

    #[must_use]
    pub fn from_unix_timestamp(secs: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp(secs).ok().map(Self)
    }

    /// Build a UTC date-time from calendar parts.
    #[must_use]
    pub fn from_parts(date: Date, hour: u8, minute: u8, second: u8) -> Option<Self> {
        let time = Time::from_hms(hour, minute, second).ok()?;

        Some(Self(PrimitiveDateTime::new(date.get(), time).assume_utc()))
    }

    /// Start of `date` in `offset`.
    #[must_use]
    pub const fn midnight(date: Date, offset: UtcOffset) -> Self {
        Self(PrimitiveDateTime::new(date.get(), Time::MIDNIGHT).assume_offset(offset))
    }

    #[must_use]
    pub const fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    #[must_use]
    pub const fn offset(self) -> UtcOffset {
        self.0.offset()
    }

    #[must_use]
    pub const fn get(self) -> OffsetDateTime {
        self.0
    }

    /// Same instant expressed in `offset`; unchanged if that would leave
    /// the representable date range.
    #[must_use]
    pub fn to_offset(self, offset: UtcOffset) -> Self {
        self.0.checked_to_offset(offset).map_or(self, Self)
    }

    /// Calendar date in the date-time's own offset.
    #[must_use]
    pub fn date(self) -> Date {
        self.0.date().into()
    }

    /// Parse the canonical form, falling back to full RFC 2822 and RFC 3339.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        OffsetDateTime::parse(s, DATETIME_FORMAT)
            .or_else(|_| OffsetDateTime::parse(s, &Rfc2822))
            .or_else(|_| OffsetDateTime::parse(s, &Rfc3339))
            .ok()
            .map(Self::new)
    }
}

impl Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTime({self})")
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.format(DATETIME_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(dt: OffsetDateTime) -> Self {
        Self::new(dt)
    }
}

///
/// TESTS
///
