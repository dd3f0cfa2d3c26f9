use derive_more::{Display, FromStr};
use rust_decimal::{Decimal as WrappedDecimal, prelude::ToPrimitive};

///
/// Decimal
///
/// Arbitrary-precision base-10 value. Text conversion is exact and keeps
/// the scale it was written with (`123.450` stays `123.450`).
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
pub struct Decimal(WrappedDecimal);

impl Decimal {
    pub const ZERO: Self = Self(WrappedDecimal::ZERO);

    /// Construct a decimal from mantissa and scale.
    #[must_use]
    pub fn new(num: i64, scale: u32) -> Self {
        Self(WrappedDecimal::new(num, scale))
    }

    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.0.scale()
    }

    #[must_use]
    pub const fn mantissa(&self) -> i128 {
        self.0.mantissa()
    }

    #[must_use]
    pub const fn get(self) -> WrappedDecimal {
        self.0
    }

    /// Lossy conversion from a float; `None` for non-finite input.
    #[must_use]
    pub fn from_f64(n: f64) -> Option<Self> {
        WrappedDecimal::try_from(n).ok().map(Self)
    }

    #[must_use]
    pub fn to_f64(self) -> Option<f64> {
        self.0.to_f64()
    }

    /// Drop the fractional part; `None` if the result does not fit.
    #[must_use]
    pub fn trunc_to_i64(self) -> Option<i64> {
        self.0.trunc().to_i64()
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self(WrappedDecimal::from(n))
    }
}

impl From<WrappedDecimal> for Decimal {
    fn from(d: WrappedDecimal) -> Self {
        Self(d)
    }
}

///
/// TESTS
///
