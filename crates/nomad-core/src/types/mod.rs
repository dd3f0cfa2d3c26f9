//! Scalar value types carried by [`Value`](crate::value::Value).

mod date;
mod datetime;
mod decimal;
mod time_of_day;

pub use date::Date;
pub use datetime::DateTime;
pub use decimal::Decimal;
pub use time_of_day::TimeOfDay;
