//! On-disk timestamps.
//!
//! Timestamps are stored as a 64-bit float counting days (with the time of day
//! as the fractional part) since 1899-12-30 00:00. The raw day count is kept as
//! is, so a decoded timestamp always writes back bit-for-bit.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn epoch() -> NaiveDateTime {
	NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default().and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Day-count timestamp as stored in project files.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Timestamp(f64);

impl Timestamp {
	/// Creates a timestamp from a raw day count
	pub fn from_days(days: f64) -> Self {
		Self(days)
	}

	/// Returns the raw day count
	pub fn days(self) -> f64 {
		self.0
	}

	/// Creates a timestamp from a calendar date and time, with millisecond precision
	pub fn from_datetime(datetime: NaiveDateTime) -> Self {
		let millis = (datetime - epoch()).num_milliseconds();
		Self(millis as f64 / MILLIS_PER_DAY)
	}

	/// Converts the day count to a calendar date and time.
	///
	/// Returns `None` if the value is not finite or out of range.
	pub fn to_datetime(self) -> Option<NaiveDateTime> {
		if !self.0.is_finite() {
			return None;
		}
		let millis = (self.0 * MILLIS_PER_DAY).round();
		if millis.abs() > i64::MAX as f64 {
			return None;
		}
		let delta = TimeDelta::try_milliseconds(millis as i64)?;
		epoch().checked_add_signed(delta)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.to_datetime() {
			Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
			None => write!(f, "<invalid: {}>", self.0),
		}
	}
}
