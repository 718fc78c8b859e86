use std::fmt;

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use url::Url;

use crate::course_id::CourseId;

/// Column names of the upload feed, in wire order.
pub const REQUIRED_HEADERS: [&str; 9] = [
	"courseId",
	"courseName",
	"teeTime",
	"holes",
	"pricePerPlayer",
	"availableSlots",
	"bookingUrl",
	"address",
	"timeZone",
];

pub const MIN_HOLES: i32 = 9;
pub const MAX_HOLES: i32 = 18;
pub const MIN_SLOTS: i32 = 1;
pub const MAX_SLOTS: i32 = 4;

/// One upload row after validation, with the course id already canonical.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
	pub course_id: CourseId,
	pub course_name: String,
	pub tee_time: OffsetDateTime,
	pub holes: i32,
	pub price_per_player: f64,
	pub available_slots: i32,
	pub booking_url: String,
	pub address: String,
	pub time_zone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
	/// The record's column count differs from the required header set.
	ColumnCount,
	/// The course id failed canonical coercion.
	InvalidId,
	/// A field failed its type or range check.
	Field { name: &'static str, reason: &'static str },
}

impl fmt::Display for RowError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ColumnCount => f.write_str("Invalid number of columns"),
			Self::InvalidId => f.write_str("Invalid courseId"),
			Self::Field { name, reason } => write!(f, "{name} {reason}"),
		}
	}
}

impl std::error::Error for RowError {}

/// Parses and type-checks one raw row. Pure; deterministic for a given
/// input. Field order follows [`REQUIRED_HEADERS`].
pub fn validate_row(fields: &[&str]) -> Result<ValidatedRow, RowError> {
	if fields.len() != REQUIRED_HEADERS.len() {
		return Err(RowError::ColumnCount);
	}

	let tee_time = OffsetDateTime::parse(fields[2].trim(), &Rfc3339)
		.map_err(|_| RowError::Field { name: "teeTime", reason: "is not a valid timestamp" })?
		.to_offset(UtcOffset::UTC);
	let holes: i32 = fields[3].trim().parse().map_err(|_| RowError::Field {
		name: "holes",
		reason: "must be an integer between 9 and 18",
	})?;

	if !(MIN_HOLES..=MAX_HOLES).contains(&holes) {
		return Err(RowError::Field { name: "holes", reason: "must be an integer between 9 and 18" });
	}

	let price_per_player: f64 = fields[4].trim().parse().map_err(|_| RowError::Field {
		name: "pricePerPlayer",
		reason: "must be a non-negative number",
	})?;

	if !price_per_player.is_finite() || price_per_player < 0.0 {
		return Err(RowError::Field {
			name: "pricePerPlayer",
			reason: "must be a non-negative number",
		});
	}

	let available_slots: i32 = fields[5].trim().parse().map_err(|_| RowError::Field {
		name: "availableSlots",
		reason: "must be an integer between 1 and 4",
	})?;

	if !(MIN_SLOTS..=MAX_SLOTS).contains(&available_slots) {
		return Err(RowError::Field {
			name: "availableSlots",
			reason: "must be an integer between 1 and 4",
		});
	}

	let booking_url = fields[6].trim();

	if Url::parse(booking_url).is_err() {
		return Err(RowError::Field { name: "bookingUrl", reason: "is not a valid URL" });
	}

	let course_id = CourseId::coerce(fields[0]).map_err(|_| RowError::InvalidId)?;

	Ok(ValidatedRow {
		course_id,
		course_name: fields[1].trim().to_string(),
		tee_time,
		holes,
		price_per_player,
		available_slots,
		booking_url: booking_url.to_string(),
		address: fields[7].trim().to_string(),
		time_zone: fields[8].trim().to_string(),
	})
}
