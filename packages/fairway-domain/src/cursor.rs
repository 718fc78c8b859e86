use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::course_id::CourseId;

const DELIMITER: char = '|';

/// The composite sort key of the last row on a page: pagination resumes
/// strictly after `(tee_time, course_id)` in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorKey {
	pub tee_time: OffsetDateTime,
	pub course_id: CourseId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
	/// Not base64, or the payload is not UTF-8.
	Encoding,
	/// The payload does not contain exactly one delimiter with both sides
	/// non-empty.
	Delimiter,
	/// The timestamp component does not parse.
	Timestamp,
	/// The course id component is not a canonical id.
	CourseId,
}

impl fmt::Display for CursorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Encoding => f.write_str("Cursor is not valid base64."),
			Self::Delimiter => f.write_str("Cursor payload is malformed."),
			Self::Timestamp => f.write_str("Cursor timestamp does not parse."),
			Self::CourseId => f.write_str("Cursor course id does not parse."),
		}
	}
}

impl std::error::Error for CursorError {}

pub fn encode(key: &CursorKey) -> String {
	let payload = format!("{}{DELIMITER}{}", format_timestamp(key.tee_time), key.course_id);

	BASE64.encode(payload)
}

/// Decodes an opaque page token. The key is never checked against live data;
/// a cursor pointing at rows that no longer exist simply yields an empty
/// page downstream.
pub fn decode(token: &str) -> Result<CursorKey, CursorError> {
	let bytes = BASE64.decode(token.as_bytes()).map_err(|_| CursorError::Encoding)?;
	let payload = String::from_utf8(bytes).map_err(|_| CursorError::Encoding)?;
	let mut parts = payload.split(DELIMITER);
	let (Some(timestamp), Some(course_id), None) = (parts.next(), parts.next(), parts.next())
	else {
		return Err(CursorError::Delimiter);
	};

	if timestamp.is_empty() || course_id.is_empty() {
		return Err(CursorError::Delimiter);
	}

	let tee_time =
		OffsetDateTime::parse(timestamp, &Rfc3339).map_err(|_| CursorError::Timestamp)?;
	let course_id: CourseId = course_id.parse().map_err(|_| CursorError::CourseId)?;

	Ok(CursorKey { tee_time, course_id })
}

/// RFC 3339 rendering used by cursors and dedup keys. The delimiter cannot
/// appear in either component, so the encoding stays reversible.
pub fn format_timestamp(ts: OffsetDateTime) -> String {
	ts.format(&Rfc3339).unwrap_or_default()
}
