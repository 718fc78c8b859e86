use time::macros::datetime;

use fairway_domain::{CourseId, CursorKey, DedupTracker, RowError, cursor, dedup, validate_row};

fn row(course_id: &'static str, tee_time: &'static str) -> Vec<&'static str> {
	vec![
		course_id,
		"Course",
		tee_time,
		"18",
		"50",
		"4",
		"http://example.com",
		"1 Example Way",
		"America/Denver",
	]
}

#[test]
fn validated_rows_share_one_canonical_id() {
	let first = validate_row(&row("course1", "2024-04-01T10:00:00Z")).expect("valid row");
	let second = validate_row(&row("course1", "2024-04-01T11:00:00Z")).expect("valid row");

	assert_eq!(first.course_id, second.course_id);
}

#[test]
fn dedup_key_matches_repeated_rows_only() {
	let first = validate_row(&row("course1", "2024-04-01T10:00:00Z")).expect("valid row");
	let repeat = validate_row(&row("course1", "2024-04-01T10:00:00Z")).expect("valid row");
	let other = validate_row(&row("course1", "2024-04-01T11:00:00Z")).expect("valid row");
	let mut tracker = DedupTracker::new();
	let key = dedup::slot_key(&first.course_id, first.tee_time);

	tracker.record(key);

	assert!(tracker.seen(&dedup::slot_key(&repeat.course_id, repeat.tee_time)));
	assert!(!tracker.seen(&dedup::slot_key(&other.course_id, other.tee_time)));
}

#[test]
fn offset_timestamps_dedup_against_utc() {
	// The same instant written with a zone offset must collide with its
	// UTC rendering once validated.
	let utc = validate_row(&row("course1", "2024-04-01T10:00:00Z")).expect("valid row");
	let offset = validate_row(&row("course1", "2024-04-01T12:00:00+02:00")).expect("valid row");

	assert_eq!(
		dedup::slot_key(&utc.course_id, utc.tee_time),
		dedup::slot_key(&offset.course_id, offset.tee_time),
	);
}

#[test]
fn cursor_round_trips_validated_rows() {
	let validated = validate_row(&row("course1", "2024-04-01T10:00:00Z")).expect("valid row");
	let key = CursorKey { tee_time: validated.tee_time, course_id: validated.course_id };
	let decoded = cursor::decode(&cursor::encode(&key)).expect("decode");

	assert_eq!(decoded.tee_time, datetime!(2024-04-01 10:00 UTC));
	assert_eq!(decoded.course_id, validated.course_id);
}

#[test]
fn field_errors_render_their_column() {
	let mut fields = row("course1", "2024-04-01T10:00:00Z");

	fields[2] = "yesterday";

	let err = validate_row(&fields).expect_err("invalid timestamp");

	assert_eq!(err.to_string(), "teeTime is not a valid timestamp");

	let mut fields = row("course1", "2024-04-01T10:00:00Z");

	fields[5] = "9";

	let err = validate_row(&fields).expect_err("invalid slots");

	assert_eq!(err.to_string(), "availableSlots must be an integer between 1 and 4");
}

#[test]
fn blank_course_id_is_an_identifier_error() {
	let mut fields = row("course1", "2024-04-01T10:00:00Z");

	fields[0] = "  ";

	assert_eq!(validate_row(&fields), Err(RowError::InvalidId));
	assert!(CourseId::coerce("  ").is_err());
}

#[test]
fn course_id_serde_uses_hex_strings() {
	let id = CourseId::coerce("course1").expect("coerce");
	let json = serde_json::to_string(&id).expect("serialize");

	assert_eq!(json, format!("\"{}\"", id.to_hex()));

	let back: CourseId = serde_json::from_str(&json).expect("deserialize");

	assert_eq!(back, id);
}
