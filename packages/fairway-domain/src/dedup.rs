use std::collections::HashSet;

use time::OffsetDateTime;

use crate::{course_id::CourseId, cursor};

/// Per-run duplicate tracker for `(course, tee time)` pairs.
///
/// Scoped to a single ingestion run and consumed by ownership; rows must be
/// checked in arrival order so the first occurrence wins.
#[derive(Debug, Default)]
pub struct DedupTracker {
	seen: HashSet<String>,
}

impl DedupTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn seen(&self, key: &str) -> bool {
		self.seen.contains(key)
	}

	pub fn record(&mut self, key: String) {
		self.seen.insert(key);
	}
}

/// Dedup key shared by the ingestion run and the search collapse step.
pub fn slot_key(course_id: &CourseId, tee_time: OffsetDateTime) -> String {
	format!("{course_id}|{}", cursor::format_timestamp(tee_time))
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn first_occurrence_wins() {
		let id = CourseId::coerce("course1").expect("coerce");
		let key = slot_key(&id, datetime!(2024-04-01 10:00 UTC));
		let mut tracker = DedupTracker::new();

		assert!(!tracker.seen(&key));

		tracker.record(key.clone());

		assert!(tracker.seen(&key));
	}

	#[test]
	fn key_distinguishes_course_and_time() {
		let a = CourseId::coerce("course1").expect("coerce");
		let b = CourseId::coerce("course2").expect("coerce");
		let ts = datetime!(2024-04-01 10:00 UTC);

		assert_ne!(slot_key(&a, ts), slot_key(&b, ts));
		assert_ne!(slot_key(&a, ts), slot_key(&a, datetime!(2024-04-01 10:10 UTC)));
	}
}
