use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use fairway_domain::CourseId;

/// Course record, keyed by the canonical id. Ingestion upserts these
/// last-write-wins; nothing deletes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
	pub course_id: CourseId,
	pub name: String,
	pub booking_url: String,
	pub address: String,
	pub holes: i32,
	pub time_zone: String,
}

/// One bookable slot. `(course_id, tee_time)` is unique; holes, price, and
/// slots are the mutable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TeeTime {
	pub course_id: CourseId,
	pub tee_time: OffsetDateTime,
	pub holes: i32,
	pub price_per_player: f64,
	pub available_slots: i32,
}

/// One entry of a batch's validation audit trail. Row numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
	pub row: u32,
	pub message: String,
}

/// Audit result of one ingestion run, persisted once after the run.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadBatch {
	pub batch_id: Uuid,
	pub uploaded_by: String,
	pub imported_count: u32,
	pub skipped_count: u32,
	pub validation_errors: Vec<RowIssue>,
	pub created_at: OffsetDateTime,
}

/// A user-defined alert filter; all fields conjunctive, absent means
/// unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPref {
	pub pref_id: Uuid,
	pub user_id: String,
	pub course_id: Option<CourseId>,
	pub max_price: Option<f64>,
	pub min_slots: Option<i32>,
	pub start_time: Option<OffsetDateTime>,
	pub end_time: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceToken {
	pub user_id: String,
	pub token: String,
}
