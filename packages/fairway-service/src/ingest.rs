use csv::ReaderBuilder;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use fairway_domain::{DedupTracker, REQUIRED_HEADERS, ValidatedRow, dedup, validate_row};
use fairway_storage::{
	models::{Course, RowIssue, TeeTime, UploadBatch},
	store::{BatchStore as _, CourseStore as _, TeeTimeStore as _},
};

use crate::{Error, Result, TeeService};

/// Batch report echoed back to the uploader in wire format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
	pub id: Uuid,
	pub imported_count: u32,
	pub skipped_count: u32,
	pub validation_errors: Vec<RowIssue>,
}

impl TeeService {
	/// Runs one ingestion pass over an uploaded CSV payload.
	///
	/// Row-level failures are recorded in the report and skipped; only an
	/// unreadable stream, a bad header row, or a failed batch persist abort
	/// the run.
	pub async fn ingest_csv(&self, uploaded_by: &str, bytes: &[u8]) -> Result<IngestReport> {
		let mut reader =
			ReaderBuilder::new().has_headers(false).flexible(true).from_reader(bytes);
		let mut records = reader.records();
		let header = records
			.next()
			.ok_or_else(|| Error::Csv { message: "CSV input is empty.".into() })?
			.map_err(|err| Error::Csv { message: err.to_string() })?;

		if header.len() != REQUIRED_HEADERS.len()
			|| header.iter().zip(REQUIRED_HEADERS).any(|(got, want)| got.trim() != want)
		{
			return Err(Error::Csv {
				message: "CSV header row does not match the required columns.".into(),
			});
		}

		let mut imported = 0_u32;
		let mut skipped = 0_u32;
		let mut issues = Vec::new();
		let mut tracker = DedupTracker::new();

		for record in records {
			// Truly empty lines never reach us; the reader drops them. A row
			// of blank columns still goes through validation like any other.
			let record = record.map_err(|err| Error::Csv { message: err.to_string() })?;
			let fields = record.iter().collect::<Vec<_>>();
			let row = match validate_row(&fields) {
				Ok(row) => row,
				Err(err) => {
					skipped += 1;
					issues.push(RowIssue { row: imported + skipped, message: err.to_string() });

					continue;
				},
			};
			let key = dedup::slot_key(&row.course_id, row.tee_time);

			if tracker.seen(&key) {
				skipped += 1;
				issues.push(RowIssue {
					row: imported + skipped,
					message: "Duplicate tee time".into(),
				});

				continue;
			}

			tracker.record(key);

			match self.persist_row(&row).await {
				Ok(()) => imported += 1,
				Err(err) => {
					skipped += 1;
					issues.push(RowIssue { row: imported + skipped, message: err.to_string() });
				},
			}
		}

		let batch = UploadBatch {
			batch_id: Uuid::new_v4(),
			uploaded_by: uploaded_by.to_string(),
			imported_count: imported,
			skipped_count: skipped,
			validation_errors: issues.clone(),
			created_at: OffsetDateTime::now_utc(),
		};

		self.stores.batches.insert_batch(&batch).await?;

		tracing::info!(
			batch_id = %batch.batch_id,
			imported,
			skipped,
			"Ingestion run finished.",
		);

		Ok(IngestReport {
			id: batch.batch_id,
			imported_count: imported,
			skipped_count: skipped,
			validation_errors: issues,
		})
	}

	/// Course first, then the slot. The course upsert stands even when the
	/// slot write fails afterwards.
	async fn persist_row(&self, row: &ValidatedRow) -> Result<()> {
		let course = Course {
			course_id: row.course_id,
			name: row.course_name.clone(),
			booking_url: row.booking_url.clone(),
			address: row.address.clone(),
			holes: row.holes,
			time_zone: row.time_zone.clone(),
		};

		self.stores.courses.upsert_course(&course).await?;

		let slot = TeeTime {
			course_id: row.course_id,
			tee_time: row.tee_time,
			holes: row.holes,
			price_per_player: row.price_per_player,
			available_slots: row.available_slots,
		};

		match self.stores.tee_times.find_slot(row.course_id, row.tee_time).await? {
			Some(_) => self.stores.tee_times.update_slot(&slot).await?,
			None => self.stores.tee_times.insert_slot(&slot).await?,
		}

		Ok(())
	}
}
