use sqlx::{Postgres, QueryBuilder, Row, postgres::PgRow};
use time::OffsetDateTime;

use fairway_domain::{CourseId, CursorKey};

use crate::{
	Error, Result,
	db::Db,
	models::{AlertPref, Course, DeviceToken, TeeTime, UploadBatch},
	store::{AlertStore, BatchStore, BoxFuture, CourseStore, TeeTimeFilter, TeeTimeStore},
};

/// Postgres-backed stores over one shared pool.
pub struct PgStores {
	db: Db,
}
impl PgStores {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}

fn parse_course_id(raw: &str) -> Result<CourseId> {
	raw.parse().map_err(|_| Error::InvalidArgument(format!("Malformed course id: {raw}.")))
}

fn course_from_row(row: &PgRow) -> Result<Course> {
	Ok(Course {
		course_id: parse_course_id(row.try_get::<String, _>("course_id")?.as_str())?,
		name: row.try_get("name")?,
		booking_url: row.try_get("booking_url")?,
		address: row.try_get("address")?,
		holes: row.try_get("holes")?,
		time_zone: row.try_get("time_zone")?,
	})
}

fn tee_time_from_row(row: &PgRow) -> Result<TeeTime> {
	Ok(TeeTime {
		course_id: parse_course_id(row.try_get::<String, _>("course_id")?.as_str())?,
		tee_time: row.try_get("tee_time")?,
		holes: row.try_get("holes")?,
		price_per_player: row.try_get("price_per_player")?,
		available_slots: row.try_get("available_slots")?,
	})
}

fn pref_from_row(row: &PgRow) -> Result<AlertPref> {
	let course_id = row
		.try_get::<Option<String>, _>("course_id")?
		.map(|raw| parse_course_id(raw.as_str()))
		.transpose()?;

	Ok(AlertPref {
		pref_id: row.try_get("pref_id")?,
		user_id: row.try_get("user_id")?,
		course_id,
		max_price: row.try_get("max_price")?,
		min_slots: row.try_get("min_slots")?,
		start_time: row.try_get("start_time")?,
		end_time: row.try_get("end_time")?,
	})
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &TeeTimeFilter) {
	if let Some(start) = filter.start {
		builder.push(" AND tee_time >= ").push_bind(start);
	}
	if let Some(end) = filter.end {
		builder.push(" AND tee_time <= ").push_bind(end);
	}
	if let Some(course_id) = filter.course_id {
		builder.push(" AND course_id = ").push_bind(course_id.to_hex());
	}
	if let Some(max_price) = filter.max_price {
		builder.push(" AND price_per_player <= ").push_bind(max_price);
	}
	if let Some(min_slots) = filter.min_slots {
		builder.push(" AND available_slots >= ").push_bind(min_slots);
	}
}

impl CourseStore for PgStores {
	fn upsert_course<'a>(&'a self, course: &'a Course) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			sqlx::query(
				"\
INSERT INTO courses (course_id, name, booking_url, address, holes, time_zone, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, NOW())
ON CONFLICT (course_id) DO UPDATE
SET name = EXCLUDED.name,
	booking_url = EXCLUDED.booking_url,
	address = EXCLUDED.address,
	holes = EXCLUDED.holes,
	time_zone = EXCLUDED.time_zone,
	updated_at = NOW()",
			)
			.bind(course.course_id.to_hex())
			.bind(course.name.as_str())
			.bind(course.booking_url.as_str())
			.bind(course.address.as_str())
			.bind(course.holes)
			.bind(course.time_zone.as_str())
			.execute(&self.db.pool)
			.await?;

			Ok(())
		})
	}

	fn find_course<'a>(&'a self, course_id: CourseId) -> BoxFuture<'a, Result<Option<Course>>> {
		Box::pin(async move {
			let row = sqlx::query(
				"\
SELECT course_id, name, booking_url, address, holes, time_zone
FROM courses
WHERE course_id = $1",
			)
			.bind(course_id.to_hex())
			.fetch_optional(&self.db.pool)
			.await?;

			row.as_ref().map(course_from_row).transpose()
		})
	}
}

impl TeeTimeStore for PgStores {
	fn find_slot<'a>(
		&'a self,
		course_id: CourseId,
		tee_time: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<TeeTime>>> {
		Box::pin(async move {
			let row = sqlx::query(
				"\
SELECT course_id, tee_time, holes, price_per_player, available_slots
FROM tee_times
WHERE course_id = $1 AND tee_time = $2",
			)
			.bind(course_id.to_hex())
			.bind(tee_time)
			.fetch_optional(&self.db.pool)
			.await?;

			row.as_ref().map(tee_time_from_row).transpose()
		})
	}

	fn insert_slot<'a>(&'a self, slot: &'a TeeTime) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			sqlx::query(
				"\
INSERT INTO tee_times (course_id, tee_time, holes, price_per_player, available_slots)
VALUES ($1, $2, $3, $4, $5)",
			)
			.bind(slot.course_id.to_hex())
			.bind(slot.tee_time)
			.bind(slot.holes)
			.bind(slot.price_per_player)
			.bind(slot.available_slots)
			.execute(&self.db.pool)
			.await?;

			Ok(())
		})
	}

	fn update_slot<'a>(&'a self, slot: &'a TeeTime) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			sqlx::query(
				"\
UPDATE tee_times
SET holes = $3, price_per_player = $4, available_slots = $5
WHERE course_id = $1 AND tee_time = $2",
			)
			.bind(slot.course_id.to_hex())
			.bind(slot.tee_time)
			.bind(slot.holes)
			.bind(slot.price_per_player)
			.bind(slot.available_slots)
			.execute(&self.db.pool)
			.await?;

			Ok(())
		})
	}

	fn search<'a>(
		&'a self,
		filter: &'a TeeTimeFilter,
		after: Option<CursorKey>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<TeeTime>>> {
		Box::pin(async move {
			let mut builder = QueryBuilder::new(
				"\
SELECT course_id, tee_time, holes, price_per_player, available_slots
FROM tee_times
WHERE TRUE",
			);

			push_filter(&mut builder, filter);

			if let Some(key) = &after {
				builder
					.push(" AND (tee_time > ")
					.push_bind(key.tee_time)
					.push(" OR (tee_time = ")
					.push_bind(key.tee_time)
					.push(" AND course_id > ")
					.push_bind(key.course_id.to_hex())
					.push("))");
			}

			builder.push(" ORDER BY tee_time, course_id LIMIT ").push_bind(limit as i64);

			let rows = builder.build().fetch_all(&self.db.pool).await?;

			rows.iter().map(tee_time_from_row).collect()
		})
	}

	fn count<'a>(&'a self, filter: &'a TeeTimeFilter) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let mut builder =
				QueryBuilder::new("SELECT COUNT(*) FROM tee_times WHERE TRUE");

			push_filter(&mut builder, filter);

			let count: i64 =
				builder.build_query_scalar().fetch_one(&self.db.pool).await?;

			Ok(count as _)
		})
	}
}

impl BatchStore for PgStores {
	fn insert_batch<'a>(&'a self, batch: &'a UploadBatch) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let errors = serde_json::to_value(&batch.validation_errors)?;

			sqlx::query(
				"\
INSERT INTO upload_batches
	(batch_id, uploaded_by, imported_count, skipped_count, validation_errors, created_at)
VALUES ($1, $2, $3, $4, $5, $6)",
			)
			.bind(batch.batch_id)
			.bind(batch.uploaded_by.as_str())
			.bind(batch.imported_count as i32)
			.bind(batch.skipped_count as i32)
			.bind(errors)
			.bind(batch.created_at)
			.execute(&self.db.pool)
			.await?;

			Ok(())
		})
	}
}

impl AlertStore for PgStores {
	fn list_prefs(&self) -> BoxFuture<'_, Result<Vec<AlertPref>>> {
		Box::pin(async move {
			let rows = sqlx::query(
				"\
SELECT pref_id, user_id, course_id, max_price, min_slots, start_time, end_time
FROM alert_prefs
ORDER BY user_id",
			)
			.fetch_all(&self.db.pool)
			.await?;

			rows.iter().map(pref_from_row).collect()
		})
	}

	fn list_device_tokens<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<DeviceToken>>> {
		Box::pin(async move {
			let rows =
				sqlx::query("SELECT user_id, token FROM device_tokens WHERE user_id = $1")
					.bind(user_id)
					.fetch_all(&self.db.pool)
					.await?;

			rows.iter()
				.map(|row| {
					Ok(DeviceToken {
						user_id: row.try_get("user_id")?,
						token: row.try_get("token")?,
					})
				})
				.collect()
		})
	}
}
