use time::macros::datetime;
use uuid::Uuid;

use fairway_config::Postgres;
use fairway_domain::CourseId;
use fairway_storage::{
	db::Db,
	models::{Course, RowIssue, TeeTime, UploadBatch},
	store::{BatchStore as _, CourseStore as _, Stores, TeeTimeFilter, TeeTimeStore as _},
};
use fairway_testkit::TestDatabase;

fn sample_course(course_id: CourseId) -> Course {
	Course {
		course_id,
		name: "Pebble Creek".into(),
		booking_url: "https://book.example.com/pebble".into(),
		address: "1 Fairway Dr".into(),
		holes: 18,
		time_zone: "America/New_York".into(),
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FAIRWAY_PG_DSN to run."]
async fn schema_bootstrap_creates_tables() {
	let Some(base_dsn) = fairway_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_creates_tables; set FAIRWAY_PG_DSN to run this test.");

		return;
	};

	fairway_testkit::with_test_db(&base_dsn, |test_db| {
		let dsn = test_db.dsn().to_string();

		async move {
			let cfg = Postgres { dsn, pool_max_conns: 1 };
			let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

			db.ensure_schema().await.expect("Failed to ensure schema.");
			// Running twice must be harmless.
			db.ensure_schema().await.expect("Failed to re-ensure schema.");

			for table in ["courses", "tee_times", "upload_batches", "alert_prefs", "device_tokens"] {
				let count: i64 = sqlx::query_scalar(
					"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
				)
				.bind(table)
				.fetch_one(&db.pool)
				.await
				.expect("Failed to query schema tables.");

				assert_eq!(count, 1, "missing table {table}");
			}

			Ok(())
		}
	})
	.await
	.expect("Test database lifecycle failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FAIRWAY_PG_DSN to run."]
async fn slot_upsert_and_search_roundtrip() {
	let Some(base_dsn) = fairway_testkit::env_dsn() else {
		eprintln!("Skipping slot_upsert_and_search_roundtrip; set FAIRWAY_PG_DSN to run this test.");

		return;
	};

	fairway_testkit::with_test_db(&base_dsn, |test_db| {
		let dsn = test_db.dsn().to_string();

		async move {
			let cfg = Postgres { dsn, pool_max_conns: 2 };
			let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

			db.ensure_schema().await.expect("Failed to ensure schema.");

			let stores = Stores::postgres(db);
			let course_id = CourseId::coerce("Pebble Creek").expect("Failed to coerce course id.");

			stores
				.courses
				.upsert_course(&sample_course(course_id))
				.await
				.expect("Failed to upsert course.");

			let slot = TeeTime {
				course_id,
				tee_time: datetime!(2026-09-01 14:30:00 UTC),
				holes: 18,
				price_per_player: 55.0,
				available_slots: 4,
			};

			stores.tee_times.insert_slot(&slot).await.expect("Failed to insert slot.");

			let found = stores
				.tee_times
				.find_slot(course_id, slot.tee_time)
				.await
				.expect("Failed to look up slot.")
				.expect("Slot should exist.");

			assert_eq!(found.available_slots, 4);

			let updated = TeeTime { available_slots: 2, price_per_player: 45.0, ..slot.clone() };

			stores.tee_times.update_slot(&updated).await.expect("Failed to update slot.");

			let filter = TeeTimeFilter {
				start: Some(datetime!(2026-09-01 00:00:00 UTC)),
				end: Some(datetime!(2026-09-01 23:59:59.999 UTC)),
				..Default::default()
			};
			let slots =
				stores.tee_times.search(&filter, None, 10).await.expect("Failed to search slots.");

			assert_eq!(slots.len(), 1);
			assert_eq!(slots[0].available_slots, 2);
			assert_eq!(slots[0].price_per_player, 45.0);
			assert_eq!(
				stores.tee_times.count(&filter).await.expect("Failed to count slots."),
				1
			);

			// The compound key must reject a second insert of the same slot.
			assert!(stores.tee_times.insert_slot(&slot).await.is_err());

			Ok(())
		}
	})
	.await
	.expect("Test database lifecycle failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FAIRWAY_PG_DSN to run."]
async fn batch_rows_persist_with_errors() {
	let Some(base_dsn) = fairway_testkit::env_dsn() else {
		eprintln!("Skipping batch_rows_persist_with_errors; set FAIRWAY_PG_DSN to run this test.");

		return;
	};

	fairway_testkit::with_test_db(&base_dsn, |test_db| {
		let dsn = test_db.dsn().to_string();

		async move {
			let cfg = Postgres { dsn, pool_max_conns: 1 };
			let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

			db.ensure_schema().await.expect("Failed to ensure schema.");

			let pool = db.pool.clone();
			let stores = Stores::postgres(db);
			let batch = UploadBatch {
				batch_id: Uuid::new_v4(),
				uploaded_by: "ops@fairway.golf".into(),
				imported_count: 3,
				skipped_count: 1,
				validation_errors: vec![RowIssue {
					row: 2,
					message: "holes must be an integer between 9 and 18".into(),
				}],
				created_at: datetime!(2026-08-31 12:00:00 UTC),
			};

			stores.batches.insert_batch(&batch).await.expect("Failed to insert batch.");

			let (imported, errors): (i32, serde_json::Value) = sqlx::query_as(
				"SELECT imported_count, validation_errors FROM upload_batches WHERE batch_id = $1",
			)
			.bind(batch.batch_id)
			.fetch_one(&pool)
			.await
			.expect("Failed to read batch back.");

			assert_eq!(imported, 3);
			assert_eq!(errors[0]["row"], 2);

			Ok(())
		}
	})
	.await
	.expect("Test database lifecycle failed.");
}
