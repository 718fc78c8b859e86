use std::{pin::Pin, sync::Arc};

use time::OffsetDateTime;

use fairway_domain::{CourseId, CursorKey};

use crate::{
	Result,
	db::Db,
	memory::MemoryStores,
	models::{AlertPref, Course, DeviceToken, TeeTime, UploadBatch},
	pg::PgStores,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Conjunctive slot filter. `start`/`end` are inclusive bounds on the tee
/// time; absent fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeeTimeFilter {
	pub start: Option<OffsetDateTime>,
	pub end: Option<OffsetDateTime>,
	pub course_id: Option<CourseId>,
	pub max_price: Option<f64>,
	pub min_slots: Option<i32>,
}

pub trait CourseStore: Send + Sync {
	/// Inserts or overwrites the course row for `course.course_id`.
	fn upsert_course<'a>(&'a self, course: &'a Course) -> BoxFuture<'a, Result<()>>;

	fn find_course<'a>(&'a self, course_id: CourseId) -> BoxFuture<'a, Result<Option<Course>>>;
}

pub trait TeeTimeStore: Send + Sync {
	fn find_slot<'a>(
		&'a self,
		course_id: CourseId,
		tee_time: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<TeeTime>>>;

	fn insert_slot<'a>(&'a self, slot: &'a TeeTime) -> BoxFuture<'a, Result<()>>;

	fn update_slot<'a>(&'a self, slot: &'a TeeTime) -> BoxFuture<'a, Result<()>>;

	/// Returns at most `limit` slots matching `filter`, strictly after
	/// `after` in `(tee_time, course_id)` order.
	fn search<'a>(
		&'a self,
		filter: &'a TeeTimeFilter,
		after: Option<CursorKey>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<TeeTime>>>;

	fn count<'a>(&'a self, filter: &'a TeeTimeFilter) -> BoxFuture<'a, Result<u64>>;
}

pub trait BatchStore: Send + Sync {
	fn insert_batch<'a>(&'a self, batch: &'a UploadBatch) -> BoxFuture<'a, Result<()>>;
}

pub trait AlertStore: Send + Sync {
	fn list_prefs(&self) -> BoxFuture<'_, Result<Vec<AlertPref>>>;

	fn list_device_tokens<'a>(&'a self, user_id: &'a str)
	-> BoxFuture<'a, Result<Vec<DeviceToken>>>;
}

/// Bundle of store handles shared by the API and the worker.
#[derive(Clone)]
pub struct Stores {
	pub courses: Arc<dyn CourseStore>,
	pub tee_times: Arc<dyn TeeTimeStore>,
	pub batches: Arc<dyn BatchStore>,
	pub alerts: Arc<dyn AlertStore>,
}

impl Stores {
	pub fn in_memory() -> Self {
		let mem = Arc::new(MemoryStores::new());

		Self {
			courses: mem.clone(),
			tee_times: mem.clone(),
			batches: mem.clone(),
			alerts: mem,
		}
	}

	pub fn postgres(db: Db) -> Self {
		let pg = Arc::new(PgStores::new(db));

		Self {
			courses: pg.clone(),
			tee_times: pg.clone(),
			batches: pg.clone(),
			alerts: pg,
		}
	}
}
