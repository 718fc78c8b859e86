use std::{
	collections::{BTreeMap, HashMap},
	sync::{Mutex, MutexGuard},
};

use time::OffsetDateTime;

use fairway_domain::{CourseId, CursorKey};

use crate::{
	Result,
	models::{AlertPref, Course, DeviceToken, TeeTime, UploadBatch},
	store::{AlertStore, BatchStore, BoxFuture, CourseStore, TeeTimeFilter, TeeTimeStore},
};

#[derive(Debug, Default)]
struct State {
	courses: HashMap<CourseId, Course>,
	// Keyed in cursor order so paginated scans fall out of range iteration.
	tee_times: BTreeMap<(OffsetDateTime, CourseId), TeeTime>,
	batches: Vec<UploadBatch>,
	prefs: Vec<AlertPref>,
	tokens: Vec<DeviceToken>,
}

/// In-process store used by tests and local runs without Postgres.
#[derive(Debug, Default)]
pub struct MemoryStores {
	state: Mutex<State>,
}

impl MemoryStores {
	pub fn new() -> Self {
		Self::default()
	}

	fn state(&self) -> MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	pub fn seed_pref(&self, pref: AlertPref) {
		self.state().prefs.push(pref);
	}

	pub fn seed_token(&self, token: DeviceToken) {
		self.state().tokens.push(token);
	}

	pub fn batches(&self) -> Vec<UploadBatch> {
		self.state().batches.clone()
	}

	pub fn tee_time_count(&self) -> usize {
		self.state().tee_times.len()
	}
}

fn matches(filter: &TeeTimeFilter, slot: &TeeTime) -> bool {
	if let Some(start) = filter.start
		&& slot.tee_time < start
	{
		return false;
	}
	if let Some(end) = filter.end
		&& slot.tee_time > end
	{
		return false;
	}
	if let Some(course_id) = filter.course_id
		&& slot.course_id != course_id
	{
		return false;
	}
	if let Some(max_price) = filter.max_price
		&& slot.price_per_player > max_price
	{
		return false;
	}
	if let Some(min_slots) = filter.min_slots
		&& slot.available_slots < min_slots
	{
		return false;
	}

	true
}

impl CourseStore for MemoryStores {
	fn upsert_course<'a>(&'a self, course: &'a Course) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.state().courses.insert(course.course_id, course.clone());

			Ok(())
		})
	}

	fn find_course<'a>(&'a self, course_id: CourseId) -> BoxFuture<'a, Result<Option<Course>>> {
		Box::pin(async move { Ok(self.state().courses.get(&course_id).cloned()) })
	}
}

impl TeeTimeStore for MemoryStores {
	fn find_slot<'a>(
		&'a self,
		course_id: CourseId,
		tee_time: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<TeeTime>>> {
		Box::pin(
			async move { Ok(self.state().tee_times.get(&(tee_time, course_id)).cloned()) },
		)
	}

	fn insert_slot<'a>(&'a self, slot: &'a TeeTime) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.state().tee_times.insert((slot.tee_time, slot.course_id), slot.clone());

			Ok(())
		})
	}

	fn update_slot<'a>(&'a self, slot: &'a TeeTime) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.state().tee_times.insert((slot.tee_time, slot.course_id), slot.clone());

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
			let state = self.state();
			let slots = state
				.tee_times
				.iter()
				.filter(|((tee_time, course_id), _)| {
					after.as_ref().is_none_or(|key| {
						(*tee_time, *course_id) > (key.tee_time, key.course_id)
					})
				})
				.filter(|(_, slot)| matches(filter, slot))
				.take(limit as _)
				.map(|(_, slot)| slot.clone())
				.collect();

			Ok(slots)
		})
	}

	fn count<'a>(&'a self, filter: &'a TeeTimeFilter) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let count =
				self.state().tee_times.values().filter(|slot| matches(filter, slot)).count();

			Ok(count as _)
		})
	}
}

impl BatchStore for MemoryStores {
	fn insert_batch<'a>(&'a self, batch: &'a UploadBatch) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.state().batches.push(batch.clone());

			Ok(())
		})
	}
}

impl AlertStore for MemoryStores {
	fn list_prefs(&self) -> BoxFuture<'_, Result<Vec<AlertPref>>> {
		Box::pin(async move { Ok(self.state().prefs.clone()) })
	}

	fn list_device_tokens<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<DeviceToken>>> {
		Box::pin(async move {
			Ok(self
				.state()
				.tokens
				.iter()
				.filter(|token| token.user_id == user_id)
				.cloned()
				.collect())
		})
	}
}
