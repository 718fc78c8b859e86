use serde::Serialize;
use time::{
	Date, OffsetDateTime, UtcOffset,
	format_description::{BorrowedFormatItem, well_known::Rfc3339},
	macros::{format_description, time},
};

use fairway_domain::{CourseId, CursorKey, DedupTracker, cursor, dedup};
use fairway_storage::{
	models::TeeTime,
	store::{TeeTimeFilter, TeeTimeStore as _},
};

use crate::{Error, Result, TeeService, time_serde};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Raw query-string parameters, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
	pub date: Option<String>,
	pub start_time: Option<String>,
	pub end_time: Option<String>,
	pub course_id: Option<String>,
	pub max_price: Option<String>,
	pub min_slots: Option<String>,
	pub slots: Option<String>,
	pub cursor: Option<String>,
	pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
	pub course_id: CourseId,
	#[serde(with = "time_serde")]
	pub tee_time: OffsetDateTime,
	pub holes: i32,
	pub price_per_player: f64,
	pub available_slots: i32,
}
impl From<TeeTime> for SlotView {
	fn from(slot: TeeTime) -> Self {
		Self {
			course_id: slot.course_id,
			tee_time: slot.tee_time,
			holes: slot.holes,
			price_per_player: slot.price_per_player,
			available_slots: slot.available_slots,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
	pub results: Vec<SlotView>,
	pub total: u64,
	pub has_more: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next_cursor: Option<String>,
}

impl TeeService {
	/// One page of slots in ascending `(tee_time, course_id)` order, resumed
	/// from `params.cursor` when present.
	pub async fn search(&self, params: &SearchParams) -> Result<SearchPage> {
		let filter = self.build_filter(params)?;
		let after = params
			.cursor
			.as_deref()
			.map(str::trim)
			.filter(|raw| !raw.is_empty())
			.map(cursor::decode)
			.transpose()
			.map_err(|_| Error::InvalidCursor)?;
		let limit = self.effective_limit(params)?;
		// Persisted rows may still carry entity-level duplicates; over-fetch
		// so the post-collapse page can fill up. Saturating so an extreme
		// configured max_limit cannot wrap.
		let overfetch = limit.saturating_mul(2).max(limit.saturating_add(1));
		let fetched = self.stores.tee_times.search(&filter, after, overfetch).await?;
		let mut tracker = DedupTracker::new();
		let mut deduped = Vec::with_capacity(fetched.len());

		for slot in fetched {
			let key = dedup::slot_key(&slot.course_id, slot.tee_time);

			if tracker.seen(&key) {
				continue;
			}

			tracker.record(key);
			deduped.push(slot);
		}

		let has_more = deduped.len() as u32 > limit;

		deduped.truncate(limit as _);

		let next_cursor = if has_more {
			deduped.last().map(|slot| {
				cursor::encode(&CursorKey { tee_time: slot.tee_time, course_id: slot.course_id })
			})
		} else {
			None
		};
		let total = self.stores.tee_times.count(&filter).await?;

		Ok(SearchPage {
			results: deduped.into_iter().map(SlotView::from).collect(),
			total,
			has_more,
			next_cursor,
		})
	}

	fn build_filter(&self, params: &SearchParams) -> Result<TeeTimeFilter> {
		let start_time = parse_instant(&params.start_time)?;
		let end_time = parse_instant(&params.end_time)?;
		// An explicit range needs both ends; a lone bound falls back to the
		// day window.
		let (start, end) = if let (Some(start), Some(end)) = (start_time, end_time) {
			(start, end)
		} else {
			let raw = params
				.date
				.as_deref()
				.map(str::trim)
				.filter(|raw| !raw.is_empty())
				.ok_or_else(|| Error::InvalidRequest { message: "Date is required".into() })?;

			day_range(raw)?
		};
		let course_id = match params.course_id.as_deref().map(str::trim) {
			None | Some("") => None,
			Some(raw) => Some(
				CourseId::coerce(raw)
					.map_err(|_| Error::InvalidRequest { message: "Invalid courseId".into() })?,
			),
		};
		let max_price = params
			.max_price
			.as_deref()
			.map(str::trim)
			.filter(|raw| !raw.is_empty())
			.map(|raw| {
				raw.parse::<f64>().map_err(|_| Error::InvalidRequest {
					message: "maxPrice must be a number.".into(),
				})
			})
			.transpose()?;
		let min_slots = params
			.min_slots
			.as_deref()
			.or(params.slots.as_deref())
			.map(str::trim)
			.filter(|raw| !raw.is_empty())
			.map(|raw| {
				raw.parse::<i32>().map_err(|_| Error::InvalidRequest {
					message: "minSlots must be an integer.".into(),
				})
			})
			.transpose()?;

		Ok(TeeTimeFilter { start: Some(start), end: Some(end), course_id, max_price, min_slots })
	}

	fn effective_limit(&self, params: &SearchParams) -> Result<u32> {
		let requested = params
			.limit
			.as_deref()
			.map(str::trim)
			.filter(|raw| !raw.is_empty())
			.map(|raw| {
				raw.parse::<u32>().map_err(|_| Error::InvalidRequest {
					message: "limit must be a positive integer.".into(),
				})
			})
			.transpose()?
			.unwrap_or(self.cfg.search.default_limit);

		Ok(requested.clamp(1, self.cfg.search.max_limit))
	}
}

fn parse_instant(raw: &Option<String>) -> Result<Option<OffsetDateTime>> {
	raw.as_deref()
		.map(str::trim)
		.filter(|raw| !raw.is_empty())
		.map(|raw| {
			OffsetDateTime::parse(raw, &Rfc3339)
				.map(|ts| ts.to_offset(UtcOffset::UTC))
				.map_err(|_| Error::InvalidRequest { message: "Invalid date format".into() })
		})
		.transpose()
}

/// The UTC calendar day covering `raw`, inclusive on both ends.
fn day_range(raw: &str) -> Result<(OffsetDateTime, OffsetDateTime)> {
	let date = if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
		ts.to_offset(UtcOffset::UTC).date()
	} else {
		Date::parse(raw, DATE_FORMAT)
			.map_err(|_| Error::InvalidRequest { message: "Invalid date format".into() })?
	};
	let start = date.midnight().assume_utc();
	let end = date.with_time(time!(23:59:59.999_999_999)).assume_utc();

	Ok((start, end))
}
