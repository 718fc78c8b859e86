use std::{
	collections::{HashMap, HashSet},
	sync::Arc,
	time::Duration,
};

use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::time as tokio_time;

use fairway_domain::dedup;
use fairway_storage::{
	models::AlertPref,
	store::{AlertStore as _, BoxFuture, CourseStore as _, Stores, TeeTimeFilter, TeeTimeStore as _},
};

use crate::Result;

// Matches fetched per preference per poll.
const MATCH_LIMIT: u32 = 50;

/// One rendered notification, ready for a delivery channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushNote {
	pub title: String,
	pub body: String,
}

pub trait PushSender: Send + Sync {
	fn send<'a>(&'a self, token: &'a str, note: &'a PushNote) -> BoxFuture<'a, Result<()>>;
}

/// Posts notifications to an HTTP push gateway.
pub struct HttpPushSender {
	url: String,
	client: reqwest::Client,
}
impl HttpPushSender {
	pub fn new(url: String, timeout: Duration) -> Result<Self> {
		let client = reqwest::Client::builder().timeout(timeout).build()?;

		Ok(Self { url, client })
	}
}
impl PushSender for HttpPushSender {
	fn send<'a>(&'a self, token: &'a str, note: &'a PushNote) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.client
				.post(&self.url)
				.json(&serde_json::json!({
					"token": token,
					"title": note.title,
					"body": note.body,
				}))
				.send()
				.await?
				.error_for_status()?;

			Ok(())
		})
	}
}

/// Fallback sender for deployments without a gateway.
pub struct LogOnlySender;
impl PushSender for LogOnlySender {
	fn send<'a>(&'a self, token: &'a str, note: &'a PushNote) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			tracing::info!(token, title = %note.title, "Push suppressed; no gateway configured.");

			Ok(())
		})
	}
}

pub struct WorkerState {
	pub stores: Stores,
	pub sender: Arc<dyn PushSender>,
	pub poll_interval: Duration,
}

pub async fn run_worker(state: WorkerState) -> color_eyre::Result<()> {
	let mut ticker = tokio_time::interval(state.poll_interval);
	// Repeat-push suppression is process-local; a restart may re-notify.
	let mut seen = HashSet::new();

	tracing::info!(interval_secs = state.poll_interval.as_secs(), "Worker started.");

	loop {
		ticker.tick().await;

		if let Err(err) =
			check_new_tee_times(&state, &mut seen, OffsetDateTime::now_utc()).await
		{
			tracing::error!(error = %err, "Notification pass failed.");
		}
	}
}

/// One notification pass: match future slots against every alert preference
/// and push to the owning user's devices.
pub async fn check_new_tee_times(
	state: &WorkerState,
	seen: &mut HashSet<String>,
	now: OffsetDateTime,
) -> Result<usize> {
	let prefs = state.stores.alerts.list_prefs().await?;
	let mut by_user: HashMap<String, Vec<AlertPref>> = HashMap::new();

	for pref in prefs {
		by_user.entry(pref.user_id.clone()).or_default().push(pref);
	}

	let mut sent = 0;

	for (user_id, prefs) in by_user {
		let tokens = state.stores.alerts.list_device_tokens(&user_id).await?;

		if tokens.is_empty() {
			continue;
		}

		for pref in prefs {
			let filter = pref_filter(&pref, now);
			let slots = state.stores.tee_times.search(&filter, None, MATCH_LIMIT).await?;

			for slot in slots {
				let key = format!("{user_id}|{}", dedup::slot_key(&slot.course_id, slot.tee_time));

				if seen.contains(&key) {
					continue;
				}

				seen.insert(key);

				let course_name = state
					.stores
					.courses
					.find_course(slot.course_id)
					.await?
					.map(|course| course.name)
					.unwrap_or_else(|| slot.course_id.to_hex());
				let note = render_note(&course_name, slot.tee_time, slot.price_per_player);

				for token in &tokens {
					match state.sender.send(&token.token, &note).await {
						Ok(()) => sent += 1,
						Err(err) => {
							tracing::warn!(
								user_id = %user_id,
								token = %token.token,
								error = %err,
								"Push delivery failed.",
							);
						},
					}
				}
			}
		}
	}

	Ok(sent)
}

fn pref_filter(pref: &AlertPref, now: OffsetDateTime) -> TeeTimeFilter {
	let start = match pref.start_time {
		Some(start) if start > now => start,
		_ => now,
	};

	TeeTimeFilter {
		start: Some(start),
		end: pref.end_time,
		course_id: pref.course_id,
		max_price: pref.max_price,
		min_slots: pref.min_slots,
	}
}

fn render_note(course_name: &str, tee_time: OffsetDateTime, price: f64) -> PushNote {
	let when = tee_time.format(&Rfc3339).unwrap_or_default();

	PushNote {
		title: format!("New tee time at {course_name}"),
		body: format!("{when}, ${price:.2} per player"),
	}
}
