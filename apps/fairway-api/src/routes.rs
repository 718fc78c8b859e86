use axum::{
	Json, Router,
	extract::{DefaultBodyLimit, Multipart, Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use fairway_service::{Error as ServiceError, SearchParams};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/search", get(search))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	let limit = state.service.config().ingest.max_upload_bytes as usize;

	Router::new()
		.route("/admin/upload", post(upload))
		.layer(DefaultBodyLimit::max(limit))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
	date: Option<String>,
	start_time: Option<String>,
	end_time: Option<String>,
	course_id: Option<String>,
	max_price: Option<String>,
	min_slots: Option<String>,
	slots: Option<String>,
	cursor: Option<String>,
	limit: Option<String>,
}
impl From<SearchQuery> for SearchParams {
	fn from(query: SearchQuery) -> Self {
		Self {
			date: query.date,
			start_time: query.start_time,
			end_time: query.end_time,
			course_id: query.course_id,
			max_price: query.max_price,
			min_slots: query.min_slots,
			slots: query.slots,
			cursor: query.cursor,
			limit: query.limit,
		}
	}
}

async fn search(
	State(state): State<AppState>,
	Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
	let page = state.service.search(&query.into()).await.map_err(search_error)?;

	Ok(Json(page).into_response())
}

async fn upload(
	State(state): State<AppState>,
	headers: HeaderMap,
	mut multipart: Multipart,
) -> Result<Response, ApiError> {
	let uploaded_by = headers
		.get("x-user-id")
		.and_then(|value| value.to_str().ok())
		.unwrap_or("unknown")
		.to_string();
	let mut file = None;

	while let Some(field) = multipart.next_field().await.map_err(|err| {
		ApiError::new(StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
	})? {
		if field.name() == Some("file") {
			let bytes = field.bytes().await.map_err(|err| {
				ApiError::new(StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
			})?;

			file = Some(bytes);
		}
	}

	let Some(bytes) = file else {
		return Err(ApiError::new(
			StatusCode::BAD_REQUEST,
			json!({ "error": "No file uploaded" }),
		));
	};
	let report =
		state.service.ingest_csv(&uploaded_by, &bytes).await.map_err(upload_error)?;

	Ok(Json(json!({ "success": true, "batch": report })).into_response())
}

fn search_error(err: ServiceError) -> ApiError {
	match err {
		ServiceError::InvalidRequest { message } =>
			ApiError::new(StatusCode::BAD_REQUEST, json!({ "message": message })),
		ServiceError::InvalidCursor =>
			ApiError::new(StatusCode::BAD_REQUEST, json!({ "message": "Invalid cursor format" })),
		other => {
			tracing::error!(error = %other, "Search failed.");

			ApiError::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				json!({ "message": "Error searching tee times" }),
			)
		},
	}
}

fn upload_error(err: ServiceError) -> ApiError {
	match err {
		ServiceError::InvalidRequest { message } =>
			ApiError::new(StatusCode::BAD_REQUEST, json!({ "message": message })),
		other => {
			tracing::error!(error = %other, "Ingestion failed.");

			ApiError::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				json!({ "error": "Error processing CSV", "message": other.to_string() }),
			)
		},
	}
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	body: serde_json::Value,
}
impl ApiError {
	fn new(status: StatusCode, body: serde_json::Value) -> Self {
		Self { status, body }
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(self.body)).into_response()
	}
}
