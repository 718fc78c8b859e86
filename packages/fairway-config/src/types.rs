use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub ingest: Ingest,
	pub search: Search,
	pub worker: Worker,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Ingest {
	/// Upper bound on one uploaded CSV, in bytes.
	pub max_upload_bytes: u64,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_search_limit")]
	pub default_limit: u32,
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct Worker {
	pub poll_interval_secs: u64,
	pub push_gateway_url: Option<String>,
	pub push_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

fn default_search_limit() -> u32 {
	20
}

fn default_max_limit() -> u32 {
	100
}
