use std::sync::Arc;

use fairway_service::TeeService;
use fairway_storage::{db::Db, store::Stores};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TeeService>,
}
impl AppState {
	pub async fn new(config: fairway_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::with_stores(config, Stores::postgres(db)))
	}

	pub fn with_stores(config: fairway_config::Config, stores: Stores) -> Self {
		Self { service: Arc::new(TeeService::new(config, stores)) }
	}
}
