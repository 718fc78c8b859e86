pub mod worker;

mod error;
pub use error::{Error, Result};

use std::{sync::Arc, time::Duration};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fairway_storage::{db::Db, store::Stores};

use crate::worker::{HttpPushSender, LogOnlySender, PushSender, WorkerState};

#[derive(Debug, Parser)]
#[command(
	version = fairway_cli::VERSION,
	rename_all = "kebab",
	styles = fairway_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = fairway_config::load(&args.config)?;
	let filter = EnvFilter::try_new(&config.service.log_level)
		.unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let sender: Arc<dyn PushSender> = match &config.worker.push_gateway_url {
		Some(url) => Arc::new(HttpPushSender::new(
			url.clone(),
			Duration::from_millis(config.worker.push_timeout_ms),
		)?),
		None => {
			tracing::warn!("No push gateway configured; notifications will only be logged.");

			Arc::new(LogOnlySender)
		},
	};
	let state = WorkerState {
		stores: Stores::postgres(db),
		sender,
		poll_interval: Duration::from_secs(config.worker.poll_interval_secs),
	};

	worker::run_worker(state).await
}
