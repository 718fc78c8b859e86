//! Application services for the tee-time marketplace.
//!
//! [`TeeService`] drives the two core flows, CSV ingestion ([`ingest`]) and
//! cursor-paginated search ([`search`]), over the storage traits.

pub mod ingest;
pub mod search;
pub mod time_serde;

mod error;
pub use error::{Error, Result};

pub use ingest::IngestReport;
pub use search::{SearchPage, SearchParams, SlotView};

use fairway_config::Config;
use fairway_storage::store::Stores;

pub struct TeeService {
	cfg: Config,
	stores: Stores,
}
impl TeeService {
	pub fn new(cfg: Config, stores: Stores) -> Self {
		Self { cfg, stores }
	}

	pub fn config(&self) -> &Config {
		&self.cfg
	}

	pub fn stores(&self) -> &Stores {
		&self.stores
	}
}
