pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Storage(#[from] fairway_storage::Error),
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
}
