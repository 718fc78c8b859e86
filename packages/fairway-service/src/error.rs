pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid cursor format")]
	InvalidCursor,
	#[error("CSV error: {message}")]
	Csv { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<fairway_storage::Error> for Error {
	fn from(err: fairway_storage::Error) -> Self {
		match err {
			fairway_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}
