//! Persistence layer for the tee-time marketplace.
//!
//! The API and the worker talk to storage through the narrow traits in
//! [`store`]; [`memory`] backs tests and local runs, [`pg`] backs production.

pub mod db;
pub mod memory;
pub mod models;
pub mod pg;
pub mod schema;
pub mod store;

mod error;
pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
