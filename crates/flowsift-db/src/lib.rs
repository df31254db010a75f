//! Flowsift Record Loader
//!
//! This crate acquires reference records from a relational source for the
//! duplicate-check plugins. Two back ends produce the same normalized
//! shape (ordered records keyed by column label):
//!
//! - [`source::EngineSource`] — a fresh connection built from connection
//!   parameters, opened and closed within one invocation
//! - [`source::PooledSource`] — a caller-supplied connection pool handle,
//!   with scoped acquisition and guaranteed release
//!
//! Zero-row results are an empty sequence, never an error. No retries or
//! timeouts are implemented here; those belong to the host runtime or the
//! database driver.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod row;
pub mod source;

pub use error::{Error, Result};
pub use source::{ConnectionParams, EngineSource, PooledSource, RecordSource};
