//! Flowsift Plugins
//!
//! Record-level transformation plugins hosted by the flow orchestration
//! runtime:
//!
//! - [`check_duplicates::CheckDuplicates`] — duplicate check against a
//!   reference query, connecting per invocation from connection parameters
//! - [`check_duplicates::PooledCheckDuplicates`] — the same check over a
//!   host-managed connection pool
//! - [`geojson_wkt::GeoJsonTransform`] — GeoJSON to WKT with coordinate
//!   system transformation
//!
//! The duplicate checks let failures propagate to the host as invocation
//! failures; the GeoJSON transform catches its own failures and routes
//! diagnostic text to the `failure` channel.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod check_duplicates;
pub mod geojson_wkt;

pub use check_duplicates::{CheckDuplicates, CheckDuplicatesConfig, PooledCheckDuplicates};
pub use geojson_wkt::{GeoJsonTransform, GeoJsonTransformConfig};
