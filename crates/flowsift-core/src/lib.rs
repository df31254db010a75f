//! Flowsift Core Library
//!
//! This crate provides the pieces shared by every Flowsift plugin:
//! - Flowfile model and output channels
//! - Record parsing and field mappings
//! - The duplicate classifier and its routing policy
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  FlowFile   │────▶│  Transform  │────▶│   Channel   │
//! │   (JSON)    │     │   Plugin    │     │   Result    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Plugins are hosted by an external orchestration runtime. Each
//! invocation receives one flowfile, runs to completion, and hands back
//! at most one [`flowfile::TransformResult`] naming the output channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use flowsift_core::{classify, FieldMapping, parse_records};
//!
//! let incoming = parse_records(r#"[{"id": 1}]"#)?;
//! let mapping = FieldMapping::from_json(r#"{"id": "id"}"#)?;
//! let classification = classify(incoming, &reference, &mapping);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod error;
pub mod flowfile;
pub mod record;

pub use classify::{classify, Classification};
pub use error::{Error, Result};
pub use flowfile::{Channel, FlowFile, FlowFileTransform, TransformResult};
pub use record::{parse_records, FieldMapping, Record};
