//! Flowfile model and output channels
//!
//! A flowfile is one unit of in-flight data handed to a plugin by the host
//! runtime: raw content bytes plus string attributes. A plugin produces at
//! most one [`TransformResult`], which names the single output channel the
//! payload is delivered on.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// One unit of data flowing through the host runtime
#[derive(Debug, Clone, Default)]
pub struct FlowFile {
    /// Raw content bytes
    pub content: Vec<u8>,

    /// Flowfile attributes
    pub attributes: HashMap<String, String>,
}

impl FlowFile {
    /// Create a flowfile from content bytes
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content,
            attributes: HashMap::new(),
        }
    }

    /// Create a flowfile from UTF-8 text content
    pub fn from_text(content: impl Into<String>) -> Self {
        Self::new(content.into().into_bytes())
    }

    /// Get the content as UTF-8 text
    ///
    /// Non-UTF-8 content fails the invocation.
    pub fn content_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|e| Error::InvalidContent {
            message: format!("content is not valid UTF-8: {}", e),
        })
    }
}

/// Named output channel a transform routes its result to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Successfully transformed records
    Success,
    /// Records already present in the reference source
    Duplicate,
    /// Diagnostic output for caught failures
    Failure,
}

impl Channel {
    /// The channel name as known to the host runtime
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Success => "success",
            Channel::Duplicate => "duplicate",
            Channel::Failure => "failure",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a transform invocation: one payload on one channel
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Channel the payload is delivered on
    pub channel: Channel,

    /// Serialized payload handed to the host
    pub contents: String,
}

impl TransformResult {
    /// Create a transform result
    pub fn new(channel: Channel, contents: impl Into<String>) -> Self {
        Self {
            channel,
            contents: contents.into(),
        }
    }
}

/// Trait implemented by every record-level transform plugin
///
/// One invocation per flowfile; invocations are self-contained and share
/// no mutable state, so the host may run them concurrently across
/// independent flowfiles. Returning `Ok(None)` produces no output at all.
#[async_trait]
pub trait FlowFileTransform: Send + Sync {
    /// Transform one flowfile
    async fn transform(&self, flowfile: &FlowFile) -> Result<Option<TransformResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Success.as_str(), "success");
        assert_eq!(Channel::Duplicate.as_str(), "duplicate");
        assert_eq!(Channel::Failure.as_str(), "failure");
        assert_eq!(Channel::Duplicate.to_string(), "duplicate");
    }

    #[test]
    fn test_content_str_utf8() {
        let flowfile = FlowFile::from_text(r#"{"a": 1}"#);
        assert_eq!(flowfile.content_str().unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_content_str_rejects_invalid_utf8() {
        let flowfile = FlowFile::new(vec![0xff, 0xfe, 0x00]);
        let err = flowfile.content_str().unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_transform_result_new() {
        let result = TransformResult::new(Channel::Success, "[]");
        assert_eq!(result.channel, Channel::Success);
        assert_eq!(result.contents, "[]");
    }

    struct Passthrough;

    #[async_trait]
    impl FlowFileTransform for Passthrough {
        async fn transform(&self, flowfile: &FlowFile) -> Result<Option<TransformResult>> {
            Ok(Some(TransformResult::new(
                Channel::Success,
                flowfile.content_str()?,
            )))
        }
    }

    #[tokio::test]
    async fn test_transform_as_trait_object() {
        let plugin: Box<dyn FlowFileTransform> = Box::new(Passthrough);
        let flowfile = FlowFile::from_text("payload");
        let result = plugin.transform(&flowfile).await.unwrap().unwrap();
        assert_eq!(result.channel, Channel::Success);
        assert_eq!(result.contents, "payload");
    }
}
