//! Content records persisted to the content store before minting.

use crate::{ContentRef, NodeId, NodeKind};
use chainmuse_error::{ContentError, ContentErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

const DESCRIPTION_CHARS: usize = 100;

/// The immutable payload of one narrative node.
///
/// Serialized as JSON with the field names readers of the content store
/// already expect (`name`, `content`, `type`, `parent`, `parentIpfsCid`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ContentRecord {
    /// Node title
    name: String,
    /// Short preview of the content
    #[serde(default)]
    description: String,
    /// Generated narrative text
    content: String,
    /// Root or child
    #[serde(rename = "type")]
    kind: NodeKind,
    /// Parent node id, `None` for roots
    #[serde(default)]
    parent: Option<NodeId>,
    /// Content reference of the parent's record
    #[serde(
        rename = "parentIpfsCid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    parent_content_ref: Option<ContentRef>,
    /// Milliseconds since the Unix epoch when the record was assembled
    timestamp: u64,
    /// Model that produced the content
    #[serde(default)]
    model: String,
}

impl ContentRecord {
    /// Record for a new root node.
    pub fn root(
        title: impl Into<String>,
        content: impl Into<String>,
        model: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        let content = content.into();
        Self {
            name: title.into(),
            description: preview(&content),
            content,
            kind: NodeKind::Root,
            parent: None,
            parent_content_ref: None,
            timestamp,
            model: model.into(),
        }
    }

    /// Record for a child of `parent`.
    pub fn child(
        title: impl Into<String>,
        content: impl Into<String>,
        model: impl Into<String>,
        timestamp: u64,
        parent: NodeId,
        parent_content_ref: ContentRef,
    ) -> Self {
        let content = content.into();
        Self {
            name: title.into(),
            description: preview(&content),
            content,
            kind: NodeKind::Child,
            parent: Some(parent),
            parent_content_ref: Some(parent_content_ref),
            timestamp,
            model: model.into(),
        }
    }

    /// Encode as the blob handed to the content store.
    pub fn to_blob(&self) -> Result<Vec<u8>, ContentError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a blob fetched from the content store.
    pub fn from_blob(blob: &[u8]) -> Result<Self, ContentError> {
        let record: Self = serde_json::from_slice(blob)?;
        if record.kind == NodeKind::Child && record.parent.is_none() {
            return Err(ContentError::new(ContentErrorKind::InvalidRecord(
                "child record without parent".to_string(),
            )));
        }
        Ok(record)
    }
}

/// Extract the narrative text from a blob, tolerating records from older
/// writers that only carry a `content` field.
///
/// Returns an empty string when the blob is JSON without a `content` field.
pub fn extract_context(blob: &[u8]) -> Result<String, ContentError> {
    let value: serde_json::Value = serde_json::from_slice(blob)?;
    Ok(value
        .get("content")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string())
}

fn preview(content: &str) -> String {
    let head: String = content.chars().take(DESCRIPTION_CHARS).collect();
    format!("{}...", head)
}
