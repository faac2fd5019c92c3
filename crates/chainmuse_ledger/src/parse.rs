//! Conversion of ledger payloads into domain records.
//!
//! Event payloads and node objects carry the Move struct fields `node_id`,
//! `parent_id`, `creator`, `ipfs_cid` and `title`. Optional parents arrive as
//! `null`, a bare id string, or the `{"vec": [...]}` encoding of `Option<ID>`.

use crate::dto::{ObjectData, SuiEvent, value_as_u64};
use chainmuse_core::{Address, ContentRef, NarrativeNode, NodeCreatedEvent, NodeId, TxDigest};
use serde_json::Value;

/// Decode an optional id field.
///
/// Returns `Err` for shapes that are neither absent nor an id.
pub fn optional_id(value: Option<&Value>) -> Result<Option<NodeId>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(NodeId::new(s.clone()))),
        Some(Value::Object(map)) => match map.get("vec") {
            Some(Value::Array(items)) => match items.as_slice() {
                [] => Ok(None),
                [Value::String(s)] => Ok(Some(NodeId::new(s.clone()))),
                other => Err(format!("unexpected option payload {:?}", other)),
            },
            _ => match map.get("id") {
                Some(inner) => optional_id(Some(inner)),
                None => Err(format!("unexpected id object {}", Value::Object(map.clone()))),
            },
        },
        Some(other) => Err(format!("unexpected id value {}", other)),
    }
}

fn required_str<'a>(fields: &'a Value, name: &str) -> Result<&'a str, String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing field '{}'", name))
}

fn optional_str(fields: &Value, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Build a creation event from a `StoryNodeCreated` ledger event.
pub fn node_created_event(event: &SuiEvent) -> Result<NodeCreatedEvent, String> {
    let fields = &event.parsed_json;
    let node_id = required_str(fields, "node_id")?;
    let parent_id = optional_id(fields.get("parent_id"))?;
    let creator = optional_str(fields, "creator")
        .or_else(|| event.sender.clone())
        .ok_or_else(|| "event has neither creator nor sender".to_string())?;
    let content_ref = required_str(fields, "ipfs_cid")?;
    let timestamp_ms = event
        .timestamp_ms
        .or_else(|| fields.get("created_at").and_then(value_as_u64))
        .unwrap_or_default();

    NodeCreatedEvent::builder()
        .node_id(NodeId::new(node_id))
        .parent_id(parent_id)
        .creator(Address::new(creator))
        .content_ref(ContentRef::new(content_ref))
        .title(optional_str(fields, "title"))
        .timestamp_ms(timestamp_ms)
        .tx_digest(TxDigest::new(event.id.tx_digest.clone()))
        .event_seq(event.id.event_seq)
        .build()
        .map_err(|e| e.to_string())
}

/// Build a node from an owned `StoryNode` object.
pub fn narrative_node(object: &ObjectData) -> Result<NarrativeNode, String> {
    let fields = object
        .content
        .as_ref()
        .and_then(|c| c.get("fields"))
        .ok_or_else(|| format!("object {} has no content fields", object.object_id))?;

    NarrativeNode::builder()
        .node_id(NodeId::new(object.object_id.clone()))
        .title(optional_str(fields, "title").unwrap_or_default())
        .content_ref(ContentRef::new(required_str(fields, "ipfs_cid")?))
        .parent_id(optional_id(fields.get("parent_id"))?)
        .creator(Address::new(required_str(fields, "creator")?))
        .created_at(fields.get("created_at").and_then(value_as_u64))
        .tx_digest(object.previous_transaction.clone().map(TxDigest::new))
        .build()
        .map_err(|e| e.to_string())
}

/// True when a fully qualified Move type names `module::name`.
pub fn is_move_type(type_name: &str, module: &str, name: &str) -> bool {
    type_name.ends_with(&format!("::{}::{}", module, name))
}
