//! Wire shapes of the Sui JSON-RPC responses this crate reads.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Result of `unsafe_moveCall`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBytes {
    /// Base64 BCS transaction data
    pub tx_bytes: String,
}

/// Result of `sui_executeTransactionBlock`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
    #[serde(default)]
    pub object_changes: Option<Vec<ObjectChange>>,
    #[serde(default)]
    pub events: Option<Vec<SuiEvent>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionStatus {
    /// `success` or `failure`
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Object change reported in transaction effects.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectChange {
    Created {
        #[serde(rename = "objectId")]
        object_id: String,
        #[serde(rename = "objectType")]
        object_type: String,
    },
    #[serde(other)]
    Other,
}

/// Page of `suix_queryEvents`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    #[serde(default)]
    pub data: Vec<SuiEvent>,
    #[serde(default)]
    pub next_cursor: Option<EventId>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventId {
    pub tx_digest: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    #[serde(serialize_with = "u64_as_string")]
    pub event_seq: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub parsed_json: Value,
    #[serde(default, deserialize_with = "optional_u64_from_string_or_number")]
    pub timestamp_ms: Option<u64>,
}

/// Page of `suix_getOwnedObjects`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPage {
    #[serde(default)]
    pub data: Vec<ObjectResponse>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Result of `sui_getObject`, also the element type of [`ObjectPage`].
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectResponse {
    #[serde(default)]
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: String,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    /// Move object content; `fields` holds the struct fields
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub previous_transaction: Option<String>,
}

/// Sui encodes 64-bit integers as decimal strings; accept plain numbers too.
fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_as_u64(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected u64, found {}", value)))
}

fn optional_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    value_as_u64(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected u64, found {}", value)))
}

fn u64_as_string<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Read a `u64` from a JSON string or number.
pub fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_changes_keep_created_entries_only() {
        let changes: Vec<ObjectChange> = serde_json::from_value(json!([
            {"type": "mutated", "objectId": "0xgas", "objectType": "0x2::coin::Coin<0x2::sui::SUI>"},
            {"type": "created", "objectId": "0xabc", "objectType": "0xpkg::story::StoryNode", "sender": "0x1"}
        ]))
        .expect("object changes");

        assert!(matches!(changes[0], ObjectChange::Other));
        match &changes[1] {
            ObjectChange::Created {
                object_id,
                object_type,
            } => {
                assert_eq!(object_id, "0xabc");
                assert_eq!(object_type, "0xpkg::story::StoryNode");
            }
            other => panic!("unexpected change {:?}", other),
        }
    }

    #[test]
    fn event_numbers_accept_strings() {
        let event: SuiEvent = serde_json::from_value(json!({
            "id": {"txDigest": "D1", "eventSeq": "3"},
            "type": "0xpkg::story::StoryNodeCreated",
            "parsedJson": {},
            "timestampMs": "1700000000000"
        }))
        .expect("event");

        assert_eq!(event.id.event_seq, 3);
        assert_eq!(event.timestamp_ms, Some(1_700_000_000_000));
        assert!(event.sender.is_none());
    }
}
