//! Node and event queries against a Sui fullnode.

use crate::dto::{EventId, EventPage, ObjectPage};
use crate::parse::{narrative_node, node_created_event};
use crate::rpc::{SuiRpcClient, object_options};
use async_trait::async_trait;
use chainmuse_core::{Address, NarrativeNode, NodeCreatedEvent, NodeId};
use chainmuse_error::{LedgerError, LedgerErrorKind};
use chainmuse_interface::LedgerReader;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Largest page the fullnode serves per query.
const MAX_PAGE: usize = 50;

const NODE_TYPE: &str = "StoryNode";
const CREATED_EVENT: &str = "StoryNodeCreated";

/// Reads nodes owned by one address and the package's creation events.
#[derive(Debug, Clone)]
pub struct SuiQueryService {
    rpc: Arc<SuiRpcClient>,
    package_id: String,
    module: String,
    owner: Address,
    network: String,
}

impl SuiQueryService {
    /// Create a query service scoped to nodes owned by `owner`.
    pub fn new(
        rpc: Arc<SuiRpcClient>,
        package_id: impl Into<String>,
        module: impl Into<String>,
        owner: Address,
        network: impl Into<String>,
    ) -> Self {
        Self {
            rpc,
            package_id: package_id.into(),
            module: module.into(),
            owner,
            network: network.into(),
        }
    }

    fn struct_type(&self, name: &str) -> String {
        format!("{}::{}::{}", self.package_id, self.module, name)
    }
}

fn malformed(what: &str, detail: String) -> LedgerError {
    LedgerError::new(LedgerErrorKind::QueryUnavailable(format!(
        "malformed {}: {}",
        what, detail
    )))
}

#[async_trait]
impl LedgerReader for SuiQueryService {
    #[instrument(skip(self), fields(owner = %self.owner))]
    async fn list_nodes(&self) -> Result<Vec<NarrativeNode>, LedgerError> {
        let filter = json!({
            "filter": {"StructType": self.struct_type(NODE_TYPE)},
            "options": object_options(),
        });

        let mut nodes = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page: ObjectPage = self
                .rpc
                .call(
                    "suix_getOwnedObjects",
                    json!([self.owner, filter, cursor, MAX_PAGE]),
                )
                .await
                .map_err(|f| f.into_query_error())?;

            for entry in &page.data {
                let Some(object) = &entry.data else {
                    warn!(error = ?entry.error, "Skipping unreadable owned object");
                    continue;
                };
                match narrative_node(object) {
                    Ok(node) => nodes.push(node),
                    Err(reason) => warn!(
                        object_id = %object.object_id,
                        %reason,
                        "Skipping malformed owned object"
                    ),
                }
            }

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = nodes.len(), "Listed nodes");
        Ok(nodes)
    }

    #[instrument(skip(self))]
    async fn list_events(&self, limit: usize) -> Result<Vec<NodeCreatedEvent>, LedgerError> {
        let query = json!({"MoveEventType": self.struct_type(CREATED_EVENT)});

        let mut events = Vec::with_capacity(limit.min(1024));
        let mut cursor: Option<EventId> = None;
        while events.len() < limit {
            let page_size = (limit - events.len()).min(MAX_PAGE);
            let page: EventPage = self
                .rpc
                .call(
                    "suix_queryEvents",
                    json!([query, cursor, page_size, true]),
                )
                .await
                .map_err(|f| f.into_query_error())?;

            for event in page.data.iter().take(limit - events.len()) {
                events.push(node_created_event(event).map_err(|e| malformed("event", e))?);
            }

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn get_node(&self, node_id: &NodeId) -> Result<Option<NarrativeNode>, LedgerError> {
        let Some(object) = self
            .rpc
            .get_move_object(node_id.as_str(), &self.module, NODE_TYPE)
            .await
            .map_err(|f| f.into_query_error())?
        else {
            return Ok(None);
        };
        narrative_node(&object)
            .map(Some)
            .map_err(|e| malformed("node object", e))
    }

    fn network(&self) -> &str {
        &self.network
    }

    fn package_id(&self) -> &str {
        &self.package_id
    }
}
