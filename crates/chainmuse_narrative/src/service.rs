//! Read-side views over the ledger and content store.

use crate::StoryGraph;
use chainmuse_core::{
    ContentRecord, ContentRef, GraphStats, NarrativeNode, NodeCreatedEvent, extract_context,
};
use chainmuse_error::{ContentError, LedgerError};
use chainmuse_interface::{ContentStore, LedgerReader};
use derive_getters::Getters;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Root/branch counts with the ledger they were taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    #[serde(flatten)]
    stats: GraphStats,
    network: String,
    package_id: String,
}

/// Everything the graph view needs in one response.
#[derive(Debug, Clone, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    nodes: Vec<NarrativeNode>,
    /// Most recent first
    events: Vec<NodeCreatedEvent>,
    /// Counts over `events`
    stats: GraphStats,
    graph: StoryGraph,
}

/// Queries combining the ledger reader and the content store.
#[derive(Clone)]
pub struct GraphService {
    reader: Arc<dyn LedgerReader>,
    store: Arc<dyn ContentStore>,
}

impl std::fmt::Debug for GraphService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphService")
            .field("network", &self.reader.network())
            .field("package_id", &self.reader.package_id())
            .field("store", &self.store.mode())
            .finish()
    }
}

impl GraphService {
    /// Create a service over a reader and a store.
    pub fn new(reader: Arc<dyn LedgerReader>, store: Arc<dyn ContentStore>) -> Self {
        Self { reader, store }
    }

    /// The underlying ledger reader.
    pub fn reader(&self) -> &Arc<dyn LedgerReader> {
        &self.reader
    }

    /// Nodes, the latest `events_limit` events, their counts and the forest
    /// they describe.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, events_limit: usize) -> Result<GraphSnapshot, LedgerError> {
        let (nodes, events) = tokio::try_join!(
            self.reader.list_nodes(),
            self.reader.list_events(events_limit)
        )?;
        let graph = StoryGraph::from_events(&events);
        debug!(nodes = nodes.len(), events = events.len(), "Graph snapshot");
        Ok(GraphSnapshot {
            nodes,
            stats: *graph.stats(),
            events,
            graph,
        })
    }

    /// Counts over the latest `scan_limit` events.
    #[instrument(skip(self))]
    pub async fn stats(&self, scan_limit: usize) -> Result<StatsReport, LedgerError> {
        let stats = self.reader.compute_stats(scan_limit).await?;
        Ok(StatsReport {
            stats,
            network: self.reader.network().to_string(),
            package_id: self.reader.package_id().to_string(),
        })
    }

    /// Decoded content record behind `content_ref`.
    #[instrument(skip(self), fields(content_ref = %content_ref))]
    pub async fn content_record(
        &self,
        content_ref: &ContentRef,
    ) -> Result<ContentRecord, ContentError> {
        let blob = self.store.fetch(content_ref).await?;
        ContentRecord::from_blob(&blob)
    }

    /// Narrative text behind `content_ref`.
    #[instrument(skip(self), fields(content_ref = %content_ref))]
    pub async fn content_text(&self, content_ref: &ContentRef) -> Result<String, ContentError> {
        let blob = self.store.fetch(content_ref).await?;
        extract_context(&blob)
    }
}
