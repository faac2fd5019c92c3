//! Reconstruction of the narrative forest from the creation event stream.

use chainmuse_core::{Address, ContentRef, GraphStats, NodeCreatedEvent, NodeId};
use derive_getters::Getters;
use serde::Serialize;
use std::collections::HashMap;

/// One node of a reconstructed graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    node_id: NodeId,
    parent_id: Option<NodeId>,
    title: Option<String>,
    content_ref: ContentRef,
    creator: Address,
    timestamp_ms: u64,
    /// Ancestors visible in the scanned window
    depth: usize,
    /// Children in creation order
    children: Vec<NodeId>,
}

/// Forest folded from a window of creation events.
///
/// Events whose parent falls outside the window are kept and listed as
/// dangling; their depth counts only the ancestors that are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryGraph {
    /// Nodes oldest first
    nodes: Vec<GraphNode>,
    roots: Vec<NodeId>,
    dangling: Vec<NodeId>,
    stats: GraphStats,
    #[serde(skip)]
    #[getter(skip)]
    index: HashMap<NodeId, usize>,
}

impl StoryGraph {
    /// Fold events, in any order, into a forest.
    ///
    /// Duplicate node ids keep their first occurrence in ledger order.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a NodeCreatedEvent>) -> Self {
        let mut ordered: Vec<&NodeCreatedEvent> = events.into_iter().collect();
        ordered.sort_by_key(|e| (*e.timestamp_ms(), e.tx_digest().clone(), *e.event_seq()));

        let mut graph = StoryGraph {
            stats: GraphStats::classify(ordered.iter().copied()),
            ..StoryGraph::default()
        };

        for event in ordered {
            if graph.index.contains_key(event.node_id()) {
                continue;
            }
            graph.index.insert(event.node_id().clone(), graph.nodes.len());
            graph.nodes.push(GraphNode {
                node_id: event.node_id().clone(),
                parent_id: event.parent_id().clone(),
                title: event.title().clone(),
                content_ref: event.content_ref().clone(),
                creator: event.creator().clone(),
                timestamp_ms: *event.timestamp_ms(),
                depth: 0,
                children: Vec::new(),
            });
        }

        graph.link();
        graph
    }

    fn link(&mut self) {
        for position in 0..self.nodes.len() {
            let node_id = self.nodes[position].node_id.clone();
            match self.nodes[position].parent_id.clone() {
                None => self.roots.push(node_id),
                Some(parent) => match self.index.get(&parent) {
                    Some(&p) => self.nodes[p].children.push(node_id),
                    None => self.dangling.push(node_id),
                },
            }
        }

        for position in 0..self.nodes.len() {
            self.nodes[position].depth = self.ancestors(position);
        }
    }

    /// Visible ancestors of the node at `position`, bounded by the node count
    /// so malformed parent cycles cannot loop.
    fn ancestors(&self, position: usize) -> usize {
        let mut depth = 0;
        let mut current = position;
        while depth < self.nodes.len() {
            let parent = self.nodes[current]
                .parent_id
                .as_ref()
                .and_then(|p| self.index.get(p));
            match parent {
                Some(&p) => {
                    depth += 1;
                    current = p;
                }
                None => break,
            }
        }
        depth
    }

    /// Look up a node.
    pub fn get(&self, node_id: &NodeId) -> Option<&GraphNode> {
        self.index.get(node_id).map(|&i| &self.nodes[i])
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the window held no events.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
