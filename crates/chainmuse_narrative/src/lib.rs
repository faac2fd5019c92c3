//! Narrative workflows for ChainMuse.
//!
//! [`NodeCreationOrchestrator`] turns a prompt into a minted node: it
//! generates text, stores it as a content record and mints a node pointing
//! at the record. [`GraphService`] answers the read side, and
//! [`StoryGraph`] rebuilds the forest from the creation event stream.

mod graph;
mod orchestrator;
mod service;

pub use graph::{GraphNode, StoryGraph};
pub use orchestrator::NodeCreationOrchestrator;
pub use service::{GraphService, GraphSnapshot, StatsReport};
