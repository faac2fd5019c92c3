//! Core data types for the ChainMuse narrative graph.
//!
//! Narrative nodes live on a ledger; their text lives in a content store.
//! This crate defines the records exchanged between the two and the
//! requests and results of the creation pipeline.

mod event;
mod ids;
mod mode;
mod node;
mod observability;
mod receipt;
mod record;
mod request;

pub use event::{GraphStats, NodeCreatedEvent, NodeCreatedEventBuilder};
pub use ids::{Address, ContentRef, NodeId, TxDigest};
pub use mode::AdapterMode;
pub use node::{NarrativeNode, NarrativeNodeBuilder, NodeKind};
pub use observability::{LogFormat, init_tracing};
pub use receipt::{CreatedNode, MintReceipt};
pub use record::{ContentRecord, extract_context};
pub use request::{
    CreateChildRequest, CreateChildRequestBuilder, CreateRootRequest, CreateRootRequestBuilder,
    GenerationRequest,
};

/// Model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
