//! Shared handler state.

use crate::{ChainmuseConfig, ServerConfig};
use chainmuse_error::ChainmuseResult;
use chainmuse_interface::{ContentStore, LedgerMinter, NarrativeGenerator};
use chainmuse_ledger::{LedgerServices, build_ledger};
use chainmuse_models::build_generator;
use chainmuse_narrative::{GraphService, NodeCreationOrchestrator};
use chainmuse_storage::build_content_store;
use std::sync::Arc;
use tracing::info;

/// Adapters and services shared by every request.
///
/// Built once at startup; handlers only read from it.
#[derive(Clone)]
pub struct AppState {
    orchestrator: NodeCreationOrchestrator,
    graph: GraphService,
    generator: Arc<dyn NarrativeGenerator>,
    store: Arc<dyn ContentStore>,
    minter: Arc<dyn LedgerMinter>,
    settings: ServerConfig,
}

impl AppState {
    /// Wire already-built adapters together.
    pub fn new(
        generator: Arc<dyn NarrativeGenerator>,
        store: Arc<dyn ContentStore>,
        ledger: LedgerServices,
        default_model: impl Into<String>,
        settings: ServerConfig,
    ) -> Self {
        let orchestrator = NodeCreationOrchestrator::new(
            generator.clone(),
            store.clone(),
            ledger.minter.clone(),
            default_model,
        );
        let graph = GraphService::new(ledger.reader, store.clone());
        Self {
            orchestrator,
            graph,
            generator,
            store,
            minter: ledger.minter,
            settings,
        }
    }

    /// Build every adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured adapter cannot be constructed, for
    /// example when the signing key is malformed.
    pub fn from_config(config: &ChainmuseConfig) -> ChainmuseResult<Self> {
        let generator = build_generator(&config.generation)?;
        let store = build_content_store(&config.content)?;
        let ledger = build_ledger(&config.ledger)?;
        info!(
            generation = %generator.mode(),
            content = %store.mode(),
            ledger = %ledger.minter.mode(),
            "Adapters ready"
        );
        Ok(Self::new(
            generator,
            store,
            ledger,
            config.generation.default_model.clone(),
            config.server.clone(),
        ))
    }

    /// Creation pipeline.
    pub fn orchestrator(&self) -> &NodeCreationOrchestrator {
        &self.orchestrator
    }

    /// Read-side queries.
    pub fn graph(&self) -> &GraphService {
        &self.graph
    }

    /// Generation adapter.
    pub fn generator(&self) -> &Arc<dyn NarrativeGenerator> {
        &self.generator
    }

    /// Content store adapter.
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Ledger minter.
    pub fn minter(&self) -> &Arc<dyn LedgerMinter> {
        &self.minter
    }

    /// Server settings.
    pub fn settings(&self) -> &ServerConfig {
        &self.settings
    }
}
