//! The node creation pipeline.

use chainmuse_core::{
    ContentRecord, ContentRef, CreateChildRequest, CreateRootRequest, CreatedNode,
    GenerationRequest, extract_context,
};
use chainmuse_error::{ChainmuseError, PipelineError, PipelineStage};
use chainmuse_interface::{ContentStore, LedgerMinter, NarrativeGenerator};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Drives one creation request through generate, persist and mint.
///
/// The pipeline is strictly sequential and stops at the first failure:
/// 1. Context fetch (children only) - best effort, failure degrades to no context
/// 2. Generate - terminal on failure, nothing written
/// 3. Persist content - terminal on failure, generated text is dropped
/// 4. Mint - terminal on failure, the stored record stays unreferenced
///
/// Nothing is retried. Re-issuing a failed request runs every stage again
/// and produces a new record and a new node.
#[derive(Clone)]
pub struct NodeCreationOrchestrator {
    generator: Arc<dyn NarrativeGenerator>,
    store: Arc<dyn ContentStore>,
    minter: Arc<dyn LedgerMinter>,
    default_model: String,
}

impl std::fmt::Debug for NodeCreationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCreationOrchestrator")
            .field("generator", &self.generator.provider_name())
            .field("store", &self.store.mode())
            .field("minter", &self.minter.signer_address())
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl NodeCreationOrchestrator {
    /// Create an orchestrator over the given adapters.
    pub fn new(
        generator: Arc<dyn NarrativeGenerator>,
        store: Arc<dyn ContentStore>,
        minter: Arc<dyn LedgerMinter>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            store,
            minter,
            default_model: default_model.into(),
        }
    }

    /// Model used when a request names none.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Create a root node.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] tagged with the stage that failed.
    #[instrument(skip(self, request), fields(title = %request.title()))]
    pub async fn create_root(
        &self,
        request: &CreateRootRequest,
    ) -> Result<CreatedNode, PipelineError> {
        let model = self.model_for(request.model());
        info!(%model, "Creating root node");

        let text = self
            .generate(GenerationRequest::new(request.prompt(), None, &model))
            .await?;

        let record = ContentRecord::root(request.title(), &text, &model, now_millis());
        let content_ref = self.persist(&record).await?;

        debug!(stage = %PipelineStage::Mint, "Minting root");
        let receipt = self
            .minter
            .mint_root(request.title(), &content_ref)
            .await
            .map_err(|e| fail(PipelineStage::Mint, e, Some(&content_ref)))?;

        info!(node_id = %receipt.node_id(), tx_digest = %receipt.tx_digest(), "Root node created");
        Ok(CreatedNode::new(
            receipt,
            content_ref,
            text,
            request.title().clone(),
            None,
            record,
        ))
    }

    /// Create a child of an existing node.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] tagged with the stage that failed. A
    /// failure to fetch the parent's content is not an error.
    #[instrument(
        skip(self, request),
        fields(title = %request.title(), parent_id = %request.parent_id())
    )]
    pub async fn create_child(
        &self,
        request: &CreateChildRequest,
    ) -> Result<CreatedNode, PipelineError> {
        let model = self.model_for(request.model());
        info!(%model, "Creating child node");

        let context = self.parent_context(request.parent_content_ref()).await;

        let text = self
            .generate(GenerationRequest::new(request.prompt(), context, &model))
            .await?;

        let record = ContentRecord::child(
            request.title(),
            &text,
            &model,
            now_millis(),
            request.parent_id().clone(),
            request.parent_content_ref().clone(),
        );
        let content_ref = self.persist(&record).await?;

        debug!(stage = %PipelineStage::Mint, "Minting child");
        let receipt = self
            .minter
            .mint_child(request.title(), &content_ref, request.parent_id())
            .await
            .map_err(|e| fail(PipelineStage::Mint, e, Some(&content_ref)))?;

        info!(node_id = %receipt.node_id(), tx_digest = %receipt.tx_digest(), "Child node created");
        Ok(CreatedNode::new(
            receipt,
            content_ref,
            text,
            request.title().clone(),
            Some(request.parent_id().clone()),
            record,
        ))
    }

    fn model_for(&self, requested: &Option<String>) -> String {
        requested
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model)
            .to_string()
    }

    async fn parent_context(&self, parent_ref: &ContentRef) -> Option<String> {
        debug!(stage = %PipelineStage::ContextFetch, content_ref = %parent_ref, "Fetching parent content");
        let blob = match self.store.fetch(parent_ref).await {
            Ok(blob) => blob,
            Err(e) => {
                warn!(content_ref = %parent_ref, error = %e, "Parent content unavailable, generating without context");
                return None;
            }
        };
        match extract_context(&blob) {
            Ok(context) => Some(context),
            Err(e) => {
                warn!(content_ref = %parent_ref, error = %e, "Parent content unreadable, generating without context");
                None
            }
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, PipelineError> {
        debug!(
            stage = %PipelineStage::Generate,
            provider = self.generator.provider_name(),
            has_context = request.parent_context().is_some(),
            "Generating"
        );
        self.generator
            .generate(&request)
            .await
            .map_err(|e| fail(PipelineStage::Generate, e, None))
    }

    async fn persist(&self, record: &ContentRecord) -> Result<ContentRef, PipelineError> {
        debug!(stage = %PipelineStage::PersistContent, "Storing content record");
        let blob = record
            .to_blob()
            .map_err(|e| fail(PipelineStage::PersistContent, e, None))?;
        let content_ref = self
            .store
            .store(&blob)
            .await
            .map_err(|e| fail(PipelineStage::PersistContent, e, None))?;
        debug!(content_ref = %content_ref, bytes = blob.len(), "Content stored");
        Ok(content_ref)
    }
}

fn fail(
    stage: PipelineStage,
    cause: impl Into<ChainmuseError>,
    orphan: Option<&ContentRef>,
) -> PipelineError {
    let err = PipelineError::new(stage, cause);
    match orphan {
        Some(content_ref) => {
            error!(%stage, kind = %err.failure(), orphaned_content = %content_ref, error = %err.cause(), "Pipeline failed");
            err.with_orphaned_content(content_ref.as_str())
        }
        None => {
            error!(%stage, kind = %err.failure(), error = %err.cause(), "Pipeline failed");
            err
        }
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
