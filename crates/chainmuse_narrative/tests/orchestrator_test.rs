//! Creation pipeline behaviour with stub adapters.

use async_trait::async_trait;
use chainmuse_core::{
    AdapterMode, Address, ContentRecord, ContentRef, CreateChildRequest, CreateRootRequest,
    GenerationRequest, MintReceipt, NodeId, TxDigest,
};
use chainmuse_error::{
    ContentError, ContentErrorKind, FailureKind, GenerationError, GenerationErrorKind,
    LedgerError, LedgerErrorKind, PipelineStage,
};
use chainmuse_interface::{ContentStore, LedgerMinter, NarrativeGenerator};
use chainmuse_narrative::NodeCreationOrchestrator;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct StubGenerator {
    fail: bool,
    requests: Mutex<Vec<GenerationRequest>>,
}

#[async_trait]
impl NarrativeGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        if self.fail {
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: 503,
                message: "overloaded".to_string(),
            }));
        }
        Ok("GEN".to_string())
    }

    async fn list_models(&self) -> Vec<String> {
        vec!["stub-model".to_string()]
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Simulated
    }
}

#[derive(Default)]
struct StubStore {
    fail_store: bool,
    parent_blob: Option<Vec<u8>>,
    stored: Mutex<Vec<Vec<u8>>>,
    fetched: Mutex<Vec<ContentRef>>,
}

#[async_trait]
impl ContentStore for StubStore {
    async fn store(&self, blob: &[u8]) -> Result<ContentRef, ContentError> {
        if self.fail_store {
            return Err(ContentError::new(ContentErrorKind::StoreUnavailable(
                "pinning down".to_string(),
            )));
        }
        self.stored.lock().expect("stored lock").push(blob.to_vec());
        Ok(ContentRef::new("ref-1"))
    }

    async fn fetch(&self, content_ref: &ContentRef) -> Result<Vec<u8>, ContentError> {
        self.fetched
            .lock()
            .expect("fetched lock")
            .push(content_ref.clone());
        self.parent_blob.clone().ok_or_else(|| {
            ContentError::new(ContentErrorKind::ContentUnavailable {
                content_ref: content_ref.to_string(),
                attempts: 3,
            })
        })
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Simulated
    }
}

struct StubMinter {
    signer: Address,
    reject: Option<LedgerErrorKind>,
    calls: Mutex<Vec<(String, ContentRef, Option<NodeId>)>>,
}

impl StubMinter {
    fn accepting() -> Self {
        Self {
            signer: Address::new("0xsigner"),
            reject: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn rejecting(kind: LedgerErrorKind) -> Self {
        Self {
            reject: Some(kind),
            ..Self::accepting()
        }
    }

    fn answer(
        &self,
        title: &str,
        content_ref: &ContentRef,
        parent: Option<&NodeId>,
    ) -> Result<MintReceipt, LedgerError> {
        self.calls.lock().expect("calls lock").push((
            title.to_string(),
            content_ref.clone(),
            parent.cloned(),
        ));
        match &self.reject {
            Some(kind) => Err(LedgerError::new(kind.clone())),
            None => Ok(MintReceipt::new(
                TxDigest::new("d1"),
                NodeId::new("n1"),
                self.signer.clone(),
            )),
        }
    }
}

#[async_trait]
impl LedgerMinter for StubMinter {
    async fn mint_root(
        &self,
        title: &str,
        content_ref: &ContentRef,
    ) -> Result<MintReceipt, LedgerError> {
        self.answer(title, content_ref, None)
    }

    async fn mint_child(
        &self,
        title: &str,
        content_ref: &ContentRef,
        parent_id: &NodeId,
    ) -> Result<MintReceipt, LedgerError> {
        self.answer(title, content_ref, Some(parent_id))
    }

    fn signer_address(&self) -> &Address {
        &self.signer
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Simulated
    }
}

fn orchestrator(
    generator: &Arc<StubGenerator>,
    store: &Arc<StubStore>,
    minter: &Arc<StubMinter>,
) -> NodeCreationOrchestrator {
    NodeCreationOrchestrator::new(
        generator.clone(),
        store.clone(),
        minter.clone(),
        "default-model",
    )
}

fn root_request() -> CreateRootRequest {
    CreateRootRequest::builder()
        .prompt("P")
        .title("T")
        .build()
        .expect("valid request")
}

fn child_request() -> CreateChildRequest {
    CreateChildRequest::builder()
        .prompt("Continue")
        .title("Chapter 2")
        .parent_id("0xparent")
        .parent_content_ref("ref-parent")
        .model(Some("custom/model".to_string()))
        .build()
        .expect("valid request")
}

#[tokio::test]
async fn root_creation_assembles_result_from_each_stage() {
    let generator = Arc::new(StubGenerator::default());
    let store = Arc::new(StubStore::default());
    let minter = Arc::new(StubMinter::accepting());

    let created = orchestrator(&generator, &store, &minter)
        .create_root(&root_request())
        .await
        .expect("root created");

    assert_eq!(created.node_id().as_str(), "n1");
    assert_eq!(created.tx_digest().as_str(), "d1");
    assert_eq!(created.content_ref().as_str(), "ref-1");
    assert_eq!(created.text(), "GEN");
    assert_eq!(created.creator().as_str(), "0xsigner");
    assert!(created.parent_id().is_none());

    let json = serde_json::to_value(&created).expect("serializable");
    assert!(json.get("parentId").is_none());

    let requests = generator.requests.lock().expect("requests lock");
    assert_eq!(requests[0].prompt(), "P");
    assert_eq!(requests[0].model(), "default-model");
    assert!(requests[0].parent_context().is_none());

    let stored = store.stored.lock().expect("stored lock");
    let record = ContentRecord::from_blob(&stored[0]).expect("stored record");
    assert_eq!(record.name(), "T");
    assert_eq!(record.content(), "GEN");
    assert!(record.parent().is_none());

    let calls = minter.calls.lock().expect("calls lock");
    assert_eq!(
        calls.as_slice(),
        &[("T".to_string(), ContentRef::new("ref-1"), None)]
    );
}

#[tokio::test]
async fn child_proceeds_without_context_when_parent_fetch_fails() {
    let generator = Arc::new(StubGenerator::default());
    let store = Arc::new(StubStore::default());
    let minter = Arc::new(StubMinter::accepting());

    let created = orchestrator(&generator, &store, &minter)
        .create_child(&child_request())
        .await
        .expect("child created despite fetch failure");

    assert_eq!(created.parent_id().as_ref().map(NodeId::as_str), Some("0xparent"));
    assert_eq!(
        store.fetched.lock().expect("fetched lock").as_slice(),
        &[ContentRef::new("ref-parent")]
    );

    let requests = generator.requests.lock().expect("requests lock");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].parent_context().is_none());
    assert_eq!(requests[0].model(), "custom/model");

    let calls = minter.calls.lock().expect("calls lock");
    assert_eq!(calls[0].2, Some(NodeId::new("0xparent")));
}

#[tokio::test]
async fn child_generation_receives_parent_text() {
    let parent = ContentRecord::root("Dawn", "The sun rose over the hills.", "m", 1);
    let generator = Arc::new(StubGenerator::default());
    let store = Arc::new(StubStore {
        parent_blob: Some(parent.to_blob().expect("blob")),
        ..StubStore::default()
    });
    let minter = Arc::new(StubMinter::accepting());

    let created = orchestrator(&generator, &store, &minter)
        .create_child(&child_request())
        .await
        .expect("child created");

    let requests = generator.requests.lock().expect("requests lock");
    assert_eq!(
        requests[0].parent_context().as_deref(),
        Some("The sun rose over the hills.")
    );
    assert_eq!(
        created
            .record()
            .parent_content_ref()
            .as_ref()
            .map(ContentRef::as_str),
        Some("ref-parent")
    );
}

#[tokio::test]
async fn generation_failure_writes_nothing() {
    let generator = Arc::new(StubGenerator {
        fail: true,
        ..StubGenerator::default()
    });
    let store = Arc::new(StubStore::default());
    let minter = Arc::new(StubMinter::accepting());

    let err = orchestrator(&generator, &store, &minter)
        .create_root(&root_request())
        .await
        .expect_err("generation fails");

    assert_eq!(err.stage(), PipelineStage::Generate);
    assert_eq!(err.failure(), FailureKind::GenerationFailed);
    assert!(store.stored.lock().expect("stored lock").is_empty());
    assert!(minter.calls.lock().expect("calls lock").is_empty());
}

#[tokio::test]
async fn store_failure_skips_mint() {
    let generator = Arc::new(StubGenerator::default());
    let store = Arc::new(StubStore {
        fail_store: true,
        ..StubStore::default()
    });
    let minter = Arc::new(StubMinter::accepting());

    let err = orchestrator(&generator, &store, &minter)
        .create_root(&root_request())
        .await
        .expect_err("store fails");

    assert_eq!(err.stage(), PipelineStage::PersistContent);
    assert_eq!(err.failure(), FailureKind::StoreUnavailable);
    assert_eq!(err.orphaned_content(), None);
    assert!(minter.calls.lock().expect("calls lock").is_empty());
}

#[tokio::test]
async fn mint_rejection_is_terminal_and_not_retried() {
    let generator = Arc::new(StubGenerator::default());
    let store = Arc::new(StubStore::default());
    let minter = Arc::new(StubMinter::rejecting(LedgerErrorKind::MintRejected(
        "InsufficientGas".to_string(),
    )));

    let err = orchestrator(&generator, &store, &minter)
        .create_root(&root_request())
        .await
        .expect_err("mint fails");

    assert_eq!(err.stage(), PipelineStage::Mint);
    assert_eq!(err.failure(), FailureKind::MintRejected);
    assert_eq!(minter.calls.lock().expect("calls lock").len(), 1);
    assert_eq!(store.stored.lock().expect("stored lock").len(), 1);
    assert_eq!(err.orphaned_content(), Some("ref-1"));
}

#[tokio::test]
async fn missing_parent_is_reported_as_invalid_parent() {
    let generator = Arc::new(StubGenerator::default());
    let store = Arc::new(StubStore::default());
    let minter = Arc::new(StubMinter::rejecting(LedgerErrorKind::InvalidParent(
        "0xparent".to_string(),
    )));

    let err = orchestrator(&generator, &store, &minter)
        .create_child(&child_request())
        .await
        .expect_err("parent missing");

    assert_eq!(err.stage(), PipelineStage::Mint);
    assert_eq!(err.failure(), FailureKind::InvalidParent);
    assert_eq!(err.orphaned_content(), Some("ref-1"));
}
