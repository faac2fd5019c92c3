//! Requests accepted by the creation pipeline and the generation adapter.

use crate::{ContentRef, NodeId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Request to start a new narrative tree.
///
/// # Examples
///
/// ```
/// use chainmuse_core::CreateRootRequest;
///
/// let req = CreateRootRequest::builder()
///     .prompt("A lighthouse keeper finds a map")
///     .title("The Map")
///     .build()
///     .unwrap();
/// assert!(req.model().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct CreateRootRequest {
    /// Prompt for the generator
    prompt: String,
    /// Node title
    title: String,
    /// Model override
    #[builder(default)]
    #[serde(default)]
    model: Option<String>,
}

impl CreateRootRequest {
    /// Returns a builder for constructing a root request.
    pub fn builder() -> CreateRootRequestBuilder {
        CreateRootRequestBuilder::default()
    }
}

/// Request to branch from an existing node.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct CreateChildRequest {
    /// Prompt for the generator
    prompt: String,
    /// Node title
    title: String,
    /// Node to branch from
    parent_id: NodeId,
    /// Content reference of the parent, used for generation context
    parent_content_ref: ContentRef,
    /// Model override
    #[builder(default)]
    #[serde(default)]
    model: Option<String>,
}

impl CreateChildRequest {
    /// Returns a builder for constructing a child request.
    pub fn builder() -> CreateChildRequestBuilder {
        CreateChildRequestBuilder::default()
    }
}

/// Input to the generation adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct GenerationRequest {
    /// User prompt
    prompt: String,
    /// Text of the parent node, `None` for roots or when the fetch failed
    parent_context: Option<String>,
    /// Model identifier
    model: String,
}

impl GenerationRequest {
    /// Creates a new generation request.
    ///
    /// An empty context is normalized to `None`.
    pub fn new(
        prompt: impl Into<String>,
        parent_context: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            parent_context: parent_context.filter(|c| !c.trim().is_empty()),
            model: model.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_context_is_treated_as_absent() {
        let req = GenerationRequest::new("p", Some("   ".to_string()), "m");
        assert!(req.parent_context().is_none());
        let req = GenerationRequest::new("p", Some("ctx".to_string()), "m");
        assert_eq!(req.parent_context().as_deref(), Some("ctx"));
    }
}
