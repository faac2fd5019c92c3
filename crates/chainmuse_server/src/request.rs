//! Request bodies and query strings of the HTTP API.

use crate::ApiError;
use chainmuse_core::{CreateChildRequest, CreateRootRequest};
use serde::Deserialize;

/// Body of `POST /create-root-story`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRootBody {
    /// Prompt for the generator
    #[serde(default)]
    pub prompt: Option<String>,
    /// Node title
    #[serde(default)]
    pub title: Option<String>,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
}

/// Body of `POST /create-child-story`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildBody {
    /// Prompt for the generator
    #[serde(default)]
    pub prompt: Option<String>,
    /// Node title
    #[serde(default)]
    pub title: Option<String>,
    /// Content reference of the parent
    #[serde(default)]
    pub parent_ipfs_cid: Option<String>,
    /// Ledger id of the parent
    #[serde(default)]
    pub parent_object_id: Option<String>,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
}

/// `?limit=` query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of items
    pub limit: Option<usize>,
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

impl CreateRootBody {
    /// Validate into a pipeline request.
    pub fn into_request(self) -> Result<CreateRootRequest, ApiError> {
        let prompt = required(self.prompt, "Prompt is required.")?;
        let title = required(self.title, "Title is required.")?;
        CreateRootRequest::builder()
            .prompt(prompt)
            .title(title)
            .model(self.model)
            .build()
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

impl CreateChildBody {
    /// Validate into a pipeline request.
    pub fn into_request(self) -> Result<CreateChildRequest, ApiError> {
        let prompt = required(self.prompt, "Prompt is required.")?;
        let title = required(self.title, "Title is required.")?;
        let parent_ref = required(self.parent_ipfs_cid, "Parent IPFS CID is required.")?;
        let parent_id = required(self.parent_object_id, "Parent Object ID is required.")?;
        CreateChildRequest::builder()
            .prompt(prompt)
            .title(title)
            .parent_id(parent_id)
            .parent_content_ref(parent_ref)
            .model(self.model)
            .build()
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_count_as_missing() {
        let body = CreateRootBody {
            prompt: Some("  ".to_string()),
            title: Some("T".to_string()),
            model: None,
        };
        match body.into_request() {
            Err(ApiError::BadRequest(message)) => assert_eq!(message, "Prompt is required."),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn child_fields_are_checked_in_order() {
        let body = CreateChildBody {
            prompt: Some("p".to_string()),
            title: Some("t".to_string()),
            parent_ipfs_cid: Some("cid".to_string()),
            ..CreateChildBody::default()
        };
        match body.into_request() {
            Err(ApiError::BadRequest(message)) => {
                assert_eq!(message, "Parent Object ID is required.")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn complete_child_body_converts() {
        let body: CreateChildBody = serde_json::from_str(
            r#"{"prompt":"p","title":"t","parentIpfsCid":"cid","parentObjectId":"0x1","model":"m"}"#,
        )
        .expect("valid body");
        let request = body.into_request().expect("valid request");
        assert_eq!(request.parent_id().as_str(), "0x1");
        assert_eq!(request.parent_content_ref().as_str(), "cid");
        assert_eq!(request.model().as_deref(), Some("m"));
    }
}
