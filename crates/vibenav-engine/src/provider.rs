use serde_json::Value;
use vibenav_contracts::blueprint::Attachment;

use crate::credentials::Credential;
use crate::error::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Text(String),
    TextWithAttachment {
        text: String,
        attachment: Attachment,
    },
}

impl Contents {
    pub fn text(&self) -> &str {
        match self {
            Contents::Text(text) => text,
            Contents::TextWithAttachment { text, .. } => text,
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            Contents::Text(_) => None,
            Contents::TextWithAttachment { attachment, .. } => Some(attachment),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    pub model: String,
    pub contents: Contents,
    pub response_format: ResponseFormat,
    pub schema: Option<Value>,
}

impl StructuredRequest {
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: Contents::Text(prompt.into()),
            response_format: ResponseFormat::Text,
            schema: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredResponse {
    pub text: Option<String>,
}

impl StructuredResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Text with whitespace-only payloads treated as absent.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }
}

/// One round trip to a generative model. Implementations must not retry.
pub trait StructuredProvider: Send + Sync {
    fn name(&self) -> &str;

    fn generate_structured(
        &self,
        credential: &Credential,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, ProviderError>;
}
