use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use serde_json::{json, Map, Value};

use crate::config::EngineConfig;
use crate::credentials::Credential;
use crate::error::ProviderError;
use crate::provider::{ResponseFormat, StructuredProvider, StructuredRequest, StructuredResponse};

const ERROR_BODY_LIMIT: usize = 512;

/// `generateContent` over HTTPS. One request per call; no retries.
pub struct GeminiProvider {
    api_base: String,
    timeout: Duration,
    http: HttpClient,
}

impl GeminiProvider {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        let api_base = api_base.into();
        Self {
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            timeout,
            http: HttpClient::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.api_base.clone(), config.request_timeout)
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    fn build_payload(request: &StructuredRequest) -> Value {
        let mut parts = vec![json!({ "text": request.contents.text() })];
        if let Some(attachment) = request.contents.attachment() {
            parts.push(json!({
                "inlineData": {
                    "mimeType": attachment.mime_type,
                    "data": BASE64.encode(&attachment.data),
                }
            }));
        }

        let mut payload = Map::new();
        payload.insert(
            "contents".to_string(),
            json!([{ "role": "user", "parts": parts }]),
        );
        if request.response_format == ResponseFormat::Json {
            let mut generation_config = Map::new();
            generation_config.insert(
                "responseMimeType".to_string(),
                Value::String("application/json".to_string()),
            );
            if let Some(schema) = request.schema.as_ref() {
                generation_config.insert("responseSchema".to_string(), schema.clone());
            }
            payload.insert(
                "generationConfig".to_string(),
                Value::Object(generation_config),
            );
        }
        Value::Object(payload)
    }

    /// Concatenated text of the first candidate, skipping thought parts.
    fn extract_text(payload: &Value) -> Option<String> {
        let parts = payload
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)?;
        let text: String = parts
            .iter()
            .filter(|part| part.get("thought") != Some(&Value::Bool(true)))
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

impl StructuredProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate_structured(
        &self,
        credential: &Credential,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, ProviderError> {
        let endpoint = self.endpoint_for_model(&request.model);
        let payload = Self::build_payload(request);
        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", credential.expose())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .map_err(|err| ProviderError::transport(err.without_url().to_string()))?;
        let body = response_json_or_error(response)?;
        if let Some(reason) = body
            .get("promptFeedback")
            .and_then(|feedback| feedback.get("blockReason"))
            .and_then(Value::as_str)
        {
            tracing::warn!(model = %request.model, reason, "provider blocked the prompt");
        }
        Ok(StructuredResponse {
            text: Self::extract_text(&body),
        })
    }
}

fn response_json_or_error(response: HttpResponse) -> Result<Value, ProviderError> {
    let status = response.status();
    let code = status.as_u16();
    let failed = |detail: String| ProviderError::new(Some(code), detail);
    let body = response
        .text()
        .map_err(|err| failed(format!("response body read failed: {}", err.without_url())))?;
    if !status.is_success() {
        return Err(failed(error_message(&body)));
    }
    serde_json::from_str(&body)
        .map_err(|err| failed(format!("provider returned invalid JSON payload: {err}")))
}

/// `STATUS: message` from a Google API error body, else the truncated body.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let error = parsed.as_ref().and_then(|value| value.get("error"));
    let message = error
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str);
    let status = error
        .and_then(|error| error.get("status"))
        .and_then(Value::as_str);
    match (status, message) {
        (Some(status), Some(message)) => format!("{status}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => truncate_text(body.trim(), ERROR_BODY_LIMIT),
    }
}

pub(crate) fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}
